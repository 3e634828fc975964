//! Error types for web handlers.
//!
//! Every failure leaves the service as `{"error": "<message>"}`. Flow errors
//! and unparseable requests are 400s; only a handler fault is a 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use magic_link_auth::AuthError;
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Implements Axum's `IntoResponse` so handlers can return
/// `Result<_, AppError>` and use `?` on flow results.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(service): State<Arc<Service>>) -> Result<Json<SuccessResponse>, AppError> {
///     service.request_sign_in(&email).await?;
///     Ok(Json(SuccessResponse::new("Email Sent")))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    /// Shown to the client.
    message: String,
    /// Logged, never shown to the client.
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create an error with an explicit status.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause for the logs.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// 400 Bad Request.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match (&self.source, self.status.is_server_error()) {
            (Some(source), _) => tracing::error!(
                status = %self.status,
                message = %self.message,
                error = %source,
                "Request failed"
            ),
            (None, true) => tracing::error!(
                status = %self.status,
                message = %self.message,
                "Request failed"
            ),
            (None, false) => {}
        }

        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

/// Every flow failure is a 400 carrying the error's display text.
///
/// Upstream failures (directory, mail, signing) are not the caller's fault
/// but keep the 400 of the published interface; their detail goes to the
/// log through `source`.
impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let detail = match &err {
            AuthError::SigningError(detail)
            | AuthError::DirectoryUnavailable(detail)
            | AuthError::MailDeliveryError(detail)
            | AuthError::InternalError(detail) => Some(anyhow::anyhow!("{}: {detail}", err.kind())),
            _ => None,
        };

        let app_error = Self::bad_request(err.to_string());
        match detail {
            Some(source) => app_error.with_source(source),
            None => app_error,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}
