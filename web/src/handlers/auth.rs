//! Sign-in, sign-up and verification handlers.
//!
//! Handlers only parse the request, call the matching `AuthService` flow and
//! shape the JSON reply. Every failure, including a body or query string
//! that does not parse, is answered with 400 `{"error": "<message>"}`.

use crate::error::AppError;
use crate::extractors::{ClientIp, CorrelationId};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use magic_link_auth::providers::{DirectoryClient, EmailProvider};
use magic_link_auth::{AuthError, AuthService, Identity};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request to email a sign-in link.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignInRequest {
    /// Email address of an existing identity.
    pub email: String,
}

/// Request to register a new identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    /// Desired username.
    pub username: String,

    /// Email address.
    pub email: String,

    /// Given name.
    #[serde(default)]
    pub first_name: String,

    /// Family name.
    #[serde(default)]
    pub last_name: String,
}

impl From<SignUpRequest> for Identity {
    fn from(request: SignUpRequest) -> Self {
        Self {
            email: request.email,
            username: request.username,
            first_name: request.first_name,
            last_name: request.last_name,
        }
    }
}

/// Query string of the verification link.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyQuery {
    /// Sign-in token from the email.
    pub token: Option<String>,
}

/// Success body shared by all routes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuccessResponse {
    /// Confirmation message, or the verified email.
    pub success: String,
}

impl SuccessResponse {
    /// Create a success body.
    #[must_use]
    pub fn new(success: impl Into<String>) -> Self {
        Self {
            success: success.into(),
        }
    }
}

/// Email a sign-in link to a known identity.
///
/// # Endpoint
///
/// ```text
/// POST /request-sign-in
/// Content-Type: application/json
///
/// { "email": "jane@example.com" }
/// ```
///
/// # Response
///
/// - `200 {"success": "Email Sent"}`
/// - `400 {"error": "Email not found"}`, or the delivery/signing error
pub async fn request_sign_in<D, E>(
    State(service): State<Arc<AuthService<D, E>>>,
    correlation_id: CorrelationId,
    client_ip: ClientIp,
    body: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError>
where
    D: DirectoryClient + 'static,
    E: EmailProvider + 'static,
{
    let Json(request) = body.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    tracing::info!(
        correlation_id = %correlation_id.0,
        client_ip = %client_ip.0,
        "Sign-in link requested"
    );

    service.request_sign_in(&request.email).await?;

    Ok(Json(SuccessResponse::new("Email Sent")))
}

/// Register a new identity in the directory.
///
/// # Endpoint
///
/// ```text
/// POST /sign-up
/// Content-Type: application/json
///
/// { "username": "jane", "email": "jane@example.com", "firstName": "Jane", "lastName": "Doe" }
/// ```
///
/// # Response
///
/// - `200 {"success": "User added successfully"}`
/// - `400 {"error": "Email already active"}`, `"Username already active"`
///   or `"Error adding user"`
pub async fn sign_up<D, E>(
    State(service): State<Arc<AuthService<D, E>>>,
    correlation_id: CorrelationId,
    client_ip: ClientIp,
    body: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError>
where
    D: DirectoryClient + 'static,
    E: EmailProvider + 'static,
{
    let Json(request) = body.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    tracing::info!(
        correlation_id = %correlation_id.0,
        client_ip = %client_ip.0,
        "Sign-up requested"
    );

    service.sign_up(Identity::from(request)).await?;

    Ok(Json(SuccessResponse::new("User added successfully")))
}

/// Verify the token from a sign-in link.
///
/// # Endpoint
///
/// ```text
/// GET /verify-sign-in?token=eyJhbGciOi...
/// ```
///
/// # Response
///
/// - `200 {"success": "<email the token was issued for>"}`
/// - `400 {"error": "..."}` for an invalid, expired or missing token
#[allow(clippy::unused_async)]
pub async fn verify_sign_in<D, E>(
    State(service): State<Arc<AuthService<D, E>>>,
    correlation_id: CorrelationId,
    query: Result<Query<VerifyQuery>, QueryRejection>,
) -> Result<Json<SuccessResponse>, AppError>
where
    D: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    let Query(query) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let token = query
        .token
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidInput { field: "token" })?;

    let email = service.verify_sign_in(&token)?;

    tracing::info!(correlation_id = %correlation_id.0, "Sign-in link verified");

    Ok(Json(SuccessResponse::new(email)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_request_uses_camel_case() {
        let request: SignUpRequest = serde_json::from_str(
            r#"{"username":"jane","email":"jane@x.com","firstName":"Jane","lastName":"Doe"}"#,
        )
        .unwrap();

        assert_eq!(
            Identity::from(request),
            Identity::new("jane@x.com", "jane", "Jane", "Doe")
        );
    }

    #[test]
    fn test_sign_up_names_are_optional() {
        let request: SignUpRequest =
            serde_json::from_str(r#"{"username":"jane","email":"jane@x.com"}"#).unwrap();

        assert_eq!(request.first_name, "");
        assert_eq!(request.last_name, "");
    }

    #[test]
    fn test_success_body_shape() {
        let body = serde_json::to_value(SuccessResponse::new("Email Sent")).unwrap();
        assert_eq!(body, serde_json::json!({ "success": "Email Sent" }));
    }
}
