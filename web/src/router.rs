//! Router composition.

use crate::error::AppError;
use crate::handlers::{auth, health, landing};
use crate::middleware::correlation_id_layer;
use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use magic_link_auth::constants::VERIFY_SIGN_IN_PATH;
use magic_link_auth::providers::{DirectoryClient, EmailProvider};
use magic_link_auth::AuthService;
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// Create the router for the three authentication endpoints.
///
/// # Routes
///
/// - `POST /request-sign-in` - Email a sign-in link
/// - `POST /sign-up` - Register a new identity
/// - `GET /verify-sign-in?token=...` - Verify a sign-in link
///
/// # Example
///
/// ```rust,ignore
/// let service = Arc::new(AuthService::new(directory, mailer, &secret, config));
///
/// let app = Router::new()
///     .merge(auth_router(service))
///     .layer(TraceLayer::new_for_http());
/// ```
pub fn auth_router<D, E>(service: Arc<AuthService<D, E>>) -> Router
where
    D: DirectoryClient + 'static,
    E: EmailProvider + 'static,
{
    Router::new()
        .route("/request-sign-in", post(auth::request_sign_in::<D, E>))
        .route("/sign-up", post(auth::sign_up::<D, E>))
        .route(VERIFY_SIGN_IN_PATH, get(auth::verify_sign_in::<D, E>))
        .with_state(service)
}

/// Create the full application: auth routes, landing page and health check,
/// wrapped in correlation ids, request tracing and panic containment.
///
/// # Routes
///
/// - `GET /` - Landing page
/// - `GET /health` - Liveness check
/// - everything in [`auth_router`]
pub fn app_router<D, E>(service: Arc<AuthService<D, E>>) -> Router
where
    D: DirectoryClient + 'static,
    E: EmailProvider + 'static,
{
    Router::new()
        .route("/", get(landing::landing_page))
        .route("/health", get(health::health_check))
        .merge(auth_router(service))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
}

/// Answer a panicking handler with a JSON 500 instead of dropping the connection.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());

    AppError::internal("An internal error occurred")
        .with_source(anyhow::anyhow!("handler panicked: {detail}"))
        .into_response()
}
