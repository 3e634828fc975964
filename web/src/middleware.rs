//! Correlation ID middleware.
//!
//! Every request gets a correlation ID: the caller's `X-Correlation-ID`
//! when it is a valid UUID, otherwise a fresh UUID v4. The ID is stored in
//! request extensions, attached to a tracing span wrapping the handler, and
//! echoed back in the response header.
//!
//! # Example
//!
//! ```ignore
//! use axum::Router;
//! use magic_link_web::middleware::correlation_id_layer;
//!
//! let app = Router::new()
//!     .route("/request-sign-in", post(request_sign_in))
//!     .layer(correlation_id_layer());
//! ```

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    response::Response,
};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Create a layer that adds correlation ID tracking to all requests.
#[must_use]
pub const fn correlation_id_layer() -> CorrelationIdLayer {
    CorrelationIdLayer
}

/// Layer for correlation ID tracking.
#[derive(Clone, Copy, Debug)]
pub struct CorrelationIdLayer;

impl<S> Layer<S> for CorrelationIdLayer {
    type Service = CorrelationIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorrelationIdMiddleware { inner }
    }
}

/// Middleware service for correlation ID tracking.
#[derive(Clone, Debug)]
pub struct CorrelationIdMiddleware<S> {
    inner: S,
}

impl<S> Service<Request> for CorrelationIdMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let correlation_id = incoming_correlation_id(req.headers()).unwrap_or_else(Uuid::new_v4);
        req.extensions_mut().insert(correlation_id);

        let span = tracing::info_span!(
            "http_request",
            correlation_id = %correlation_id,
            method = %req.method(),
            path = %req.uri().path(),
        );
        let fut = self.inner.call(req).instrument(span);

        Box::pin(async move {
            let mut response = fut.await?;
            echo_correlation_id(&mut response, correlation_id);
            Ok(response)
        })
    }
}

/// Correlation ID sent by the caller, if it is a valid UUID.
pub(crate) fn incoming_correlation_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(CORRELATION_ID_HEADER)?
        .to_str()
        .ok()
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
}

fn echo_correlation_id(response: &mut Response, correlation_id: Uuid) {
    let rendered = correlation_id.hyphenated().to_string();
    if let Ok(value) = HeaderValue::from_str(&rendered) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
}

/// Read the correlation ID the middleware stored on a request.
pub trait CorrelationIdExt {
    /// Correlation ID from request extensions.
    ///
    /// Returns `None` if the correlation ID middleware is not installed.
    fn try_correlation_id(&self) -> Option<Uuid>;
}

impl<B> CorrelationIdExt for axum::http::Request<B> {
    fn try_correlation_id(&self) -> Option<Uuid> {
        self.extensions().get::<Uuid>().copied()
    }
}
