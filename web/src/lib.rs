//! Axum HTTP surface for magic link authentication.
//!
//! This crate is the imperative shell around `magic_link_auth::AuthService`:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON, query strings
//! │  - Request parsing                      │  ← Correlation ids, tracing
//! │  - Response serialization               │  ← Panic containment
//! ├─────────────────────────────────────────┤
//! │         AuthService flows               │
//! │  - Directory lookups                    │
//! │  - Token issuance / verification        │
//! │  - Email dispatch                       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Extract data** from the request (JSON body or query string)
//! 3. **Run the flow** on the shared `AuthService`
//! 4. **Map result** to `{"success": ...}` or `{"error": ...}`
//!
//! # Example
//!
//! ```ignore
//! use magic_link_web::app_router;
//!
//! let app = app_router(Arc::new(service));
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{ClientIp, CorrelationId};
pub use middleware::{correlation_id_layer, CorrelationIdExt, CORRELATION_ID_HEADER};
pub use router::{app_router, auth_router};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
