//! HTTP request handlers.

pub mod auth;
pub mod health;
pub mod landing;

pub use auth::{request_sign_in, sign_up, verify_sign_in, SignInRequest, SignUpRequest, SuccessResponse};
pub use health::health_check;
pub use landing::landing_page;
