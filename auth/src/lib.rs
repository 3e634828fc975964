//! # Magic Link Authentication
//!
//! Passwordless sign-in and sign-up for a single application whose users
//! live in an externally hosted identity directory.
//!
//! ## Features
//!
//! - **Magic links**: one-hour signed tokens emailed as a verification link
//! - **Stateless tokens**: nothing is stored; signature and expiry are the proof
//! - **Uniqueness**: case-insensitive email and username checks on sign-up
//! - **Testable**: providers are traits with in-memory mocks
//!
//! ## Architecture
//!
//! ```text
//! HTTP handler → AuthService flow → DirectoryClient / TokenIssuer / EmailProvider
//! ```
//!
//! ## Example: Sign In
//!
//! ```rust,ignore
//! use magic_link_auth::*;
//!
//! let service = AuthService::new(directory, mailer, &secret, MagicLinkConfig::new(base_url));
//!
//! // 1. Email a link to a known user
//! service.request_sign_in("jane@example.com").await?;
//!
//! // 2. User clicks the link; the token comes back
//! let email = service.verify_sign_in(&token)?;
//! assert_eq!(email, "jane@example.com");
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod constants;
pub mod error;
pub mod flows;
pub mod identity;
pub mod providers;
pub mod reservation;
pub mod token;

// Mock providers for testing
#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use config::{MagicLinkConfig, SigningSecret};
pub use error::{AuthError, Result};
pub use flows::{AuthService, SignInSent};
pub use identity::{email_exists, username_exists, Identity};
pub use token::{SignInClaims, SignInToken, TokenIssuer, TokenVerifier};
