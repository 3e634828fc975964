//! Authentication flows.
//!
//! `AuthService` ties the providers together. Each flow lives in its own
//! module as an `impl` block on the service:
//!
//! - [`sign_in`]: directory lookup → token issuance → email dispatch
//! - [`sign_up`]: uniqueness checks → directory record creation
//! - [`verify`]: token verification → authenticated email
//!
//! Flows await every remote call in sequence and return a typed
//! [`AuthError`] on the first failure. Nothing is retried.

pub mod sign_in;
pub mod sign_up;
pub mod verify;

use crate::config::{MagicLinkConfig, SigningSecret};
use crate::error::{AuthError, Result};
use crate::reservation::ReservationRegistry;
use crate::token::{TokenIssuer, TokenVerifier};

pub use sign_in::SignInSent;

/// Runs the sign-in, sign-up and verification flows.
///
/// Holds no per-request state. Share it between requests behind an `Arc`.
///
/// # Type Parameters
///
/// - `D`: Identity directory client
/// - `E`: Email provider
pub struct AuthService<D, E> {
    /// Identity directory.
    directory: D,

    /// Email delivery.
    email: E,

    /// Sign-in token issuer.
    issuer: TokenIssuer,

    /// Sign-in token verifier.
    verifier: TokenVerifier,

    /// Link and email settings.
    config: MagicLinkConfig,

    /// In-flight sign-up keys.
    reservations: ReservationRegistry,
}

impl<D, E> AuthService<D, E> {
    /// Create a new auth service.
    ///
    /// # Arguments
    ///
    /// - `directory`: Identity directory client
    /// - `email`: Email provider for sign-in links
    /// - `secret`: Secret used to sign and verify tokens
    /// - `config`: Link base URL and application name
    #[must_use]
    pub fn new(directory: D, email: E, secret: &SigningSecret, config: MagicLinkConfig) -> Self {
        Self {
            directory,
            email,
            issuer: TokenIssuer::new(secret),
            verifier: TokenVerifier::new(secret),
            config,
            reservations: ReservationRegistry::new(),
        }
    }

    /// Identity directory client.
    #[must_use]
    pub const fn directory(&self) -> &D {
        &self.directory
    }

    /// Email provider.
    #[must_use]
    pub const fn email_provider(&self) -> &E {
        &self.email
    }

    /// Token issuer.
    #[must_use]
    pub const fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Link and email settings.
    #[must_use]
    pub const fn config(&self) -> &MagicLinkConfig {
        &self.config
    }
}

/// Reject a blank field before any remote call.
fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AuthError::InvalidInput { field });
    }
    Ok(())
}

/// Count the outcome of a flow and log failures at a level matching their cause.
fn record_outcome<T>(metric: &'static str, result: &Result<T>) {
    let outcome = match result {
        Ok(_) => "success",
        Err(error) => error.kind(),
    };
    metrics::counter!(metric, "outcome" => outcome).increment(1);

    match result {
        Err(error) if error.is_user_error() => {
            tracing::info!(outcome, error = %error, "Request rejected");
        }
        Err(error) => {
            tracing::error!(outcome, error = ?error, "Request failed");
        }
        Ok(_) => {}
    }
}
