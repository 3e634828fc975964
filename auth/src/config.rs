//! Authentication configuration.
//!
//! These values are built once at startup and handed to the components that
//! need them. Nothing in this crate reads the process environment.

use crate::constants::VERIFY_SIGN_IN_PATH;
use std::fmt;

/// Magic link configuration.
#[derive(Debug, Clone)]
pub struct MagicLinkConfig {
    /// Base URL for sign-in links (e.g., "https://app.example.com").
    ///
    /// Links are formatted as: `{base_url}/verify-sign-in?token={token}`
    pub base_url: String,

    /// Application name shown in the sign-in email.
    pub app_name: String,
}

impl MagicLinkConfig {
    /// Create new magic link configuration.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL for your application (e.g., "https://app.example.com")
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the application name.
    #[must_use]
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    /// URL of the verification endpoint, without the token.
    #[must_use]
    pub fn verify_url(&self) -> String {
        format!(
            "{}{VERIFY_SIGN_IN_PATH}",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Full sign-in link for a token.
    #[must_use]
    pub fn sign_in_link(&self, token: &str) -> String {
        format!("{}?token={token}", self.verify_url())
    }
}

impl Default for MagicLinkConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            app_name: "Love & Understanding".to_string(),
        }
    }
}

/// Secret used to sign and verify sign-in tokens.
///
/// `Debug` never prints the secret.
#[derive(Clone)]
pub struct SigningSecret(String);

impl SigningSecret {
    /// Wrap a secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw secret bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Returns `true` if the secret is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}
