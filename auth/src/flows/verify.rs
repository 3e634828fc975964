//! Verification flow: turn a sign-in token back into an email.

use super::{record_outcome, AuthService};
use crate::constants::metric_names::VERIFY_TOTAL;
use crate::error::Result;

impl<D, E> AuthService<D, E> {
    /// Verify a sign-in token and return the email it authenticates.
    ///
    /// A valid signature and an unexpired `exp` are the whole proof; the
    /// directory is not consulted.
    ///
    /// # Errors
    ///
    /// - [`AuthError::TokenExpired`](crate::AuthError::TokenExpired) if the token is past its window
    /// - [`AuthError::TokenInvalid`](crate::AuthError::TokenInvalid) if it is forged or malformed
    #[tracing::instrument(skip_all, name = "verify_sign_in")]
    pub fn verify_sign_in(&self, token: &str) -> Result<String> {
        let result = self.verifier.verify(token);
        record_outcome(VERIFY_TOTAL, &result);
        if let Ok(email) = &result {
            tracing::info!(email = %email, "Sign-in verified");
        }
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{MagicLinkConfig, SigningSecret};
    use crate::error::AuthError;
    use crate::mocks::{InMemoryDirectory, MockEmailProvider};
    use chrono::{Duration, Utc};

    fn service() -> AuthService<InMemoryDirectory, MockEmailProvider> {
        AuthService::new(
            InMemoryDirectory::new(),
            MockEmailProvider::new(),
            &SigningSecret::new("test-secret"),
            MagicLinkConfig::default(),
        )
    }

    #[test]
    fn test_verifies_without_directory_lookup() {
        let service = service();
        service.directory().set_unavailable(true);
        let token = service.issuer().issue("jane@x.com").unwrap();

        assert_eq!(service.verify_sign_in(token.as_str()).unwrap(), "jane@x.com");
    }

    #[test]
    fn test_expired_token() {
        let service = service();
        let token = service
            .issuer()
            .issue_at("jane@x.com", Utc::now() - Duration::hours(2))
            .unwrap();

        assert_eq!(
            service.verify_sign_in(token.as_str()),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn test_garbage_token() {
        assert_eq!(service().verify_sign_in("garbage"), Err(AuthError::TokenInvalid));
    }
}
