//! Sign-in flow: send a magic link to a known email.

use super::{record_outcome, require, AuthService};
use crate::constants::metric_names::SIGN_IN_TOTAL;
use crate::error::{AuthError, Result};
use crate::identity::email_exists;
use crate::providers::{DirectoryClient, EmailProvider, SignInEmail};
use chrono::{DateTime, Utc};

/// Result of a successful sign-in request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInSent {
    /// Email the link was sent to.
    pub email: String,

    /// When the link stops working.
    pub expires_at: DateTime<Utc>,
}

impl<D, E> AuthService<D, E>
where
    D: DirectoryClient,
    E: EmailProvider,
{
    /// Email a sign-in link to `email`.
    ///
    /// # Flow
    ///
    /// 1. Fetch the full directory snapshot
    /// 2. Fail with `EmailNotFound` unless some identity has this email (any case)
    /// 3. Issue a one-hour token bound to the email as submitted
    /// 4. Email `{base_url}/verify-sign-in?token={token}`
    ///
    /// The token does not depend on the snapshot staying current: an identity
    /// deleted right after step 1 still gets a working link.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidInput`] if `email` is blank
    /// - [`AuthError::DirectoryUnavailable`] if the directory cannot be read
    /// - [`AuthError::EmailNotFound`] if no identity has this email
    /// - [`AuthError::SigningError`] if the token cannot be signed
    /// - [`AuthError::MailDeliveryError`] if the email cannot be sent
    #[tracing::instrument(skip(self), name = "request_sign_in")]
    pub async fn request_sign_in(&self, email: &str) -> Result<SignInSent> {
        let result = self.run_sign_in(email).await;
        record_outcome(SIGN_IN_TOTAL, &result);
        result
    }

    async fn run_sign_in(&self, email: &str) -> Result<SignInSent> {
        require("email", email)?;

        let identities = self.directory.list_identities().await?;
        if !email_exists(&identities, email) {
            return Err(AuthError::EmailNotFound);
        }

        let token = self.issuer.issue(email)?;
        let message = SignInEmail {
            to: email.to_string(),
            link: self.config.sign_in_link(token.as_str()),
            app_name: self.config.app_name.clone(),
            expires_at: token.expires_at(),
        };

        self.email.send_sign_in_link(&message).await?;

        tracing::info!(expires_at = %token.expires_at(), "Sign-in email sent");
        Ok(SignInSent {
            email: message.to,
            expires_at: token.expires_at(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{MagicLinkConfig, SigningSecret};
    use crate::identity::Identity;
    use crate::mocks::{InMemoryDirectory, MockEmailProvider};
    use crate::token::TokenVerifier;

    fn service(
        directory: InMemoryDirectory,
        email: MockEmailProvider,
    ) -> AuthService<InMemoryDirectory, MockEmailProvider> {
        AuthService::new(
            directory,
            email,
            &SigningSecret::new("test-secret"),
            MagicLinkConfig::new("http://localhost:3000"),
        )
    }

    fn jane() -> Identity {
        Identity::new("jane@x.com", "jane", "Jane", "Doe")
    }

    #[tokio::test]
    async fn test_sends_link_for_known_email() {
        let mailbox = MockEmailProvider::new();
        let service = service(InMemoryDirectory::with_identities(vec![jane()]), mailbox.clone());

        let sent = service.request_sign_in("jane@x.com").await.unwrap();
        assert_eq!(sent.email, "jane@x.com");

        let delivered = mailbox.sent();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].to, "jane@x.com");

        let token = delivered[0]
            .link
            .strip_prefix("http://localhost:3000/verify-sign-in?token=")
            .unwrap();
        let verifier = TokenVerifier::new(&SigningSecret::new("test-secret"));
        assert_eq!(verifier.verify(token).unwrap(), "jane@x.com");
    }

    #[tokio::test]
    async fn test_unknown_email_sends_nothing() {
        let mailbox = MockEmailProvider::new();
        let service = service(InMemoryDirectory::with_identities(vec![jane()]), mailbox.clone());

        assert_eq!(
            service.request_sign_in("bob@x.com").await,
            Err(AuthError::EmailNotFound)
        );
        assert!(mailbox.sent().is_empty());
    }

    #[tokio::test]
    async fn test_case_insensitive_lookup_keeps_submitted_email() {
        let mailbox = MockEmailProvider::new();
        let service = service(InMemoryDirectory::with_identities(vec![jane()]), mailbox.clone());

        let sent = service.request_sign_in("Jane@X.com").await.unwrap();

        assert_eq!(sent.email, "Jane@X.com");
        assert_eq!(mailbox.sent()[0].to, "Jane@X.com");
    }

    #[tokio::test]
    async fn test_delivery_failure_is_reported() {
        let service = service(
            InMemoryDirectory::with_identities(vec![jane()]),
            MockEmailProvider::failing(),
        );

        assert!(matches!(
            service.request_sign_in("jane@x.com").await,
            Err(AuthError::MailDeliveryError(_))
        ));
    }

    #[tokio::test]
    async fn test_directory_outage_is_distinct_from_not_found() {
        let directory = InMemoryDirectory::with_identities(vec![jane()]);
        directory.set_unavailable(true);
        let service = service(directory, MockEmailProvider::new());

        assert!(matches!(
            service.request_sign_in("jane@x.com").await,
            Err(AuthError::DirectoryUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_email_is_rejected() {
        let service = service(InMemoryDirectory::new(), MockEmailProvider::new());

        assert_eq!(
            service.request_sign_in(" ").await,
            Err(AuthError::InvalidInput { field: "email" })
        );
    }

    #[tokio::test]
    async fn test_empty_secret_is_signing_error() {
        let service = AuthService::new(
            InMemoryDirectory::with_identities(vec![jane()]),
            MockEmailProvider::new(),
            &SigningSecret::new(""),
            MagicLinkConfig::default(),
        );

        assert!(matches!(
            service.request_sign_in("jane@x.com").await,
            Err(AuthError::SigningError(_))
        ));
    }
}
