//! Sign-up flow: create an identity with a unique email and username.

use super::{record_outcome, require, AuthService};
use crate::constants::metric_names::SIGN_UP_TOTAL;
use crate::error::{AuthError, Result};
use crate::identity::{email_exists, username_exists, Identity};
use crate::providers::{DirectoryClient, EmailProvider};

impl<D, E> AuthService<D, E>
where
    D: DirectoryClient,
    E: EmailProvider,
{
    /// Register a new identity.
    ///
    /// # Flow
    ///
    /// 1. Reserve the lowercased email and username in this process
    /// 2. Fetch the full directory snapshot
    /// 3. Fail with `EmailAlreadyActive` if the email is taken (any case)
    /// 4. Otherwise fail with `UsernameAlreadyActive` if the username is taken
    /// 5. Create the record
    ///
    /// Steps 2 to 5 are check-then-act against a directory without
    /// conditional writes. The reservation serialises sign-ups within this
    /// process only; another writer can still slip in between 2 and 5.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidInput`] if the email or username is blank
    /// - [`AuthError::DirectoryUnavailable`] if the directory cannot be reached
    /// - [`AuthError::EmailAlreadyActive`] / [`AuthError::UsernameAlreadyActive`]
    /// - [`AuthError::DirectoryWriteError`] if the directory rejects the record
    #[tracing::instrument(
        skip(self, identity),
        name = "sign_up",
        fields(email = %identity.email, username = %identity.username)
    )]
    pub async fn sign_up(&self, identity: Identity) -> Result<Identity> {
        let result = self.run_sign_up(identity).await;
        record_outcome(SIGN_UP_TOTAL, &result);
        result
    }

    async fn run_sign_up(&self, identity: Identity) -> Result<Identity> {
        require("email", &identity.email)?;
        require("username", &identity.username)?;

        let _reservation = self
            .reservations
            .reserve_sign_up(&identity.email, &identity.username)
            .await?;

        let identities = self.directory.list_identities().await?;
        if email_exists(&identities, &identity.email) {
            return Err(AuthError::EmailAlreadyActive);
        }
        if username_exists(&identities, &identity.username) {
            return Err(AuthError::UsernameAlreadyActive);
        }

        self.directory.create_identity(&identity).await?;

        tracing::info!("Identity created");
        Ok(identity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{MagicLinkConfig, SigningSecret};
    use crate::mocks::{InMemoryDirectory, MockEmailProvider};

    fn service(directory: InMemoryDirectory) -> AuthService<InMemoryDirectory, MockEmailProvider> {
        AuthService::new(
            directory,
            MockEmailProvider::new(),
            &SigningSecret::new("test-secret"),
            MagicLinkConfig::default(),
        )
    }

    fn jane() -> Identity {
        Identity::new("jane@x.com", "jane", "Jane", "Doe")
    }

    #[tokio::test]
    async fn test_creates_new_identity() {
        let directory = InMemoryDirectory::new();
        let service = service(directory.clone());

        let created = service.sign_up(jane()).await.unwrap();

        assert_eq!(created, jane());
        assert_eq!(directory.identities(), vec![jane()]);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_regardless_of_case() {
        let directory = InMemoryDirectory::with_identities(vec![Identity::new(
            "a@x.com", "a", "A", "X",
        )]);
        let service = service(directory.clone());

        let result = service
            .sign_up(Identity::new("A@X.com", "other", "O", "X"))
            .await;

        assert_eq!(result, Err(AuthError::EmailAlreadyActive));
        assert_eq!(directory.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_email_checked_before_username() {
        let service = service(InMemoryDirectory::with_identities(vec![jane()]));

        let result = service.sign_up(jane()).await;

        assert_eq!(result, Err(AuthError::EmailAlreadyActive));
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_regardless_of_case() {
        let service = service(InMemoryDirectory::with_identities(vec![jane()]));

        let result = service
            .sign_up(Identity::new("jane2@x.com", "JANE", "Jane", "Two"))
            .await;

        assert_eq!(result, Err(AuthError::UsernameAlreadyActive));
    }

    #[tokio::test]
    async fn test_rejected_write_is_reported() {
        let directory = InMemoryDirectory::new();
        directory.set_reject_writes(true);
        let service = service(directory);

        assert_eq!(
            service.sign_up(jane()).await,
            Err(AuthError::DirectoryWriteError)
        );
    }

    #[tokio::test]
    async fn test_blank_username_is_rejected_before_directory_call() {
        let directory = InMemoryDirectory::new();
        directory.set_unavailable(true);
        let service = service(directory);

        assert_eq!(
            service.sign_up(Identity::new("jane@x.com", "", "Jane", "Doe")).await,
            Err(AuthError::InvalidInput { field: "username" })
        );
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_sign_ups_create_once() {
        let directory = InMemoryDirectory::new();
        let service = service(directory.clone());

        let (first, second) = tokio::join!(
            service.sign_up(jane()),
            service.sign_up(Identity::new("JANE@x.com", "jane-b", "Jane", "B")),
        );

        assert!(first.is_ok());
        assert_eq!(second, Err(AuthError::EmailAlreadyActive));
        assert_eq!(directory.identities().len(), 1);
        assert_eq!(directory.create_calls(), 1);
    }
}
