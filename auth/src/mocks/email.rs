//! Mock email provider for testing.

use crate::error::{AuthError, Result};
use crate::providers::{EmailProvider, SignInEmail};
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock email provider.
///
/// Records every email it is asked to send instead of sending it.
#[derive(Debug, Clone)]
pub struct MockEmailProvider {
    /// Whether to simulate success or failure.
    pub should_succeed: bool,

    sent: Arc<Mutex<Vec<SignInEmail>>>,
}

impl MockEmailProvider {
    /// Create a new mock email provider that succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            should_succeed: true,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock email provider whose deliveries fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            should_succeed: false,
            ..Self::new()
        }
    }

    /// Emails delivered so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SignInEmail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl Default for MockEmailProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailProvider for MockEmailProvider {
    fn send_sign_in_link(&self, email: &SignInEmail) -> impl Future<Output = Result<()>> + Send {
        let should_succeed = self.should_succeed;
        let sent = Arc::clone(&self.sent);
        let email = email.clone();

        async move {
            if !should_succeed {
                return Err(AuthError::MailDeliveryError(
                    "mock transport refused delivery".to_string(),
                ));
            }

            sent.lock()
                .map_err(|_| AuthError::InternalError("mailbox lock poisoned".to_string()))?
                .push(email);
            Ok(())
        }
    }
}
