//! Runtime selection between mail providers.

use crate::error::Result;
use crate::providers::{ConsoleEmailProvider, EmailProvider, SignInEmail, SmtpEmailProvider};

/// Mail transport chosen at startup.
///
/// `AuthService` is generic over a single [`EmailProvider`]; this enum lets the
/// binary pick SMTP or console delivery from configuration without changing
/// the service type.
pub enum MailTransport {
    /// Deliver over SMTP.
    Smtp(SmtpEmailProvider),

    /// Log to the console.
    Console(ConsoleEmailProvider),
}

impl MailTransport {
    /// Short label for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Smtp(_) => "smtp",
            Self::Console(_) => "console",
        }
    }
}

impl EmailProvider for MailTransport {
    async fn send_sign_in_link(&self, email: &SignInEmail) -> Result<()> {
        match self {
            Self::Smtp(provider) => provider.send_sign_in_link(email).await,
            Self::Console(provider) => provider.send_sign_in_link(email).await,
        }
    }
}
