//! SMTP email provider implementation using Lettre.

use crate::error::{AuthError, Result};
use crate::providers::{EmailProvider, SignInEmail};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt;

/// SMTP connection and sender settings.
///
/// `Debug` never prints the password.
#[derive(Clone)]
pub struct SmtpConfig {
    /// SMTP server address (e.g., "smtp.mailtrap.io").
    pub host: String,

    /// SMTP server port (2525 or 587 for STARTTLS).
    pub port: u16,

    /// SMTP authentication username.
    pub username: String,

    /// SMTP authentication password.
    pub password: String,

    /// Sender email address.
    pub from_email: String,

    /// Sender display name.
    pub from_name: String,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .finish()
    }
}

/// SMTP email provider using Lettre.
///
/// Sends real emails over STARTTLS, suitable for production use.
///
/// # Examples
///
/// ```ignore
/// use magic_link_auth::providers::{SmtpConfig, SmtpEmailProvider};
///
/// let provider = SmtpEmailProvider::new(&SmtpConfig {
///     host: "smtp.mailtrap.io".to_string(),
///     port: 2525,
///     username: "user".to_string(),
///     password: "secret".to_string(),
///     from_email: "support@example.com".to_string(),
///     from_name: "Example".to_string(),
/// })?;
/// ```
pub struct SmtpEmailProvider {
    /// Async SMTP transport.
    transport: AsyncSmtpTransport<Tokio1Executor>,

    /// Sender mailbox.
    from: Mailbox,
}

impl SmtpEmailProvider {
    /// Create a new SMTP email provider.
    ///
    /// No connection is opened until the first email is sent.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MailDeliveryError`] if the relay host or sender
    /// address is invalid.
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AuthError::MailDeliveryError(format!("SMTP relay error: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let address: Address = config
            .from_email
            .parse()
            .map_err(|e| AuthError::MailDeliveryError(format!("Invalid from address: {e}")))?;

        Ok(Self {
            transport,
            from: Mailbox::new(Some(config.from_name.clone()), address),
        })
    }

    /// Build the message for a sign-in email.
    fn build_message(&self, email: &SignInEmail) -> Result<Message> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| AuthError::MailDeliveryError(format!("Invalid to address: {e}")))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject())
            .header(ContentType::TEXT_HTML)
            .body(email.html_body())
            .map_err(|e| AuthError::MailDeliveryError(format!("Failed to build email: {e}")))
    }
}

impl EmailProvider for SmtpEmailProvider {
    async fn send_sign_in_link(&self, email: &SignInEmail) -> Result<()> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AuthError::MailDeliveryError(format!("Failed to send email: {e}")))?;

        tracing::debug!(to = %email.to, "Sign-in email handed to SMTP relay");
        Ok(())
    }
}
