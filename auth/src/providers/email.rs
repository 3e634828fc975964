//! Email provider trait.

use crate::error::Result;
use chrono::{DateTime, Utc};

/// A sign-in email ready to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInEmail {
    /// Recipient email address.
    pub to: String,

    /// Full verification link, token included.
    pub link: String,

    /// Application name for the subject and heading.
    pub app_name: String,

    /// When the embedded token expires.
    pub expires_at: DateTime<Utc>,
}

impl SignInEmail {
    /// Subject line of the email.
    #[must_use]
    pub fn subject(&self) -> String {
        format!("Sign In To {}", self.app_name)
    }

    /// HTML body of the email.
    #[must_use]
    pub fn html_body(&self) -> String {
        let Self { link, app_name, .. } = self;
        let expires_minutes = (self.expires_at - Utc::now()).num_minutes().max(0);

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Sign In To {app_name}</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h1>Sign In To {app_name}</h1>
        <p><a href="{link}" target="_blank">Click here to Sign In</a></p>
        <p style="color: #666; font-size: 14px;">This link will expire in {expires_minutes} minutes.</p>
        <p style="color: #666; font-size: 12px; margin-top: 40px;">
            Or copy and paste this link into your browser:<br>
            {link}
        </p>
    </div>
</body>
</html>
"#
        )
    }
}

/// Email provider.
///
/// This trait abstracts over email delivery (SMTP, console logging, mocks).
pub trait EmailProvider: Send + Sync {
    /// Send a sign-in link email.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MailDeliveryError`](crate::AuthError::MailDeliveryError) if:
    /// - An address cannot be parsed
    /// - The transport cannot connect or authenticate
    /// - The server rejects the message
    fn send_sign_in_link(
        &self,
        email: &SignInEmail,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn email() -> SignInEmail {
        SignInEmail {
            to: "jane@x.com".to_string(),
            link: "http://localhost:3000/verify-sign-in?token=abc".to_string(),
            app_name: "Love & Understanding".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[test]
    fn test_subject() {
        assert_eq!(email().subject(), "Sign In To Love & Understanding");
    }

    #[test]
    fn test_body_contains_link() {
        let body = email().html_body();
        assert!(body.contains(r#"href="http://localhost:3000/verify-sign-in?token=abc""#));
        assert!(body.contains("Click here to Sign In"));
    }
}
