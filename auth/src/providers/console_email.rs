//! Console email provider for development and testing.

use crate::error::Result;
use crate::providers::{EmailProvider, SignInEmail};
use chrono::Utc;
use tracing::info;

/// Console email provider.
///
/// This provider logs sign-in links instead of sending them.
/// Useful for development where you don't want to send real emails.
///
/// # Examples
///
/// ```ignore
/// use magic_link_auth::providers::ConsoleEmailProvider;
///
/// let provider = ConsoleEmailProvider::new();
/// provider.send_sign_in_link(&email).await?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct ConsoleEmailProvider;

impl ConsoleEmailProvider {
    /// Create a new console email provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EmailProvider for ConsoleEmailProvider {
    async fn send_sign_in_link(&self, email: &SignInEmail) -> Result<()> {
        let expires_minutes = (email.expires_at - Utc::now()).num_minutes();

        info!(
            to = %email.to,
            link = %email.link,
            expires_in = %expires_minutes,
            "📧 Sign-in email (development mode)"
        );
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                     SIGN-IN EMAIL                            ║");
        println!("╠══════════════════════════════════════════════════════════════╣");
        println!("║ To: {:<57}║", email.to);
        println!("║ Subject: {:<52}║", email.subject());
        println!("╠══════════════════════════════════════════════════════════════╣");
        println!("║ This link will expire in {expires_minutes} minutes.{:<23}║", "");
        println!("║                                                              ║");
        println!("║ Sign-in link:                                                ║");
        println!("║ {:<61}║", email.link);
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        Ok(())
    }
}
