//! Error types for sign-in and sign-up operations.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Error taxonomy for the authentication flows.
///
/// The `Display` text of each variant is the message returned to the
/// caller, so variants that wrap an upstream detail keep that detail out
/// of the message and only expose it through logging.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Validation Errors
    // ═══════════════════════════════════════════════════════════

    /// No identity in the directory carries this email.
    #[error("Email not found")]
    EmailNotFound,

    /// An identity with this email already exists.
    #[error("Email already active")]
    EmailAlreadyActive,

    /// An identity with this username already exists.
    #[error("Username already active")]
    UsernameAlreadyActive,

    /// A required request field is blank.
    #[error("Missing required field: {field}")]
    InvalidInput {
        /// Name of the offending field
        field: &'static str,
    },

    // ═══════════════════════════════════════════════════════════
    // Token Errors
    // ═══════════════════════════════════════════════════════════

    /// Token signature does not validate or the token is malformed.
    #[error("Invalid sign-in token")]
    TokenInvalid,

    /// Token was valid but its expiry has passed.
    #[error("Sign-in token has expired")]
    TokenExpired,

    // ═══════════════════════════════════════════════════════════
    // Upstream Errors
    // ═══════════════════════════════════════════════════════════

    /// The token could not be signed.
    #[error("Failed to sign token")]
    SigningError(String),

    /// The directory could not be reached or returned garbage.
    #[error("Identity directory unavailable")]
    DirectoryUnavailable(String),

    /// The directory rejected a new identity record.
    #[error("Error adding user")]
    DirectoryWriteError,

    /// The sign-in email could not be delivered.
    #[error("Failed to send sign-in email")]
    MailDeliveryError(String),

    /// Internal error (should not be exposed to users).
    #[error("Internal error")]
    InternalError(String),
}

impl AuthError {
    /// Returns `true` if this error is caused by what the caller submitted.
    ///
    /// # Examples
    ///
    /// ```
    /// # use magic_link_auth::AuthError;
    /// assert!(AuthError::EmailNotFound.is_user_error());
    /// assert!(AuthError::TokenExpired.is_user_error());
    /// assert!(!AuthError::DirectoryWriteError.is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::EmailNotFound
                | Self::EmailAlreadyActive
                | Self::UsernameAlreadyActive
                | Self::InvalidInput { .. }
                | Self::TokenInvalid
                | Self::TokenExpired
        )
    }

    /// Returns `true` if this error comes from a collaborator rather than the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// # use magic_link_auth::AuthError;
    /// assert!(AuthError::DirectoryUnavailable("timeout".into()).is_upstream_error());
    /// assert!(!AuthError::UsernameAlreadyActive.is_upstream_error());
    /// ```
    #[must_use]
    pub const fn is_upstream_error(&self) -> bool {
        matches!(
            self,
            Self::SigningError(_)
                | Self::DirectoryUnavailable(_)
                | Self::DirectoryWriteError
                | Self::MailDeliveryError(_)
        )
    }

    /// Short, stable label used for metrics and log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::EmailNotFound => "email_not_found",
            Self::EmailAlreadyActive => "email_already_active",
            Self::UsernameAlreadyActive => "username_already_active",
            Self::InvalidInput { .. } => "invalid_input",
            Self::TokenInvalid => "token_invalid",
            Self::TokenExpired => "token_expired",
            Self::SigningError(_) => "signing_error",
            Self::DirectoryUnavailable(_) => "directory_unavailable",
            Self::DirectoryWriteError => "directory_write_error",
            Self::MailDeliveryError(_) => "mail_delivery_error",
            Self::InternalError(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_messages() {
        assert_eq!(AuthError::EmailNotFound.to_string(), "Email not found");
        assert_eq!(AuthError::EmailAlreadyActive.to_string(), "Email already active");
        assert_eq!(
            AuthError::UsernameAlreadyActive.to_string(),
            "Username already active"
        );
        assert_eq!(AuthError::DirectoryWriteError.to_string(), "Error adding user");
    }

    #[test]
    fn test_upstream_detail_not_in_message() {
        let err = AuthError::DirectoryUnavailable("connection refused 10.0.0.3".into());
        assert!(!err.to_string().contains("10.0.0.3"));
    }

    #[test]
    fn test_token_errors_are_distinct() {
        assert_ne!(AuthError::TokenInvalid, AuthError::TokenExpired);
        assert_ne!(AuthError::TokenInvalid.kind(), AuthError::TokenExpired.kind());
    }
}
