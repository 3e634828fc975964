//! Sign-in token issuance and verification.
//!
//! A sign-in token is a compact HS256 JWT whose only application claim is the
//! email it was issued for. Tokens are never stored: the signature and the
//! `exp` claim are all the verifier needs, which also means an issued token
//! cannot be revoked before it expires.

use crate::config::SigningSecret;
use crate::constants::SIGN_IN_TOKEN_TTL;
use crate::error::{AuthError, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by a sign-in token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInClaims {
    /// Email the token was issued for.
    pub email: String,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

/// A freshly issued sign-in token.
#[derive(Debug, Clone)]
pub struct SignInToken {
    token: String,
    email: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SignInToken {
    /// The encoded token, as embedded in the sign-in link.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Email bound to this token.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// When the token was issued.
    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// When the token stops verifying.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Consume and return the encoded token.
    #[must_use]
    pub fn into_string(self) -> String {
        self.token
    }
}

/// Signs sign-in tokens with the configured secret.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    secret_configured: bool,
}

impl TokenIssuer {
    /// Create an issuer for `secret`.
    #[must_use]
    pub fn new(secret: &SigningSecret) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            secret_configured: !secret.is_empty(),
        }
    }

    /// Issue a token for `email`, valid for one hour from now.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SigningError`] if the secret is empty or encoding fails.
    pub fn issue(&self, email: &str) -> Result<SignInToken> {
        self.issue_at(email, Utc::now())
    }

    /// Issue a token as if it had been issued at `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SigningError`] if the secret is empty or encoding fails.
    pub fn issue_at(&self, email: &str, issued_at: DateTime<Utc>) -> Result<SignInToken> {
        if !self.secret_configured {
            return Err(AuthError::SigningError("signing secret is empty".to_string()));
        }

        let expires_at = issued_at + SIGN_IN_TOKEN_TTL;
        let claims = SignInClaims {
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.key)
            .map_err(|e| AuthError::SigningError(e.to_string()))?;

        Ok(SignInToken {
            token,
            email: claims.email,
            issued_at,
            expires_at,
        })
    }
}

/// Checks sign-in token signatures and expiry.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a verifier for `secret`.
    #[must_use]
    pub fn new(secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify `token` and return the claims it carries.
    ///
    /// # Errors
    ///
    /// - [`AuthError::TokenExpired`] if the signature is good but `exp` has passed
    /// - [`AuthError::TokenInvalid`] for anything else (bad signature, malformed)
    pub fn verify_claims(&self, token: &str) -> Result<SignInClaims> {
        jsonwebtoken::decode::<SignInClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            })
    }

    /// Verify `token` and return the bound email.
    ///
    /// # Errors
    ///
    /// See [`TokenVerifier::verify_claims`].
    pub fn verify(&self, token: &str) -> Result<String> {
        self.verify_claims(token).map(|claims| claims.email)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn pair(secret: &str) -> (TokenIssuer, TokenVerifier) {
        let secret = SigningSecret::new(secret);
        (TokenIssuer::new(&secret), TokenVerifier::new(&secret))
    }

    fn flip(token: &str, index: usize) -> String {
        token
            .char_indices()
            .map(|(i, c)| {
                if i != index {
                    c
                } else if c == 'A' {
                    'B'
                } else {
                    'A'
                }
            })
            .collect()
    }

    #[test]
    fn test_issue_then_verify_returns_email() {
        let (issuer, verifier) = pair("test-secret");
        let token = issuer.issue("jane@x.com").unwrap();

        assert_eq!(verifier.verify(token.as_str()).unwrap(), "jane@x.com");
    }

    #[test]
    fn test_expiry_is_one_hour_after_issuance() {
        let (issuer, verifier) = pair("test-secret");
        let token = issuer.issue("jane@x.com").unwrap();

        assert_eq!(token.expires_at() - token.issued_at(), Duration::hours(1));

        let claims = verifier.verify_claims(token.as_str()).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_issued_two_hours_ago_is_expired() {
        let (issuer, verifier) = pair("test-secret");
        let token = issuer
            .issue_at("jane@x.com", Utc::now() - Duration::hours(2))
            .unwrap();

        assert_eq!(verifier.verify(token.as_str()), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_token_just_inside_window_verifies() {
        let (issuer, verifier) = pair("test-secret");
        let token = issuer
            .issue_at("jane@x.com", Utc::now() - Duration::minutes(59))
            .unwrap();

        assert!(verifier.verify(token.as_str()).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let (issuer, _) = pair("secret-a");
        let (_, verifier) = pair("secret-b");
        let token = issuer.issue("jane@x.com").unwrap();

        assert_eq!(verifier.verify(token.as_str()), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_expired_and_forged_is_invalid_not_expired() {
        let (issuer, _) = pair("secret-a");
        let (_, verifier) = pair("secret-b");
        let token = issuer
            .issue_at("jane@x.com", Utc::now() - Duration::hours(2))
            .unwrap();

        assert_eq!(verifier.verify(token.as_str()), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let (_, verifier) = pair("test-secret");

        assert_eq!(verifier.verify(""), Err(AuthError::TokenInvalid));
        assert_eq!(verifier.verify("not-a-token"), Err(AuthError::TokenInvalid));
        assert_eq!(verifier.verify("a.b.c"), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_unsigned_token_is_rejected() {
        let (issuer, verifier) = pair("test-secret");
        let token = issuer.issue("jane@x.com").unwrap().into_string();
        let unsigned = token.rsplit_once('.').map(|(head, _)| format!("{head}.")).unwrap();

        assert_eq!(verifier.verify(&unsigned), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_empty_secret_is_signing_error() {
        let (issuer, _) = pair("");

        assert!(matches!(
            issuer.issue("jane@x.com"),
            Err(AuthError::SigningError(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_round_trip(email in "[a-z0-9.]{1,16}@[a-z]{1,10}\\.(com|org|net)") {
            let (issuer, verifier) = pair("prop-secret");
            let token = issuer.issue(&email).unwrap();
            prop_assert_eq!(verifier.verify(token.as_str()).unwrap(), email);
        }

        #[test]
        fn prop_any_mutation_is_invalid(index in 0usize..512) {
            let (issuer, verifier) = pair("prop-secret");
            let token = issuer.issue("jane@x.com").unwrap().into_string();
            let index = index % token.len();
            let tampered = flip(&token, index);

            prop_assert_eq!(verifier.verify(&tampered), Err(AuthError::TokenInvalid));
        }
    }
}
