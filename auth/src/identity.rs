//! Identity records and the uniqueness predicates over a directory snapshot.
//!
//! The directory offers no query-by-field, so uniqueness is decided by a
//! full scan of the list returned by `DirectoryClient::list_identities`.
//! The predicates here never perform I/O.

use serde::{Deserialize, Serialize};

/// A user record held by the identity directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Email address.
    pub email: String,

    /// Username (unique, case-insensitive).
    pub username: String,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,
}

impl Identity {
    /// Create a new identity.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// Returns `true` if some identity's email equals `email`, ignoring case.
///
/// # Examples
///
/// ```
/// # use magic_link_auth::identity::{email_exists, Identity};
/// let snapshot = vec![Identity::new("a@x.com", "a", "A", "X")];
/// assert!(email_exists(&snapshot, "A@X.com"));
/// assert!(!email_exists(&snapshot, "b@x.com"));
/// ```
#[must_use]
pub fn email_exists(identities: &[Identity], email: &str) -> bool {
    let email = email.to_lowercase();
    identities
        .iter()
        .any(|identity| identity.email.to_lowercase() == email)
}

/// Returns `true` if some identity's username equals `username`, ignoring case.
#[must_use]
pub fn username_exists(identities: &[Identity], username: &str) -> bool {
    let username = username.to_lowercase();
    identities
        .iter()
        .any(|identity| identity.username.to_lowercase() == username)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn jane() -> Identity {
        Identity::new("jane@x.com", "jane", "Jane", "Doe")
    }

    #[test]
    fn test_empty_snapshot_has_nothing() {
        assert!(!email_exists(&[], "jane@x.com"));
        assert!(!username_exists(&[], "jane"));
    }

    #[test]
    fn test_email_match_ignores_case() {
        let snapshot = vec![jane()];
        assert!(email_exists(&snapshot, "JANE@X.COM"));
        assert!(email_exists(&snapshot, "jane@x.com"));
        assert!(!email_exists(&snapshot, "jane@y.com"));
    }

    #[test]
    fn test_username_match_ignores_case() {
        let snapshot = vec![jane()];
        assert!(username_exists(&snapshot, "Jane"));
        assert!(!username_exists(&snapshot, "newjane"));
    }

    #[test]
    fn test_email_is_not_matched_against_username() {
        let snapshot = vec![Identity::new("a@x.com", "b@x.com", "A", "X")];
        assert!(!email_exists(&snapshot, "b@x.com"));
        assert!(!username_exists(&snapshot, "a@x.com"));
    }

    #[test]
    fn test_identity_json_uses_camel_case() {
        let json = serde_json::to_value(jane()).unwrap_or_default();
        assert_eq!(json["firstName"], "Jane");
        assert_eq!(json["lastName"], "Doe");
    }

    proptest! {
        #[test]
        fn prop_email_exists_iff_some_lowercase_match(
            emails in prop::collection::vec("[a-zA-Z]{1,6}@[a-zA-Z]{1,4}\\.com", 0..8),
            probe in "[a-zA-Z]{1,6}@[a-zA-Z]{1,4}\\.com",
        ) {
            let snapshot: Vec<Identity> = emails
                .iter()
                .map(|e| Identity::new(e.clone(), "user", "F", "L"))
                .collect();
            let expected = emails.iter().any(|e| e.to_lowercase() == probe.to_lowercase());
            prop_assert_eq!(email_exists(&snapshot, &probe), expected);
        }

        #[test]
        fn prop_username_exists_iff_some_lowercase_match(
            names in prop::collection::vec("[a-zA-Z0-9]{1,8}", 0..8),
            probe in "[a-zA-Z0-9]{1,8}",
        ) {
            let snapshot: Vec<Identity> = names
                .iter()
                .map(|n| Identity::new("x@x.com", n.clone(), "F", "L"))
                .collect();
            let expected = names.iter().any(|n| n.to_lowercase() == probe.to_lowercase());
            prop_assert_eq!(username_exists(&snapshot, &probe), expected);
        }

        #[test]
        fn prop_case_changes_never_matter(email in "[a-z]{1,6}@[a-z]{1,4}\\.com") {
            let snapshot = vec![Identity::new(email.clone(), "user", "F", "L")];
            prop_assert!(email_exists(&snapshot, &email.to_uppercase()));
        }
    }
}
