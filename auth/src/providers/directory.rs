//! Identity directory trait.

use crate::error::Result;
use crate::identity::Identity;

/// Client for the external identity directory.
///
/// The directory only supports reading every record and creating a record.
/// There is no query-by-field and no conditional create, so callers that
/// need uniqueness must scan a snapshot and accept that it can go stale
/// before the create lands.
pub trait DirectoryClient: Send + Sync {
    /// Fetch every identity currently in the directory.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DirectoryUnavailable`](crate::AuthError::DirectoryUnavailable)
    /// if the directory cannot be reached or its response cannot be read.
    fn list_identities(&self) -> impl std::future::Future<Output = Result<Vec<Identity>>> + Send;

    /// Create a new identity record.
    ///
    /// Creation is attempted once and never retried.
    ///
    /// # Errors
    ///
    /// - [`AuthError::DirectoryWriteError`](crate::AuthError::DirectoryWriteError)
    ///   if the directory answers with anything but success
    /// - [`AuthError::DirectoryUnavailable`](crate::AuthError::DirectoryUnavailable)
    ///   if the directory cannot be reached
    fn create_identity(
        &self,
        identity: &Identity,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
