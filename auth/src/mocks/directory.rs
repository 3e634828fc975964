//! In-memory identity directory for testing.

use crate::error::{AuthError, Result};
use crate::identity::Identity;
use crate::providers::DirectoryClient;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory identity directory.
///
/// Like the hosted directory it enforces nothing: duplicate records are
/// accepted. Both operations yield to the scheduler once, after the
/// snapshot is taken for `list_identities` and before the write for
/// `create_identity`, so interleavings between concurrent flows are real.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    identities: Arc<Mutex<Vec<Identity>>>,
    unavailable: Arc<AtomicBool>,
    reject_writes: Arc<AtomicBool>,
    create_calls: Arc<AtomicUsize>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory holding `identities`.
    #[must_use]
    pub fn with_identities(identities: Vec<Identity>) -> Self {
        Self {
            identities: Arc::new(Mutex::new(identities)),
            ..Self::default()
        }
    }

    /// Make every call fail with `DirectoryUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make `create_identity` fail with `DirectoryWriteError`.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Current contents.
    #[must_use]
    pub fn identities(&self) -> Vec<Identity> {
        self.identities
            .lock()
            .map(|identities| identities.clone())
            .unwrap_or_default()
    }

    /// Number of `create_identity` calls, successful or not.
    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AuthError::DirectoryUnavailable(
                "in-memory directory marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

impl DirectoryClient for InMemoryDirectory {
    fn list_identities(&self) -> impl Future<Output = Result<Vec<Identity>>> + Send {
        let this = self.clone();

        async move {
            this.check_available()?;
            let snapshot = this
                .identities
                .lock()
                .map_err(|_| AuthError::InternalError("directory lock poisoned".to_string()))?
                .clone();
            tokio::task::yield_now().await;
            Ok(snapshot)
        }
    }

    fn create_identity(&self, identity: &Identity) -> impl Future<Output = Result<()>> + Send {
        let this = self.clone();
        let identity = identity.clone();

        async move {
            this.create_calls.fetch_add(1, Ordering::SeqCst);
            this.check_available()?;
            tokio::task::yield_now().await;

            if this.reject_writes.load(Ordering::SeqCst) {
                return Err(AuthError::DirectoryWriteError);
            }

            this.identities
                .lock()
                .map_err(|_| AuthError::InternalError("directory lock poisoned".to_string()))?
                .push(identity);
            Ok(())
        }
    }
}
