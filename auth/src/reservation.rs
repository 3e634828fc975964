//! In-process reservations for sign-up uniqueness keys.
//!
//! The directory has no conditional create, so sign-up is check-then-act.
//! A [`Reservation`] holds an async lock per lowercased email and username
//! from the directory fetch until the create returns. Two sign-ups in this
//! process that share either key run one after the other, and the second
//! sees the first one's record.
//!
//! Reservations do not span processes. Replicas of the service, or writes
//! made directly to the directory, can still race a sign-up.

use crate::error::{AuthError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

type Slot = Arc<tokio::sync::Mutex<()>>;

/// Registry of reservation slots, keyed by normalized uniqueness key.
///
/// Cloning shares the registry.
#[derive(Debug, Clone, Default)]
pub struct ReservationRegistry {
    slots: Arc<Mutex<HashMap<String, Slot>>>,
}

impl ReservationRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the email and username of a sign-up.
    ///
    /// Waits while another reservation holds either key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InternalError`] if the registry lock is poisoned.
    pub async fn reserve_sign_up(&self, email: &str, username: &str) -> Result<Reservation> {
        self.reserve([
            format!("email:{}", email.to_lowercase()),
            format!("username:{}", username.to_lowercase()),
        ])
        .await
    }

    /// Reserve a set of keys.
    ///
    /// Keys are acquired in sorted order so overlapping reservations cannot
    /// deadlock.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InternalError`] if the registry lock is poisoned.
    pub async fn reserve(&self, keys: impl IntoIterator<Item = String>) -> Result<Reservation> {
        let mut keys: Vec<String> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();

        let mut reservation = Reservation {
            registry: self.clone(),
            keys: Vec::with_capacity(keys.len()),
            guards: Vec::with_capacity(keys.len()),
        };

        for key in keys {
            let slot = self.slot(&key)?;
            reservation.keys.push(key);
            reservation.guards.push(slot.lock_owned().await);
        }

        Ok(reservation)
    }

    /// Number of keys currently tracked (held or awaited).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.lock().map(|slots| slots.len()).unwrap_or(0)
    }

    /// Returns `true` if no key is held or awaited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &str) -> Result<Slot> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| AuthError::InternalError("reservation registry poisoned".to_string()))?;

        Ok(Arc::clone(slots.entry(key.to_string()).or_default()))
    }

    /// Drop slots nobody holds or waits on.
    fn release(&self, keys: &[String]) {
        let Ok(mut slots) = self.slots.lock() else {
            return;
        };

        for key in keys {
            if slots.get(key).is_some_and(|slot| Arc::strong_count(slot) == 1) {
                slots.remove(key);
            }
        }
    }
}

/// Held reservation. Keys are released on drop.
#[derive(Debug)]
pub struct Reservation {
    registry: ReservationRegistry,
    keys: Vec<String>,
    guards: Vec<OwnedMutexGuard<()>>,
}

impl Reservation {
    /// Keys held by this reservation, sorted.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        self.guards.clear();
        self.registry.release(&self.keys);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_keys_are_normalized() {
        let registry = ReservationRegistry::new();
        let reservation = registry.reserve_sign_up("Jane@X.com", "JANE").await.unwrap();

        assert_eq!(reservation.keys(), ["email:jane@x.com", "username:jane"]);
    }

    #[tokio::test]
    async fn test_slots_removed_after_release() {
        let registry = ReservationRegistry::new();
        {
            let _reservation = registry.reserve_sign_up("a@x.com", "a").await.unwrap();
            assert_eq!(registry.len(), 2);
        }
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_reservation_waits() {
        let registry = ReservationRegistry::new();
        let first = registry.reserve_sign_up("a@x.com", "a").await.unwrap();

        let contender = registry.clone();
        let waiting = tokio::spawn(async move {
            contender.reserve_sign_up("A@X.COM", "other").await.map(|_| ())
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(first);
        tokio::time::timeout(Duration::from_secs(1), waiting)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_disjoint_reservations_do_not_block() {
        let registry = ReservationRegistry::new();
        let _first = registry.reserve_sign_up("a@x.com", "a").await.unwrap();

        let second = tokio::time::timeout(
            Duration::from_secs(1),
            registry.reserve_sign_up("b@x.com", "b"),
        )
        .await;

        assert!(second.is_ok());
    }
}
