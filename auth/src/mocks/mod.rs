//! Mock provider implementations for testing.
//!
//! This module provides simple, in-memory implementations of the provider
//! traits for use in unit and integration tests.

pub mod directory;
pub mod email;

pub use directory::InMemoryDirectory;
pub use email::MockEmailProvider;
