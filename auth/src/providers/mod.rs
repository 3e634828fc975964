//! Providers for the external collaborators of the auth flows.
//!
//! This module defines traits for the identity directory and for email
//! delivery, along with the concrete implementations used in production
//! and development.
//!
//! # Architecture
//!
//! Providers are **interfaces**, not implementations. `AuthService` depends
//! on these traits, and the binary wires in concrete implementations.
//!
//! ```text
//! ┌──────────────────┐      ┌──────────────────────┐
//! │ AuthService      │─────▶│ DirectoryClient      │  list / create
//! │ - sign in        │      │  HttpDirectoryClient │
//! │ - sign up        │      └──────────────────────┘
//! │ - verify         │      ┌──────────────────────┐
//! │                  │─────▶│ EmailProvider        │  sign-in link
//! └──────────────────┘      │  SmtpEmailProvider   │
//!                           │  ConsoleEmailProvider│
//!                           └──────────────────────┘
//! ```
//!
//! This enables:
//! - **Testing**: Use mocks (in-memory, deterministic)
//! - **Production**: Use the hosted directory API and SMTP
//! - **Development**: Log sign-in links to the console

pub mod console_email;
pub mod directory;
pub mod email;
pub mod http_directory;
pub mod smtp_email;
pub mod transport;

// Re-export provider traits and implementations
pub use console_email::ConsoleEmailProvider;
pub use directory::DirectoryClient;
pub use email::{EmailProvider, SignInEmail};
pub use http_directory::{HttpDirectoryClient, HttpDirectoryConfig};
pub use smtp_email::{SmtpConfig, SmtpEmailProvider};
pub use transport::MailTransport;
