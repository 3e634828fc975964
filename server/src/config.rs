//! Configuration management for the magic link server.
//!
//! Loads configuration from environment variables once at startup. Required
//! variables fail loudly; everything else has a default.

use magic_link_auth::providers::{HttpDirectoryConfig, SmtpConfig};
use magic_link_auth::{MagicLinkConfig, SigningSecret};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors. Any of these stops the process before it binds a socket.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {value:?}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Raw value as found in the environment.
        value: String,
    },
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// How long in-flight requests may take to drain on shutdown.
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    /// `host:port` to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// How sign-in emails leave the process.
#[derive(Debug, Clone)]
pub enum MailConfig {
    /// Send over SMTP.
    Smtp(SmtpConfig),
    /// Log the link instead of sending it.
    Console,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Application server configuration.
    pub server: ServerConfig,
    /// Identity directory API.
    pub directory: HttpDirectoryConfig,
    /// Mail delivery.
    pub mail: MailConfig,
    /// Secret for signing sign-in tokens.
    pub signing_secret: SigningSecret,
    /// Link base URL and application name.
    pub magic_link: MagicLinkConfig,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a value
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value if set.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(lookup);

        let app_name = vars.or("APP_NAME", "Love & Understanding");

        let mail = match vars.or("MAIL_TRANSPORT", "smtp").to_ascii_lowercase().as_str() {
            "smtp" => MailConfig::Smtp(SmtpConfig {
                host: vars.or("SMTP_HOST", "smtp.mailtrap.io"),
                port: vars.parse_or("SMTP_PORT", 2525)?,
                username: vars.required("SMTP_USERNAME")?,
                password: vars.required("SMTP_PASSWORD")?,
                from_email: vars.or("MAIL_FROM", "support@loveandunderstanding.org"),
                from_name: vars.or("MAIL_FROM_NAME", &app_name),
            }),
            "console" => MailConfig::Console,
            other => {
                return Err(ConfigError::Invalid {
                    name: "MAIL_TRANSPORT",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            server: ServerConfig {
                host: vars.or("HOST", "0.0.0.0"),
                port: vars.parse_or("PORT", 3000)?,
                shutdown_timeout: Duration::from_secs(vars.parse_or("SHUTDOWN_TIMEOUT", 30)?),
            },
            directory: HttpDirectoryConfig {
                api_url: vars.or("DIRECTORY_API_URL", "https://api.webflow.com"),
                api_token: vars.required("DIRECTORY_API_TOKEN")?,
                collection_id: vars.required("DIRECTORY_COLLECTION_ID")?,
            },
            mail,
            signing_secret: SigningSecret::new(vars.required("SIGNING_SECRET")?),
            magic_link: MagicLinkConfig::new(vars.or("LINK_BASE_URL", "http://localhost:3000"))
                .with_app_name(app_name),
        })
    }
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    /// Set and not blank.
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::Missing(name))
    }

    fn or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T: FromStr>(&self, name: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(name) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value }),
            None => Ok(default),
        }
    }
}
