//! SMTP configuration for the email digest
//!
//! Built once at process start and passed by reference into the mailer;
//! there is no ambient global config object. Credentials are never silently
//! defaulted: a missing required variable is a configuration error at this
//! boundary.

use crate::{Error, Result};

/// Connection settings for the SMTP relay.
///
/// Environment variables:
/// - `SMTP_HOST` (required)
/// - `SMTP_USERNAME` (required)
/// - `SMTP_PASSWORD` (required)
/// - `SMTP_PORT` (default 587)
/// - `SMTP_USE_TLS` (default true; `0`/`false`/`no` disable)
/// - `SMTP_FROM_ADDRESS` (default: `SMTP_USERNAME`)
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub use_tls: bool,
    pub from_address: String,
}

impl SmtpConfig {
    /// Load SMTP settings from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SmtpConfig::from_env`] but with an injectable lookup,
    /// so tests do not touch process-global environment state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(Error::Config(format!("{} is not set", key))),
            }
        };

        let host = required("SMTP_HOST")?;
        let username = required("SMTP_USERNAME")?;
        let password = required("SMTP_PASSWORD")?;

        let port = match lookup("SMTP_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("SMTP_PORT is not a port number: {}", raw)))?,
            None => 587,
        };

        let use_tls = match lookup("SMTP_USE_TLS") {
            Some(raw) => !matches!(raw.trim().to_lowercase().as_str(), "0" | "false" | "no"),
            None => true,
        };

        let from_address = lookup("SMTP_FROM_ADDRESS")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| username.clone());

        Ok(SmtpConfig {
            host,
            port,
            username,
            password,
            use_tls,
            from_address,
        })
    }
}
