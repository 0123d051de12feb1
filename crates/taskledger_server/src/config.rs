//! Server configuration from environment variables.
//!
//! - `TASKLEDGER_AUTH_USER` / `TASKLEDGER_AUTH_PASSWORD`: required. The one
//!   account allowed through the API gate.
//! - `TASKLEDGER_BIND`: listen address. Defaults to `127.0.0.1:5001`.
//! - `TASKLEDGER_DB_PATH`: SQLite file. Defaults to `taskledger.sqlite3`.
//! - `TASKLEDGER_LOG_LEVEL`: `trace|debug|info|warn|error`. Defaults to the
//!   build-mode level.
//! - `TASKLEDGER_LOG_DIR`: absolute directory for rotated log files.
//!   Logs go to stderr only when unset.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;
use taskledger_core::{default_log_level, StaticCredentials};

const DEFAULT_BIND: &str = "127.0.0.1:5001";
const DEFAULT_DB_PATH: &str = "taskledger.sqlite3";

pub const ENV_BIND: &str = "TASKLEDGER_BIND";
pub const ENV_DB_PATH: &str = "TASKLEDGER_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "TASKLEDGER_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKLEDGER_LOG_DIR";
pub const ENV_AUTH_USER: &str = "TASKLEDGER_AUTH_USER";
pub const ENV_AUTH_PASSWORD: &str = "TASKLEDGER_AUTH_PASSWORD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingEnvVar(&'static str),
    InvalidValue { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEnvVar(key) => write!(f, "missing required environment variable: {key}"),
            Self::InvalidValue { key, message } => write!(f, "invalid value for {key}: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved server settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub credentials: StaticCredentials,
}

impl Config {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_text = get(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind_text
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::InvalidValue {
                key: ENV_BIND,
                message: format!("`{bind_text}`: {err}"),
            })?;

        let username = get(ENV_AUTH_USER).ok_or(ConfigError::MissingEnvVar(ENV_AUTH_USER))?;
        // Passwords keep surrounding whitespace.
        let password = lookup(ENV_AUTH_PASSWORD)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingEnvVar(ENV_AUTH_PASSWORD))?;
        let credentials =
            StaticCredentials::new(username, password).map_err(|err| ConfigError::InvalidValue {
                key: ENV_AUTH_USER,
                message: err.to_string(),
            })?;

        Ok(Self {
            bind_addr,
            db_path: PathBuf::from(get(ENV_DB_PATH).unwrap_or_else(|| DEFAULT_DB_PATH.to_string())),
            log_level: get(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: get(ENV_LOG_DIR),
            credentials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError, ENV_AUTH_PASSWORD, ENV_AUTH_USER, ENV_BIND};
    use std::collections::HashMap;
    use taskledger_core::CredentialVerifier;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_credentials_are_set() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_AUTH_USER, "admin"),
            (ENV_AUTH_PASSWORD, "secret"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5001");
        assert_eq!(config.db_path.to_str(), Some("taskledger.sqlite3"));
        assert_eq!(config.log_dir, None);
        assert!(config.credentials.verify("admin", "secret"));
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[(ENV_AUTH_USER, "admin")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar(ENV_AUTH_PASSWORD));

        let err = Config::from_lookup(lookup_from(&[(ENV_AUTH_PASSWORD, "x")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar(ENV_AUTH_USER));
    }

    #[test]
    fn invalid_bind_address_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            (ENV_AUTH_USER, "admin"),
            (ENV_AUTH_PASSWORD, "secret"),
            (ENV_BIND, "not-an-address"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == ENV_BIND));
    }

    #[test]
    fn debug_output_does_not_leak_password() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_AUTH_USER, "admin"),
            (ENV_AUTH_PASSWORD, "hunter2"),
        ]))
        .unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
