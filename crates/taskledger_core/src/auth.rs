//! Credential verification boundary.
//!
//! # Responsibility
//! - Define the pass/fail check the outer access gate calls.
//! - Provide a single-account implementation configured at startup.
//!
//! # Invariants
//! - Core services never call into this module; only the outer layer does.
//! - Secret comparison does not short-circuit on the first differing byte.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Pass/fail check for a username/password pair.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Rejected verifier configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialConfigError {
    EmptyUsername,
    EmptyPassword,
}

impl Display for CredentialConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "credential username cannot be empty"),
            Self::EmptyPassword => write!(f, "credential password cannot be empty"),
        }
    }
}

impl Error for CredentialConfigError {}

/// Accepts exactly one configured username/password pair.
#[derive(Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialConfigError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() {
            return Err(CredentialConfigError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialConfigError::EmptyPassword);
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        // Evaluate both so timing does not reveal which half mismatched.
        let username_ok = constant_time_eq(username, &self.username);
        let password_ok = constant_time_eq(password, &self.password);
        username_ok & password_ok
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();
    if a_bytes.len() != b_bytes.len() {
        return false;
    }
    a_bytes
        .iter()
        .zip(b_bytes)
        .fold(0u8, |diff, (x, y)| diff | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::{CredentialConfigError, CredentialVerifier, StaticCredentials};

    #[test]
    fn accepts_only_the_configured_pair() {
        let verifier = StaticCredentials::new("admin", "s3cret").unwrap();
        assert!(verifier.verify("admin", "s3cret"));
        assert!(!verifier.verify("admin", "s3cres"));
        assert!(!verifier.verify("Admin", "s3cret"));
        assert!(!verifier.verify("admin", ""));
    }

    #[test]
    fn rejects_empty_configuration() {
        assert_eq!(
            StaticCredentials::new("", "x").unwrap_err(),
            CredentialConfigError::EmptyUsername
        );
        assert_eq!(
            StaticCredentials::new("admin", "").unwrap_err(),
            CredentialConfigError::EmptyPassword
        );
    }

    #[test]
    fn debug_output_redacts_password() {
        let verifier = StaticCredentials::new("admin", "s3cret").unwrap();
        let rendered = format!("{verifier:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("s3cret"));
    }
}
