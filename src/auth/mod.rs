//! Shared-secret authentication.
//!
//! # Responsibilities
//! - Compare the caller-supplied token with the configured secret
//! - Run before any socket or filesystem access for a request
//!
//! # Design Decisions
//! - No secret configured means open mode: every caller is accepted
//! - Comparison is constant time (`subtle`) so the secret cannot be probed byte by byte
//! - An absent token is treated the same as a wrong one

use subtle::ConstantTimeEq;

use crate::config::AuthConfig;
use crate::error::{Result, RuntimeError};

/// Gate guarding every mutating endpoint.
#[derive(Debug, Clone, Default)]
pub struct AuthGate {
    secret: Option<String>,
}

impl AuthGate {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.secret().map(str::to_owned))
    }

    /// Whether a secret is configured.
    pub fn is_enforced(&self) -> bool {
        self.secret.is_some()
    }

    /// Accept or reject a supplied token.
    pub fn check(&self, supplied: Option<&str>) -> Result<()> {
        let Some(secret) = self.secret.as_deref() else {
            return Ok(());
        };

        let matches = supplied
            .map(|token| bool::from(token.as_bytes().ct_eq(secret.as_bytes())))
            .unwrap_or(false);

        if matches {
            Ok(())
        } else {
            tracing::warn!(token_present = supplied.is_some(), "Rejected request with invalid token");
            Err(RuntimeError::Forbidden("Invalid token".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_mode_accepts_anything() {
        let gate = AuthGate::new(None);
        assert!(!gate.is_enforced());
        assert!(gate.check(None).is_ok());
        assert!(gate.check(Some("whatever")).is_ok());
    }

    #[test]
    fn empty_secret_is_open_mode() {
        let gate = AuthGate::new(Some(String::new()));
        assert!(gate.check(None).is_ok());
    }

    #[test]
    fn matching_token_passes() {
        let gate = AuthGate::new(Some("secret".into()));
        assert!(gate.check(Some("secret")).is_ok());
    }

    #[test]
    fn mismatches_are_forbidden() {
        let gate = AuthGate::new(Some("secret".into()));
        for supplied in [None, Some(""), Some("wrong"), Some("secret "), Some("secre")] {
            let err = gate.check(supplied).unwrap_err();
            assert!(matches!(err, RuntimeError::Forbidden(_)), "{supplied:?}");
        }
    }
}
