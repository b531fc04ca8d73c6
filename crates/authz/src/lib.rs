//! Shared-secret guard.
//!
//! Every request must present the configured secret in a fixed header. The
//! check is skipped entirely when the server runs in debug mode.

use anyhow::bail;
use hadith_kernel::settings::Settings;
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("secret header is missing")]
    Missing,
    #[error("secret header does not match")]
    Mismatch,
}

#[derive(Clone)]
enum Mode {
    Bypass,
    Require(Vec<u8>),
}

/// Decides whether a request may proceed based on its secret header.
#[derive(Clone)]
pub struct SecretGuard {
    header: String,
    mode: Mode,
}

impl SecretGuard {
    /// Guard requiring `secret` in `header`.
    pub fn require(header: impl Into<String>, secret: impl Into<Vec<u8>>) -> Self {
        Self {
            header: header.into(),
            mode: Mode::Require(secret.into()),
        }
    }

    /// Guard letting every request through.
    pub fn bypass(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            mode: Mode::Bypass,
        }
    }

    /// Build the guard for the configured environment. Outside debug mode a
    /// non-empty secret is mandatory.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let auth = &settings.auth;
        if settings.server.debug {
            tracing::warn!(header = %auth.header, "debug mode: shared-secret check disabled");
            return Ok(Self::bypass(auth.header.clone()));
        }

        match auth.secret.as_deref() {
            Some(secret) if !secret.is_empty() => {
                Ok(Self::require(auth.header.clone(), secret.as_bytes()))
            }
            _ => bail!("auth.secret must be set unless server.debug is enabled"),
        }
    }

    /// Header the secret is read from.
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn is_bypassed(&self) -> bool {
        matches!(self.mode, Mode::Bypass)
    }

    /// Check the value presented in the secret header, if any.
    pub fn check(&self, presented: Option<&[u8]>) -> Result<(), AuthError> {
        let expected = match &self.mode {
            Mode::Bypass => return Ok(()),
            Mode::Require(expected) => expected,
        };

        let presented = presented.ok_or(AuthError::Missing)?;
        if bool::from(presented.ct_eq(expected)) {
            Ok(())
        } else {
            Err(AuthError::Mismatch)
        }
    }
}

impl std::fmt::Debug for SecretGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretGuard")
            .field("header", &self.header)
            .field("bypassed", &self.is_bypassed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_secret() {
        let guard = SecretGuard::require("x-aws-secret", "s3cret");
        assert_eq!(guard.check(Some(b"s3cret")), Ok(()));
    }

    #[test]
    fn rejects_missing_or_wrong_secret() {
        let guard = SecretGuard::require("x-aws-secret", "s3cret");
        assert_eq!(guard.check(None), Err(AuthError::Missing));
        assert_eq!(guard.check(Some(b"s3cre")), Err(AuthError::Mismatch));
        assert_eq!(guard.check(Some(b"")), Err(AuthError::Mismatch));
    }

    #[test]
    fn bypass_accepts_anything() {
        let guard = SecretGuard::bypass("x-aws-secret");
        assert_eq!(guard.check(None), Ok(()));
        assert!(guard.is_bypassed());
    }

    #[test]
    fn settings_require_secret_outside_debug() {
        let mut settings = Settings::default();
        assert!(SecretGuard::from_settings(&settings).is_err());

        settings.auth.secret = Some(String::new());
        assert!(SecretGuard::from_settings(&settings).is_err());

        settings.auth.secret = Some("s3cret".into());
        let guard = SecretGuard::from_settings(&settings).unwrap();
        assert!(!guard.is_bypassed());
        assert_eq!(guard.header(), "x-aws-secret");

        settings.server.debug = true;
        assert!(SecretGuard::from_settings(&settings).unwrap().is_bypassed());
    }

    #[test]
    fn debug_output_hides_secret() {
        let guard = SecretGuard::require("x-aws-secret", "s3cret");
        assert!(!format!("{guard:?}").contains("s3cret"));
    }
}
