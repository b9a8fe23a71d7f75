//! Configuration for encrypted fields.
//!
//! Values are read from `PGARMOR_*` environment variables. Applications that
//! manage keys some other way can construct [`Settings`] directly.

use anyhow::{Context, Result};
use pgarmor::CipherKind;
use serde::Deserialize;

/// Validated field-encryption settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Passphrase used for every encrypted field. **Required.**
    pub key: String,

    /// Cipher family, as a pgcrypto name (`"aes"` or `"bf"`).
    #[serde(default = "default_cipher")]
    pub cipher: CipherKind,
}

fn default_cipher() -> CipherKind {
    CipherKind::Aes
}

impl Settings {
    /// Construct settings from explicit values.
    pub fn new(key: impl Into<String>, cipher: CipherKind) -> Self {
        Self {
            key: key.into(),
            cipher,
        }
    }

    /// Load and validate settings from `PGARMOR_KEY` / `PGARMOR_CIPHER`.
    ///
    /// # Errors
    ///
    /// Returns an error if `PGARMOR_KEY` is absent or empty, or if
    /// `PGARMOR_CIPHER` names an unknown cipher.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("PGARMOR"))
            .build()
            .context("failed to build configuration from environment")?;

        let s: Settings = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        s.validate()?;
        Ok(s)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            anyhow::bail!("PGARMOR_KEY is required and must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cipher_is_aes() {
        assert_eq!(default_cipher(), CipherKind::Aes);
    }

    #[test]
    fn validate_rejects_empty_key() {
        let s = Settings::new("", CipherKind::Aes);
        assert!(s.validate().is_err());
        let s = Settings::new("   ", CipherKind::Aes);
        assert!(s.validate().is_err());
    }

    #[test]
    fn validate_accepts_non_empty_key() {
        let s = Settings::new("pass", CipherKind::Blowfish);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn cipher_deserialises_from_pgcrypto_names() {
        let s: Settings = serde_json::from_str(r#"{"key": "pass", "cipher": "bf"}"#).unwrap();
        assert_eq!(s.cipher, CipherKind::Blowfish);
        let s: Settings = serde_json::from_str(r#"{"key": "pass"}"#).unwrap();
        assert_eq!(s.cipher, CipherKind::Aes);
    }
}
