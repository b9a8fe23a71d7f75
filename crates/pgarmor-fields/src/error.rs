//! Error types for the field adapter layer.

use pgarmor::{CryptoError, FormatError};
use thiserror::Error;

/// Errors surfaced by encrypted field reads and writes.
///
/// None of these are recovered silently: a decryption failure means either a
/// key mismatch or data corruption, and the caller must decide what to do.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// Padding, armor, or decryption failure from the codec layer.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Decryption succeeded but the plaintext is not a valid value of the
    /// field's type (bad UTF-8, unparseable decimal).
    #[error("stored value could not be decoded: {0}")]
    Value(String),

    /// The crypto extension has not been enabled for this session.
    #[error("pgcrypto extension is not enabled for this session")]
    ExtensionUnavailable,
}

impl From<FormatError> for FieldError {
    fn from(e: FormatError) -> Self {
        FieldError::Crypto(CryptoError::Format(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_error_wraps_through_crypto() {
        let e: FieldError = FormatError::MissingHeader.into();
        assert!(matches!(
            e,
            FieldError::Crypto(CryptoError::Format(FormatError::MissingHeader))
        ));
    }

    #[test]
    fn display_is_caller_friendly() {
        let e = FieldError::ExtensionUnavailable;
        assert!(e.to_string().contains("not enabled"));
    }
}
