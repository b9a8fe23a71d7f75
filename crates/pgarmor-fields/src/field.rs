//! Typed encrypted fields with explicit `to_storage`/`from_storage` methods.

use std::marker::PhantomData;
use std::str::FromStr;

use pgarmor::{armor, dearmor, decrypt, encrypt, CipherKind};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::FieldError;
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Field value serialisation
// ---------------------------------------------------------------------------

/// A scalar that can live inside an [`EncryptedField`].
///
/// Implementations must round-trip exactly: `from_plaintext(to_plaintext(v))`
/// recovers `v` with full precision.
pub trait FieldValue: Sized {
    /// Serialise the value to the plaintext bytes that get encrypted.
    fn to_plaintext(&self) -> Vec<u8>;

    /// Restore the value from decrypted plaintext bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Value`] if the bytes are not a valid encoding of
    /// this type — the usual sign of reading with the wrong field type.
    fn from_plaintext(bytes: &[u8]) -> Result<Self, FieldError>;
}

impl FieldValue for String {
    fn to_plaintext(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn from_plaintext(bytes: &[u8]) -> Result<Self, FieldError> {
        String::from_utf8(bytes.to_vec())
            .map_err(|_| FieldError::Value("stored text is not valid UTF-8".into()))
    }
}

impl FieldValue for Decimal {
    fn to_plaintext(&self) -> Vec<u8> {
        // Canonical decimal string; scale is preserved ("75248.77" stays
        // "75248.77"), so the round trip is exact.
        self.to_string().into_bytes()
    }

    fn from_plaintext(bytes: &[u8]) -> Result<Self, FieldError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| FieldError::Value("stored decimal is not valid UTF-8".into()))?;
        Decimal::from_str(text)
            .map_err(|e| FieldError::Value(format!("stored decimal is unparseable: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Key material
// ---------------------------------------------------------------------------

/// Passphrase bytes held by a field.
///
/// The derived cipher key only exists inside an individual encrypt/decrypt
/// call. When this type is dropped, the memory is overwritten with zeroes to
/// minimise the window during which the passphrase lives in RAM.
#[derive(Clone)]
pub struct Passphrase(Vec<u8>);

impl Passphrase {
    /// Wrap passphrase bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for Passphrase {
    fn drop(&mut self) {
        // Zero the passphrase on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("Passphrase([REDACTED])")
    }
}

impl From<&str> for Passphrase {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes().to_vec())
    }
}

impl From<String> for Passphrase {
    fn from(s: String) -> Self {
        Self::new(s.into_bytes())
    }
}

// ---------------------------------------------------------------------------
// Encrypted field adapter
// ---------------------------------------------------------------------------

/// Comparison operators supported against encrypted columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// `=`
    Exact,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
}

impl Lookup {
    /// Apply this operator with the stored value on the left-hand side.
    pub fn compare<T: Ord>(self, stored: &T, query: &T) -> bool {
        match self {
            Lookup::Exact => stored == query,
            Lookup::Gt => stored > query,
            Lookup::Gte => stored >= query,
            Lookup::Lt => stored < query,
            Lookup::Lte => stored <= query,
        }
    }
}

/// Adapter that maps a typed field through encryption at the storage boundary.
///
/// On write: serialise → pad → CBC-encrypt (zero IV) → armor. On read: the
/// exact inverse. The stored form is a PGP ASCII armored string that the
/// database extension's own `dearmor`/`decrypt` can process.
#[derive(Debug, Clone)]
pub struct EncryptedField<T> {
    cipher: CipherKind,
    passphrase: Passphrase,
    _value: PhantomData<fn() -> T>,
}

/// An encrypted text column.
pub type EncryptedTextField = EncryptedField<String>;

/// An encrypted exact-decimal column.
pub type EncryptedDecimalField = EncryptedField<Decimal>;

impl<T: FieldValue> EncryptedField<T> {
    /// Build a field from validated [`Settings`].
    pub fn new(settings: &Settings) -> Self {
        Self::with_key(settings.cipher, settings.key.as_str())
    }

    /// Build a field with an explicit cipher and passphrase.
    pub fn with_key(cipher: CipherKind, passphrase: impl Into<Passphrase>) -> Self {
        Self {
            cipher,
            passphrase: passphrase.into(),
            _value: PhantomData,
        }
    }

    /// Encrypt `value` into its armored storage representation.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Crypto`] if the passphrase cannot be used with
    /// the configured cipher.
    pub fn to_storage(&self, value: &T) -> Result<String, FieldError> {
        let ciphertext = encrypt(&value.to_plaintext(), self.passphrase.bytes(), self.cipher)?;
        debug!(
            cipher = %self.cipher,
            ciphertext_len = ciphertext.len(),
            "encrypted field value"
        );
        Ok(armor(&ciphertext))
    }

    /// Decrypt an armored storage representation back to the native type.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Crypto`] for malformed armor or a wrong
    /// key/corrupted ciphertext, and [`FieldError::Value`] if the decrypted
    /// plaintext is not a valid value of this field's type.
    pub fn from_storage(&self, stored: &str) -> Result<T, FieldError> {
        let ciphertext = dearmor(stored)?;
        let plaintext = decrypt(&ciphertext, self.passphrase.bytes(), self.cipher)?;
        debug!(cipher = %self.cipher, "decrypted field value");
        T::from_plaintext(&plaintext)
    }
}

impl<T: FieldValue + Ord> EncryptedField<T> {
    /// Decrypt `stored` and compare it against `query` with `lookup`.
    ///
    /// This is how filters run over encrypted columns: decrypt first, then
    /// compare with native ordering, so decimal precision is exact.
    ///
    /// # Errors
    ///
    /// Propagates any [`from_storage`](Self::from_storage) failure.
    pub fn matches(&self, stored: &str, lookup: Lookup, query: &T) -> Result<bool, FieldError> {
        Ok(lookup.compare(&self.from_storage(stored)?, query))
    }
}
