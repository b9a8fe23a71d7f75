//! Transparent pgcrypto-compatible encryption for typed storage fields.
//!
//! An [`EncryptedField`] sits at the storage boundary: on write it serialises
//! a typed value, encrypts it, and armors the ciphertext for storage in a
//! plain text column; on read it dearmors, decrypts, and restores the native
//! type. Text and exact-decimal values survive the round trip with their
//! comparison semantics intact, and the stored form is readable by
//! PostgreSQL's `pgcrypto` extension.

pub mod error;
pub mod field;
pub mod settings;
pub mod store;

pub use error::FieldError;
pub use field::{
    EncryptedDecimalField, EncryptedField, EncryptedTextField, FieldValue, Lookup, Passphrase,
};
pub use settings::Settings;
pub use store::{MemoryStore, Session};
