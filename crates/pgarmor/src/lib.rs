//! pgcrypto-compatible encryption primitives: block padding, PGP ASCII armor,
//! key padding, and CBC encrypt/decrypt with an all-zero IV.
//!
//! Everything here is byte-compatible with the output of PostgreSQL's
//! `pgcrypto` extension (`encrypt`/`decrypt`/`armor`/`dearmor`), so values
//! written through this crate can be read back with server-side SQL and vice
//! versa. The cipher implementations themselves come from the RustCrypto
//! `aes`, `blowfish`, and `cbc` crates — this crate only supplies the glue.

pub mod armor;
pub mod cipher;
pub mod error;
pub mod key;
pub mod padding;

pub use armor::{armor, dearmor};
pub use cipher::{decrypt, encrypt, CipherKind};
pub use error::{CryptoError, FormatError};
pub use key::aes_pad_key;
pub use padding::{pad, unpad};
