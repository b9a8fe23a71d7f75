//! Error types for the codec layer.

use thiserror::Error;

/// Malformed padding or armor input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The input is empty where at least one block was expected.
    #[error("input is empty")]
    Empty,

    /// The block size is outside the representable range for PKCS padding.
    #[error("block size {0} is not in 1..=255")]
    InvalidBlockSize(usize),

    /// The input length is not a whole number of blocks.
    #[error("input length {len} is not a multiple of the block size {block_size}")]
    NotBlockAligned { len: usize, block_size: usize },

    /// The final byte is not a valid pad length for this block size.
    #[error("padding byte {byte:#04x} is outside the valid range 1..={block_size}")]
    BadPaddingByte { byte: u8, block_size: usize },

    /// The trailing pad bytes do not all carry the pad length value.
    #[error("padding bytes are inconsistent")]
    InconsistentPadding,

    /// No `-----BEGIN PGP MESSAGE-----` line was found.
    #[error("armor header line not found")]
    MissingHeader,

    /// No `-----END PGP MESSAGE-----` line was found.
    #[error("armor footer line not found")]
    MissingFooter,

    /// The armor body or checksum line is not valid base64.
    #[error("invalid base64 in armor body")]
    InvalidBase64,

    /// The CRC-24 checksum line does not match the decoded data.
    #[error("armor checksum mismatch: computed {computed:#08x}, stored {stored:#08x}")]
    ChecksumMismatch { computed: u32, stored: u32 },
}

/// Errors produced by the CBC encrypt/decrypt pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Malformed padding or armor.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The key cannot be used with the selected cipher.
    #[error("invalid key length: {0} bytes")]
    InvalidKeyLength(usize),

    /// The cipher name is not one pgcrypto supports here.
    #[error("unknown cipher: {0:?} (expected \"aes\" or \"bf\")")]
    UnknownCipher(String),

    /// Wrong key or corrupted ciphertext. Decryption produced data whose
    /// padding does not verify, or the ciphertext is not block-aligned.
    #[error("decryption failed: wrong key or corrupted ciphertext")]
    Decryption,
}
