//! CBC encrypt/decrypt pipeline compatible with pgcrypto's `encrypt`/`decrypt`.
//!
//! pgcrypto's two-argument `encrypt(data, key, type)` runs CBC with an
//! all-zero IV and PKCS padding. Matching that exactly — zero IV, always-pad
//! policy, zero-padded AES keys — is what allows ciphertext written by this
//! crate to be decrypted by the database extension and vice versa.

use aes::{Aes128, Aes192, Aes256};
use blowfish::Blowfish;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, InnerIvInit, KeyInit};
use serde::Deserialize;

use crate::error::CryptoError;
use crate::key::aes_pad_key;
use crate::padding::{pad, unpad};

/// Cipher families supported by the pgcrypto `encrypt`/`decrypt` functions.
///
/// Names deserialise from pgcrypto's identifiers: `"aes"` and `"bf"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherKind {
    /// AES (rijndael-128): 16-byte blocks, 16/24/32-byte keys.
    Aes,
    /// Blowfish: 8-byte blocks, variable 4..=56-byte keys.
    #[serde(rename = "bf", alias = "blowfish")]
    Blowfish,
}

impl CipherKind {
    /// Block size in bytes for this cipher family.
    pub const fn block_size(self) -> usize {
        match self {
            CipherKind::Aes => 16,
            CipherKind::Blowfish => 8,
        }
    }

    /// The pgcrypto name for this cipher family.
    pub const fn name(self) -> &'static str {
        match self {
            CipherKind::Aes => "aes",
            CipherKind::Blowfish => "bf",
        }
    }
}

impl std::fmt::Display for CipherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for CipherKind {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aes" => Ok(CipherKind::Aes),
            "bf" | "blowfish" => Ok(CipherKind::Blowfish),
            other => Err(CryptoError::UnknownCipher(other.to_owned())),
        }
    }
}

/// Encrypt `plaintext` under `key` with the given cipher family.
///
/// The plaintext is PKCS-padded (always, even when block-aligned) and
/// encrypted in CBC mode with an all-zero IV. AES passphrases are zero-padded
/// to the next legal key length via [`aes_pad_key`]; Blowfish takes the
/// passphrase bytes as-is.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKeyLength`] if the key cannot be used with
/// the selected cipher (Blowfish keys must be 4..=56 bytes).
pub fn encrypt(plaintext: &[u8], key: &[u8], kind: CipherKind) -> Result<Vec<u8>, CryptoError> {
    let padded = pad(plaintext, kind.block_size());
    match kind {
        CipherKind::Aes => {
            let key = aes_pad_key(key);
            let ct = match key.len() {
                16 => cbc_encrypt(new_cipher::<Aes128>(&key)?, &padded),
                24 => cbc_encrypt(new_cipher::<Aes192>(&key)?, &padded),
                _ => cbc_encrypt(new_cipher::<Aes256>(&key)?, &padded),
            };
            Ok(ct)
        }
        CipherKind::Blowfish => {
            let cipher: Blowfish = new_cipher(key)?;
            Ok(cbc_encrypt(cipher, &padded))
        }
    }
}

/// Decrypt `ciphertext` produced by [`encrypt`] (or by pgcrypto itself) and
/// strip the PKCS padding.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKeyLength`] for an unusable key, and
/// [`CryptoError::Decryption`] when the ciphertext is empty, not
/// block-aligned, or decrypts to data with invalid padding — the signature of
/// a wrong key or corrupted ciphertext.
pub fn decrypt(ciphertext: &[u8], key: &[u8], kind: CipherKind) -> Result<Vec<u8>, CryptoError> {
    let block_size = kind.block_size();
    if ciphertext.is_empty() || ciphertext.len() % block_size != 0 {
        return Err(CryptoError::Decryption);
    }

    let padded = match kind {
        CipherKind::Aes => {
            let key = aes_pad_key(key);
            match key.len() {
                16 => cbc_decrypt(new_cipher::<Aes128>(&key)?, ciphertext)?,
                24 => cbc_decrypt(new_cipher::<Aes192>(&key)?, ciphertext)?,
                _ => cbc_decrypt(new_cipher::<Aes256>(&key)?, ciphertext)?,
            }
        }
        CipherKind::Blowfish => {
            let cipher: Blowfish = new_cipher(key)?;
            cbc_decrypt(cipher, ciphertext)?
        }
    };

    // Garbage padding after decryption means the key was wrong or the data
    // corrupted; surface it as a decryption failure, not a format error.
    unpad(&padded, block_size)
        .map(<[u8]>::to_vec)
        .map_err(|_| CryptoError::Decryption)
}

fn new_cipher<C: KeyInit>(key: &[u8]) -> Result<C, CryptoError> {
    C::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength(key.len()))
}

fn cbc_encrypt<C>(cipher: C, padded: &[u8]) -> Vec<u8>
where
    C: BlockCipher + BlockEncryptMut,
{
    // All-zero IV, as assumed by pgcrypto's two-argument encrypt().
    cbc::Encryptor::inner_iv_init(cipher, &Default::default())
        .encrypt_padded_vec_mut::<NoPadding>(padded)
}

fn cbc_decrypt<C>(cipher: C, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError>
where
    C: BlockCipher + BlockDecryptMut,
{
    cbc::Decryptor::inner_iv_init(cipher, &Default::default())
        .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
        .map_err(|_| CryptoError::Decryption)
}
