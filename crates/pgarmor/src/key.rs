//! Passphrase-to-key padding for the AES cipher family.

/// Pad or truncate `passphrase` to a legal AES key length.
///
/// AES keys must be exactly 16, 24, or 32 bytes. pgcrypto zero-pads the
/// passphrase to the next legal length and truncates anything beyond 32
/// bytes; this function must match that behaviour exactly so that ciphertext
/// is interoperable with keys derived by the database extension.
pub fn aes_pad_key(passphrase: &[u8]) -> Vec<u8> {
    let target = match passphrase.len() {
        0..=16 => 16,
        17..=24 => 24,
        _ => 32,
    };
    let mut key = passphrase[..passphrase.len().min(32)].to_vec();
    key.resize(target, 0);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_passphrase_zero_padded_to_16() {
        assert_eq!(aes_pad_key(b"pass"), b"pass\0\0\0\0\0\0\0\0\0\0\0\0");
    }

    #[test]
    fn empty_passphrase_becomes_all_zero_key() {
        assert_eq!(aes_pad_key(b""), vec![0u8; 16]);
    }

    #[test]
    fn exact_16_bytes_unchanged() {
        let key = aes_pad_key(b"0123456789abcdef");
        assert_eq!(key, b"0123456789abcdef");
    }

    #[test]
    fn medium_passphrase_padded_to_24() {
        let key = aes_pad_key(b"0123456789abcdefg");
        assert_eq!(key.len(), 24);
        assert_eq!(&key[..17], b"0123456789abcdefg");
        assert!(key[17..].iter().all(|&b| b == 0));
    }

    #[test]
    fn long_passphrase_padded_to_32() {
        let key = aes_pad_key(b"0123456789abcdef0123456789");
        assert_eq!(key.len(), 32);
    }

    #[test]
    fn oversized_passphrase_truncated_at_32() {
        let key = aes_pad_key(&[0xAB; 48]);
        assert_eq!(key, vec![0xAB; 32]);
    }
}
