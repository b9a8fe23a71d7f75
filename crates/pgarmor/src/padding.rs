//! PKCS-style block padding, matching pgcrypto's `encrypt` exactly.
//!
//! pgcrypto always appends padding, even when the plaintext already fills a
//! whole number of blocks — an aligned input gains one full extra block. That
//! policy is what makes `unpad` unambiguous, and it must be preserved for
//! ciphertext produced here to be decryptable by the database extension.

use crate::error::FormatError;

/// Extend `data` with PKCS padding up to the next multiple of `block_size`.
///
/// Appends `n` bytes of value `n`, where `n = block_size - (len % block_size)`.
/// If `data` is already block-aligned, a full extra block of padding is
/// appended so that [`unpad`] can always recover the original length.
///
/// `block_size` must be in `1..=255` (the pad length is carried in a single
/// byte). The block sizes used by [`crate::CipherKind`] are 8 and 16.
pub fn pad(data: &[u8], block_size: usize) -> Vec<u8> {
    debug_assert!(block_size >= 1 && block_size <= 255);
    let pad_len = block_size - (data.len() % block_size);
    let mut out = Vec::with_capacity(data.len() + pad_len);
    out.extend_from_slice(data);
    out.resize(data.len() + pad_len, pad_len as u8);
    out
}

/// Strip the padding added by [`pad`], returning the original plaintext slice.
///
/// # Errors
///
/// Returns a [`FormatError`] if the padding is malformed: empty input, a
/// length that is not a multiple of `block_size`, a final byte outside
/// `1..=block_size`, or trailing bytes that do not all carry the pad length.
pub fn unpad(data: &[u8], block_size: usize) -> Result<&[u8], FormatError> {
    if block_size < 1 || block_size > 255 {
        return Err(FormatError::InvalidBlockSize(block_size));
    }
    if data.is_empty() {
        return Err(FormatError::Empty);
    }
    if data.len() % block_size != 0 {
        return Err(FormatError::NotBlockAligned {
            len: data.len(),
            block_size,
        });
    }

    let last = data[data.len() - 1];
    let pad_len = last as usize;
    if pad_len == 0 || pad_len > block_size {
        return Err(FormatError::BadPaddingByte {
            byte: last,
            block_size,
        });
    }

    let (body, padding) = data.split_at(data.len() - pad_len);
    if padding.iter().any(|&b| b != last) {
        return Err(FormatError::InconsistentPadding);
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_fills_to_block_boundary() {
        let padded = pad(b"sensitive information", 8);
        assert_eq!(padded.len(), 24);
        assert_eq!(&padded[..21], b"sensitive information");
        assert_eq!(&padded[21..], &[3, 3, 3]);
    }

    #[test]
    fn aligned_input_gains_a_full_extra_block() {
        let padded = pad(b"xxxxxxxxxxxxxxxx", 16);
        assert_eq!(padded.len(), 32);
        assert_eq!(&padded[16..], &[16u8; 16]);
    }

    #[test]
    fn empty_input_pads_to_one_block() {
        let padded = pad(b"", 8);
        assert_eq!(padded, vec![8u8; 8]);
        assert_eq!(unpad(&padded, 8).unwrap(), b"");
    }

    #[test]
    fn unpad_is_the_exact_inverse() {
        let original = b"sensitive information";
        assert_eq!(unpad(&pad(original, 8), 8).unwrap(), original);
        assert_eq!(unpad(&pad(original, 16), 16).unwrap(), original);
    }

    #[test]
    fn unpad_rejects_empty_input() {
        assert_eq!(unpad(b"", 8), Err(FormatError::Empty));
    }

    #[test]
    fn unpad_rejects_unaligned_input() {
        assert_eq!(
            unpad(&[1, 1, 1], 8),
            Err(FormatError::NotBlockAligned {
                len: 3,
                block_size: 8
            })
        );
    }

    #[test]
    fn unpad_rejects_zero_pad_byte() {
        let data = [0u8; 8];
        assert_eq!(
            unpad(&data, 8),
            Err(FormatError::BadPaddingByte {
                byte: 0,
                block_size: 8
            })
        );
    }

    #[test]
    fn unpad_rejects_pad_byte_larger_than_block() {
        let mut data = [0u8; 8];
        data[7] = 9;
        assert_eq!(
            unpad(&data, 8),
            Err(FormatError::BadPaddingByte {
                byte: 9,
                block_size: 8
            })
        );
    }

    #[test]
    fn unpad_rejects_inconsistent_pad_bytes() {
        // Last byte claims 3 bytes of padding but they are not all 3.
        let data = [1u8, 2, 3, 4, 5, 6, 2, 3];
        assert_eq!(unpad(&data, 8), Err(FormatError::InconsistentPadding));
    }

    #[test]
    fn unpad_rejects_invalid_block_size() {
        assert_eq!(unpad(&[1], 0), Err(FormatError::InvalidBlockSize(0)));
        assert_eq!(unpad(&[1], 256), Err(FormatError::InvalidBlockSize(256)));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pad_unpad_round_trip(
            data in proptest::collection::vec(any::<u8>(), 0..256),
            block_size in prop_oneof![Just(8usize), Just(16usize)],
        ) {
            let padded = pad(&data, block_size);
            prop_assert_eq!(padded.len() % block_size, 0);
            prop_assert!(padded.len() > data.len());
            prop_assert_eq!(unpad(&padded, block_size).unwrap(), data.as_slice());
        }
    }
}
