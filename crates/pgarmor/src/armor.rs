//! PGP ASCII armor (RFC 4880 style), matching pgcrypto's `armor`/`dearmor`.
//!
//! Armored output wraps base64 ciphertext in `-----BEGIN PGP MESSAGE-----` /
//! `-----END PGP MESSAGE-----` lines with a CRC-24 checksum, so binary
//! ciphertext can be stored in plain text columns and round-tripped through
//! the database extension byte-for-byte.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::FormatError;

const HEADER: &str = "-----BEGIN PGP MESSAGE-----";
const FOOTER: &str = "-----END PGP MESSAGE-----";

/// Base64 column width used by pgcrypto when emitting armor bodies.
const LINE_WIDTH: usize = 76;

/// CRC-24 initial value and generator polynomial (RFC 4880 §6.1).
const CRC24_INIT: u32 = 0xB704CE;
const CRC24_POLY: u32 = 0x1864CFB;

/// Compute the RFC 4880 CRC-24 of `data`. The result fits in 24 bits.
fn crc24(data: &[u8]) -> u32 {
    let mut crc = CRC24_INIT;
    for &byte in data {
        crc ^= (byte as u32) << 16;
        for _ in 0..8 {
            crc <<= 1;
            if crc & 0x1000000 != 0 {
                crc ^= CRC24_POLY;
            }
        }
    }
    crc & 0xFFFFFF
}

/// Encode `data` as a PGP ASCII armored message.
///
/// The output is identical to pgcrypto's `armor()`: header line, blank line,
/// base64 body wrapped at 76 columns, `=`-prefixed CRC-24 line, footer line.
pub fn armor(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let crc_bytes = crc24(data).to_be_bytes();

    let mut out = String::with_capacity(encoded.len() + encoded.len() / LINE_WIDTH + 64);
    out.push_str(HEADER);
    out.push_str("\n\n");
    for chunk in encoded.as_bytes().chunks(LINE_WIDTH) {
        // Chunks of an ASCII string are always valid UTF-8.
        out.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        out.push('\n');
    }
    out.push('=');
    out.push_str(&STANDARD.encode(&crc_bytes[1..]));
    out.push('\n');
    out.push_str(FOOTER);
    out.push('\n');
    out
}

/// Decode a PGP ASCII armored message back to the original bytes.
///
/// Accepts CRLF line endings, text preceding the header line, and `Key: Value`
/// armor headers between the header line and the body. The CRC-24 checksum is
/// verified when a `=`-prefixed line is present.
///
/// # Errors
///
/// Returns a [`FormatError`] if the header or footer line is missing, the
/// body or checksum line is not valid base64, or the checksum does not match
/// the decoded data.
pub fn dearmor(text: &str) -> Result<Vec<u8>, FormatError> {
    let mut lines = text.lines().map(|l| l.trim_end_matches('\r').trim());

    // Scan forward to the armor header, ignoring any preceding text.
    if !lines.any(|line| line.starts_with("-----BEGIN")) {
        return Err(FormatError::MissingHeader);
    }

    let mut body = String::new();
    let mut crc_line: Option<String> = None;
    let mut saw_footer = false;
    for line in lines {
        if line.starts_with("-----END") {
            saw_footer = true;
            break;
        }
        if line.is_empty() {
            continue;
        }
        // `Key: Value` armor headers precede the body; base64 never contains ':'.
        if line.contains(": ") {
            continue;
        }
        if let Some(stripped) = line.strip_prefix('=') {
            crc_line = Some(stripped.to_owned());
            continue;
        }
        body.push_str(line);
    }
    if !saw_footer {
        return Err(FormatError::MissingFooter);
    }

    let data = STANDARD
        .decode(&body)
        .map_err(|_| FormatError::InvalidBase64)?;

    if let Some(crc_b64) = crc_line {
        let crc_bytes = STANDARD
            .decode(&crc_b64)
            .map_err(|_| FormatError::InvalidBase64)?;
        if crc_bytes.len() != 3 {
            return Err(FormatError::InvalidBase64);
        }
        let stored = u32::from_be_bytes([0, crc_bytes[0], crc_bytes[1], crc_bytes[2]]);
        let computed = crc24(&data);
        if stored != computed {
            return Err(FormatError::ChecksumMismatch { computed, stored });
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // select armor(encrypt('sensitive information', 'pass', 'bf'));
    const BF_CIPHERTEXT: [u8; 24] = hex!("78f47295ee5748e7a085896193497b7e9b1ce78f2f661d05");

    #[test]
    fn armor_matches_pgcrypto_output() {
        let expected = "-----BEGIN PGP MESSAGE-----\n\n\
                        ePRyle5XSOeghYlhk0l7fpsc548vZh0F\n\
                        =RiMn\n\
                        -----END PGP MESSAGE-----\n";
        assert_eq!(armor(&BF_CIPHERTEXT), expected);
    }

    #[test]
    fn dearmor_recovers_exact_bytes() {
        assert_eq!(dearmor(&armor(&BF_CIPHERTEXT)).unwrap(), BF_CIPHERTEXT);
    }

    #[test]
    fn long_input_wraps_and_round_trips() {
        let data: Vec<u8> = (0..=255u8).collect();
        let armored = armor(&data);
        let body_lines: Vec<&str> = armored
            .lines()
            .filter(|l| !l.is_empty() && !l.starts_with('-') && !l.starts_with('='))
            .collect();
        assert!(body_lines.len() > 1);
        assert!(body_lines.iter().all(|l| l.len() <= 76));
        assert_eq!(dearmor(&armored).unwrap(), data);
    }

    #[test]
    fn empty_input_round_trips() {
        let armored = armor(b"");
        assert_eq!(dearmor(&armored).unwrap(), b"");
    }

    #[test]
    fn dearmor_accepts_crlf_and_armor_headers() {
        let text = "-----BEGIN PGP MESSAGE-----\r\n\
                    Version: pgarmor\r\n\
                    \r\n\
                    ePRyle5XSOeghYlhk0l7fpsc548vZh0F\r\n\
                    =RiMn\r\n\
                    -----END PGP MESSAGE-----\r\n";
        assert_eq!(dearmor(text).unwrap(), BF_CIPHERTEXT);
    }

    #[test]
    fn dearmor_accepts_leading_text() {
        let text = format!("mail preamble\nmore text\n{}", armor(&BF_CIPHERTEXT));
        assert_eq!(dearmor(&text).unwrap(), BF_CIPHERTEXT);
    }

    #[test]
    fn dearmor_rejects_missing_header() {
        assert_eq!(
            dearmor("not armored at all"),
            Err(FormatError::MissingHeader)
        );
    }

    #[test]
    fn dearmor_rejects_missing_footer() {
        let truncated = "-----BEGIN PGP MESSAGE-----\n\nePRyle5XSOeghYlhk0l7fpsc548vZh0F\n";
        assert_eq!(dearmor(truncated), Err(FormatError::MissingFooter));
    }

    #[test]
    fn dearmor_rejects_bad_base64() {
        let text = "-----BEGIN PGP MESSAGE-----\n\n!!!not base64!!!\n-----END PGP MESSAGE-----\n";
        assert_eq!(dearmor(text), Err(FormatError::InvalidBase64));
    }

    #[test]
    fn dearmor_rejects_checksum_mismatch() {
        // Valid body with the checksum of different data.
        let text = "-----BEGIN PGP MESSAGE-----\n\n\
                    ePRyle5XSOeghYlhk0l7fpsc548vZh0F\n\
                    =AAAA\n\
                    -----END PGP MESSAGE-----\n";
        assert!(matches!(
            dearmor(text),
            Err(FormatError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn dearmor_tolerates_absent_checksum() {
        let text = "-----BEGIN PGP MESSAGE-----\n\n\
                    ePRyle5XSOeghYlhk0l7fpsc548vZh0F\n\
                    -----END PGP MESSAGE-----\n";
        assert_eq!(dearmor(text).unwrap(), BF_CIPHERTEXT);
    }

    #[test]
    fn crc24_known_values() {
        assert_eq!(crc24(b""), 0xB704CE);
        assert_eq!(crc24(b"hello"), 0x47F58A);
        assert_eq!(crc24(&BF_CIPHERTEXT), 0x462327);
    }
}
