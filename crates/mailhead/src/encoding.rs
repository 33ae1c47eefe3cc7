//! Decoding utilities for MIME-encoded header text.
//!
//! Supports Base64, the RFC 2047 "Q" variant of quoted-printable, and
//! charset conversion of decoded byte runs.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use charset::Charset;

/// Decodes Base64 data.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data).map_err(Into::into)
}

/// Decodes RFC 2047 "Q" encoded text to raw bytes.
///
/// Like quoted-printable, except that `_` decodes to a space (RFC 2047
/// section 4.2).
///
/// # Errors
///
/// Returns an error if the input contains an invalid escape sequence.
pub fn decode_q(data: &str) -> Result<Vec<u8>> {
    let mut result = Vec::with_capacity(data.len());
    let mut bytes = data.bytes();

    while let Some(byte) = bytes.next() {
        match byte {
            b'_' => result.push(b' '),
            b'=' => {
                // Hex encoded byte
                let hex: Vec<u8> = bytes.by_ref().take(2).collect();
                if hex.len() != 2 {
                    return Err(Error::InvalidEncoding(
                        "Incomplete escape sequence".to_string(),
                    ));
                }
                let hex = std::str::from_utf8(&hex)
                    .map_err(|e| Error::InvalidEncoding(format!("Invalid hex: {e}")))?;
                let value = u8::from_str_radix(hex, 16)
                    .map_err(|e| Error::InvalidEncoding(format!("Invalid hex: {e}")))?;
                result.push(value);
            }
            _ => result.push(byte),
        }
    }

    Ok(result)
}

/// Decodes a byte run using a named character set.
///
/// Labels are matched per the WHATWG encoding standard, so common aliases
/// such as `US-ASCII`, `latin1` and `utf8` all resolve. Returns `None` when
/// the label names no known charset.
#[must_use]
pub fn decode_charset(label: &str, bytes: &[u8]) -> Option<String> {
    let charset = Charset::for_label_no_replacement(label.trim().as_bytes())?;
    let (decoded, _malformed) = charset.decode_without_bom_handling(bytes);
    Some(decoded.into_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_decode() {
        let decoded = decode_base64("SGVsbG8sIFdvcmxkIQ==").unwrap();
        assert_eq!(decoded, b"Hello, World!");
    }

    #[test]
    fn test_base64_decode_invalid() {
        assert!(decode_base64("not*base64").is_err());
    }

    #[test]
    fn test_q_decode_underscore() {
        let decoded = decode_q("Kilgore_Trout").unwrap();
        assert_eq!(decoded, b"Kilgore Trout");
    }

    #[test]
    fn test_q_decode_hex() {
        let decoded = decode_q("H=C3=A9llo").unwrap();
        assert_eq!(decoded, "Héllo".as_bytes());
    }

    #[test]
    fn test_q_decode_incomplete_escape() {
        assert!(decode_q("abc=4").is_err());
        assert!(decode_q("abc=zz").is_err());
    }

    #[test]
    fn test_decode_charset_utf8() {
        let decoded = decode_charset("utf-8", "Héllo".as_bytes()).unwrap();
        assert_eq!(decoded, "Héllo");
    }

    #[test]
    fn test_decode_charset_latin1() {
        let decoded = decode_charset("ISO-8859-1", &[b'H', 0xE9, b'l', b'l', b'o']).unwrap();
        assert_eq!(decoded, "Héllo");
    }

    #[test]
    fn test_decode_charset_unknown() {
        assert!(decode_charset("x-no-such-charset", b"abc").is_none());
    }
}
