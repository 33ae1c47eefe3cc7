//! RFC 2047 encoded-word decoding.

use crate::encoding::{decode_base64, decode_charset, decode_q};

/// Decodes a single encoded word's payload.
///
/// `encoding` is `B` (Base64) or `Q` (the quoted-printable variant where
/// `_` means space), matched case-insensitively. Returns `None` when the
/// encoding is unknown, the payload is malformed, or the charset label is
/// not recognized; callers keep the original undecoded span in that case.
#[must_use]
pub fn decode(charset: &str, encoding: &str, data: &str) -> Option<String> {
    let bytes = decode_bytes(encoding, data)?;
    decode_charset(strip_language(charset), &bytes)
}

/// Decodes an encoded word's payload to raw bytes, before charset
/// conversion.
pub(crate) fn decode_bytes(encoding: &str, data: &str) -> Option<Vec<u8>> {
    if encoding.eq_ignore_ascii_case("b") {
        decode_base64(data).ok()
    } else if encoding.eq_ignore_ascii_case("q") {
        decode_q(data).ok()
    } else {
        None
    }
}

/// Drops the optional RFC 2231 `*language` suffix from a charset label.
pub(crate) fn strip_language(charset: &str) -> &str {
    charset.split('*').next().unwrap_or(charset)
}
