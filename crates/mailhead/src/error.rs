//! Error types for header decoding.

/// Result type alias for header operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Header error types.
///
/// The header value parser itself never fails; headers are untrusted input
/// and malformed syntax degrades to best-effort parts instead. These errors
/// cover the decoding utilities and the structured `Content-Type` surface.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid content type.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Invalid encoding.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}
