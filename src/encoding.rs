//! Base64 URL-safe encoding without padding (RFC 7515).
//!
//! All three token segments use this encoding.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

/// Encode bytes as base64url without padding.
#[inline]
#[must_use]
pub fn base64_url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decode a base64url string without padding.
#[inline]
pub fn base64_url_decode(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(input)
}
