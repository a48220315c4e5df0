//! Error taxonomy for token generation and verification.
//!
//! Every check that cannot be satisfied rejects the whole operation; there is
//! no partial success and nothing is recovered internally.

use thiserror::Error;

/// Result alias for token operations.
pub type JwtResult<T> = Result<T, JwtError>;

/// Errors raised by strategy construction, `generate` and `verify`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum JwtError {
    /// Token does not have the expected three-segment shape, or a segment
    /// cannot be decoded into what the protocol requires.
    #[error("malformed token: {0}")]
    MalformedToken(&'static str),

    /// Token's header segment differs from the verifying strategy's own
    /// encoded header.
    #[error("token header does not match this strategy")]
    InvalidHeader,

    /// Current time is past the token's `exp` claim.
    #[error("token has expired")]
    TokenExpired,

    /// Candidate signature does not verify, or is structurally invalid.
    #[error("invalid token signature")]
    InvalidSignature,

    /// Key material could not be parsed or used.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Constructor input rejected.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// Header or payload could not be serialized, or the payload is not a
    /// JSON object.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl JwtError {
    /// Create an invalid key error.
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        JwtError::InvalidKey(msg.into())
    }

    /// Create an invalid options error.
    #[inline]
    #[must_use]
    pub fn invalid_options(msg: impl Into<String>) -> Self {
        JwtError::InvalidOptions(msg.into())
    }

    /// Create a serialization error.
    #[inline]
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        JwtError::Serialization(msg.into())
    }
}
