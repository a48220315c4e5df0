//! Signed, time-bounded JWT-style tokens over pluggable signing strategies.
//!
//! This crate provides:
//! - A single algorithm-agnostic generate/verify protocol ([`Strategy`])
//! - HS256 (symmetric HMAC) and RS256 (asymmetric RSA) bindings
//! - Strict header pinning, expiration enforcement and fail-closed errors
//!
//! # Example
//!
//! ```
//! use jwt_strategies::Hs256;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), jwt_strategies::JwtError> {
//! let strategy = Hs256::strategy(b"shared-secret", 60_000)?;
//! let token = strategy.generate(&json!({"sub": "u1"}))?;
//! let claims = strategy.verify(&token)?;
//! assert_eq!(claims["sub"], "u1");
//! assert!(claims["exp"].is_i64());
//! # Ok(())
//! # }
//! ```

pub mod encoding;
mod error;
mod header;
mod hs256;
mod rs256;
mod strategy;

pub use error::{JwtError, JwtResult};
pub use header::Header;
pub use hs256::Hs256;
pub use rs256::Rs256;
pub use strategy::{GenerateOptions, SigningAlgorithm, Strategy, VerifyOptions};
