//! Symmetric HMAC-SHA256 (HS256) binding.

use crate::encoding::{base64_url_decode, base64_url_encode};
use crate::error::{JwtError, JwtResult};
use crate::strategy::{SigningAlgorithm, Strategy};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// HS256 binding over a shared secret.
///
/// The secret is held in a zeroizing buffer and wiped on drop. Both signing
/// and verification use the same secret; a per-call override replaces it for
/// that call only.
pub struct Hs256 {
    secret: Zeroizing<Vec<u8>>,
}

impl Hs256 {
    /// Create a binding from a shared secret.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::InvalidOptions` if the secret is empty. No minimum
    /// length is imposed beyond that.
    pub fn new(secret: impl AsRef<[u8]>) -> JwtResult<Self> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(JwtError::invalid_options("HMAC secret must not be empty"));
        }
        Ok(Self {
            secret: Zeroizing::new(secret.to_vec()),
        })
    }

    /// Create a ready [`Strategy`] over this binding with a default
    /// time-to-live in milliseconds.
    pub fn strategy(secret: impl AsRef<[u8]>, ttl_ms: u64) -> JwtResult<Strategy<Hs256>> {
        Strategy::new(Self::new(secret)?, ttl_ms)
    }

    fn tag(&self, unsigned: &str, key_override: Option<&[u8]>) -> JwtResult<Vec<u8>> {
        let secret = key_override.unwrap_or(&self.secret);
        let mut mac = HmacSha256::new_from_slice(secret)
            .map_err(|_| JwtError::invalid_key("invalid HMAC key"))?;
        mac.update(unsigned.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl SigningAlgorithm for Hs256 {
    type SigningKey = [u8];
    type VerifyingKey = [u8];

    fn name(&self) -> &'static str {
        "HS256"
    }

    fn sign(&self, unsigned: &str, key_override: Option<&[u8]>) -> JwtResult<String> {
        Ok(base64_url_encode(&self.tag(unsigned, key_override)?))
    }

    fn validate_signature(
        &self,
        unsigned: &str,
        candidate: &str,
        key_override: Option<&[u8]>,
    ) -> JwtResult<()> {
        let candidate =
            base64_url_decode(candidate).map_err(|_| JwtError::InvalidSignature)?;
        let expected = Zeroizing::new(self.tag(unsigned, key_override)?);
        // Constant-time comparison; length mismatch short-circuits to false
        // inside subtle.
        if expected.ct_eq(&candidate).into() {
            Ok(())
        } else {
            Err(JwtError::InvalidSignature)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_secret() {
        assert!(matches!(Hs256::new(b""), Err(JwtError::InvalidOptions(_))));
    }

    #[test]
    fn accepts_short_secret() {
        assert!(Hs256::new(b"k").is_ok());
    }

    #[test]
    fn signature_is_deterministic_per_secret() {
        let a = Hs256::new(b"secret-a").unwrap();
        let b = Hs256::new(b"secret-b").unwrap();
        let sig_a = a.sign("h.p", None).unwrap();
        assert_eq!(sig_a, a.sign("h.p", None).unwrap());
        assert_ne!(sig_a, b.sign("h.p", None).unwrap());
    }

    #[test]
    fn known_rfc4231_vector() {
        // RFC 4231 test case 2: key "Jefe", data "what do ya want for nothing?"
        let binding = Hs256::new(b"Jefe").unwrap();
        let sig = binding.sign("what do ya want for nothing?", None).unwrap();
        let raw = base64_url_decode(&sig).unwrap();
        assert_eq!(
            raw,
            [
                0x5b, 0xdc, 0xc1, 0x46, 0xbf, 0x60, 0x75, 0x4e, 0x6a, 0x04, 0x24, 0x26, 0x08,
                0x95, 0x75, 0xc7, 0x5a, 0x00, 0x3f, 0x08, 0x9d, 0x27, 0x39, 0x83, 0x9d, 0xec,
                0x58, 0xb9, 0x64, 0xec, 0x38, 0x43
            ]
        );
    }

    #[test]
    fn validate_accepts_own_signature() {
        let binding = Hs256::new(b"secret").unwrap();
        let sig = binding.sign("h.p", None).unwrap();
        assert!(binding.validate_signature("h.p", &sig, None).is_ok());
    }

    #[test]
    fn validate_rejects_wrong_secret_and_garbage() {
        let binding = Hs256::new(b"secret").unwrap();
        let sig = binding.sign("h.p", Some(b"other")).unwrap();
        assert_eq!(
            binding.validate_signature("h.p", &sig, None),
            Err(JwtError::InvalidSignature)
        );
        assert_eq!(
            binding.validate_signature("h.p", "not base64url!", None),
            Err(JwtError::InvalidSignature)
        );
    }

    #[test]
    fn override_secret_signs_and_verifies() {
        let binding = Hs256::new(b"default").unwrap();
        let sig = binding.sign("h.p", Some(b"override")).unwrap();
        assert!(
            binding
                .validate_signature("h.p", &sig, Some(b"override"))
                .is_ok()
        );
    }
}
