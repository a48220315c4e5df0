//! Algorithm-agnostic generate/verify protocol.
//!
//! [`Strategy`] owns the token lifecycle shared by every algorithm: encode
//! header and payload, delegate signing, dot-join; and the inverse: split,
//! decode, pin the header, enforce expiration, delegate the signature check.
//! The algorithm-specific work lives behind [`SigningAlgorithm`], so a new
//! algorithm is a new binding, never a change to this module.

use crate::encoding::base64_url_encode;
use crate::error::{JwtError, JwtResult};
use crate::header::Header;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

/// Signing algorithm interface.
///
/// A binding supplies the two algorithm-specific operations of the protocol
/// and the key material they default to. Implementations must be thread-safe
/// (`Send + Sync`); a constructed binding is never mutated by the protocol.
pub trait SigningAlgorithm: Send + Sync {
    /// Per-call override for signing key material.
    type SigningKey: ?Sized;
    /// Per-call override for verification key material.
    type VerifyingKey: ?Sized;

    /// Header `alg` value.
    fn name(&self) -> &'static str;

    /// Produce a base64url signature over the unsigned string.
    ///
    /// `key_override`, when present, is used instead of the stored key and is
    /// local to this call.
    fn sign(&self, unsigned: &str, key_override: Option<&Self::SigningKey>) -> JwtResult<String>;

    /// Check a candidate base64url signature over the unsigned string.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::InvalidSignature` if the candidate does not verify
    /// or is structurally invalid.
    fn validate_signature(
        &self,
        unsigned: &str,
        candidate: &str,
        key_override: Option<&Self::VerifyingKey>,
    ) -> JwtResult<()>;
}

/// Per-call options for [`Strategy::generate_with`].
///
/// Overrides are borrowed for the duration of the call and never written back
/// to the strategy.
pub struct GenerateOptions<'a, A: SigningAlgorithm> {
    /// Time-to-live override in milliseconds.
    pub ttl_ms: Option<u64>,
    /// Signing key override.
    pub key: Option<&'a A::SigningKey>,
}

impl<A: SigningAlgorithm> Default for GenerateOptions<'_, A> {
    fn default() -> Self {
        Self {
            ttl_ms: None,
            key: None,
        }
    }
}

/// Per-call options for [`Strategy::verify_with`].
pub struct VerifyOptions<'a, A: SigningAlgorithm> {
    /// Verification key override.
    pub key: Option<&'a A::VerifyingKey>,
}

impl<A: SigningAlgorithm> Default for VerifyOptions<'_, A> {
    fn default() -> Self {
        Self { key: None }
    }
}

/// Shared token lifecycle over a concrete algorithm binding.
///
/// Constructed once and reused; safe for concurrent use. The only state is
/// the default ttl, the pre-encoded header and the binding's key material.
pub struct Strategy<A: SigningAlgorithm> {
    algorithm: A,
    ttl_ms: u64,
    encoded_header: String,
}

impl<A: SigningAlgorithm> Strategy<A> {
    /// Create a strategy around an algorithm binding with a default
    /// time-to-live in milliseconds.
    ///
    /// The header `{alg, typ}` is serialized and base64url-encoded here,
    /// exactly once; every verification compares against this encoded form.
    pub fn new(algorithm: A, ttl_ms: u64) -> JwtResult<Self> {
        let header = Header::new(algorithm.name());
        let header_json =
            serde_json::to_string(&header).map_err(|e| JwtError::serialization(e.to_string()))?;
        Ok(Self {
            algorithm,
            ttl_ms,
            encoded_header: base64_url_encode(header_json.as_bytes()),
        })
    }

    /// Default time-to-live in milliseconds.
    #[must_use]
    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    /// The fixed base64url-encoded header this strategy signs and pins.
    #[must_use]
    pub fn encoded_header(&self) -> &str {
        &self.encoded_header
    }

    /// The algorithm binding.
    #[must_use]
    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    /// Generate a signed token from the given payload with default options.
    ///
    /// See [`generate_with`](Self::generate_with).
    pub fn generate<T: Serialize>(&self, payload: &T) -> JwtResult<String> {
        self.generate_with(payload, GenerateOptions::default())
    }

    /// Generate a signed token from the given payload.
    ///
    /// The payload must serialize to a JSON object. It is copied, never
    /// mutated: `exp = now + ttl` (epoch milliseconds) is inserted into the
    /// copy, which is then encoded and joined with the encoded header into
    /// the unsigned string handed to the binding for signing.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Serialization` if the payload does not serialize to
    /// a JSON object, or a binding error if signing fails.
    pub fn generate_with<T: Serialize>(
        &self,
        payload: &T,
        options: GenerateOptions<'_, A>,
    ) -> JwtResult<String> {
        let value = serde_json::to_value(payload)
            .map_err(|e| JwtError::serialization(e.to_string()))?;
        let Value::Object(mut claims) = value else {
            return Err(JwtError::serialization("payload must be a JSON object"));
        };

        let ttl = options.ttl_ms.unwrap_or(self.ttl_ms);
        let exp = Utc::now()
            .timestamp_millis()
            .checked_add_unsigned(ttl)
            .unwrap_or(i64::MAX);
        claims.insert("exp".to_string(), Value::from(exp));

        let payload_json = serde_json::to_string(&claims)
            .map_err(|e| JwtError::serialization(e.to_string()))?;
        let unsigned = format!(
            "{}.{}",
            self.encoded_header,
            base64_url_encode(payload_json.as_bytes())
        );
        let signature = self.algorithm.sign(&unsigned, options.key)?;
        Ok(format!("{unsigned}.{signature}"))
    }

    /// Verify a token and return its decoded payload, with default options.
    ///
    /// See [`verify_with`](Self::verify_with).
    pub fn verify(&self, token: &str) -> JwtResult<Map<String, Value>> {
        self.verify_with(token, VerifyOptions::default())
    }

    /// Verify a token and return its decoded payload.
    ///
    /// Checks run in a fixed order so cheap rejections come before any
    /// cryptographic work and each failure mode is distinct: segment shape,
    /// payload decode, header pin, expiration, signature.
    ///
    /// The unsigned string handed to the binding is sliced straight out of
    /// the token's raw header and payload segments. Nothing is re-encoded,
    /// so the bytes checked are byte-identical to the bytes that were signed.
    ///
    /// # Errors
    ///
    /// - `JwtError::MalformedToken` — not exactly three segments, or the
    ///   payload segment does not decode to a JSON object with an integer
    ///   `exp` claim.
    /// - `JwtError::InvalidHeader` — header segment differs from this
    ///   strategy's encoded header.
    /// - `JwtError::TokenExpired` — current time is past `exp`.
    /// - `JwtError::InvalidSignature` — the binding rejects the signature.
    pub fn verify_with(
        &self,
        token: &str,
        options: VerifyOptions<'_, A>,
    ) -> JwtResult<Map<String, Value>> {
        let (header_b64, payload_b64, signature_b64) = split_token(token)?;

        let claims = decode_payload(payload_b64)?;

        if header_b64 != self.encoded_header {
            tracing::debug!(alg = self.algorithm.name(), "rejected token: header mismatch");
            return Err(JwtError::InvalidHeader);
        }

        let exp = claims
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or(JwtError::MalformedToken("missing integer exp claim"))?;
        if Utc::now().timestamp_millis() > exp {
            tracing::debug!(alg = self.algorithm.name(), exp, "rejected token: expired");
            return Err(JwtError::TokenExpired);
        }

        let unsigned = &token[..header_b64.len() + 1 + payload_b64.len()];
        self.algorithm
            .validate_signature(unsigned, signature_b64, options.key)?;

        Ok(claims)
    }
}

/// Split a token into its three raw segments.
fn split_token(token: &str) -> JwtResult<(&str, &str, &str)> {
    let mut segments = token.split('.');
    match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(header), Some(payload), Some(signature), None) => Ok((header, payload, signature)),
        _ => Err(JwtError::MalformedToken("expected three dot-joined segments")),
    }
}

/// Decode the payload segment into a claims object.
fn decode_payload(payload_b64: &str) -> JwtResult<Map<String, Value>> {
    let bytes = crate::encoding::base64_url_decode(payload_b64)
        .map_err(|_| JwtError::MalformedToken("payload segment is not base64url"))?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|_| JwtError::MalformedToken("payload segment is not JSON"))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(JwtError::MalformedToken("payload is not a JSON object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Binding that signs everything with a fixed marker. Exercises the
    /// protocol without any cryptography.
    struct Marker;

    impl SigningAlgorithm for Marker {
        type SigningKey = str;
        type VerifyingKey = str;

        fn name(&self) -> &'static str {
            "HS256"
        }

        fn sign(&self, _unsigned: &str, key_override: Option<&str>) -> JwtResult<String> {
            Ok(key_override.unwrap_or("marker").to_string())
        }

        fn validate_signature(
            &self,
            unsigned: &str,
            candidate: &str,
            key_override: Option<&str>,
        ) -> JwtResult<()> {
            if candidate == self.sign(unsigned, key_override)? {
                Ok(())
            } else {
                Err(JwtError::InvalidSignature)
            }
        }
    }

    fn strategy(ttl_ms: u64) -> Strategy<Marker> {
        Strategy::new(Marker, ttl_ms).unwrap()
    }

    #[test]
    fn header_is_encoded_once_at_construction() {
        let s = strategy(60_000);
        let expected = base64_url_encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        assert_eq!(s.encoded_header(), expected);
    }

    #[test]
    fn generate_produces_three_segments_and_injects_exp() {
        let s = strategy(60_000);
        let before = Utc::now().timestamp_millis();
        let token = s.generate(&json!({"sub": "u1"})).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = s.verify(&token).unwrap();
        assert_eq!(claims.get("sub"), Some(&json!("u1")));
        let exp = claims.get("exp").and_then(Value::as_i64).unwrap();
        assert!(exp >= before + 60_000);
    }

    #[test]
    fn generate_does_not_mutate_caller_payload() {
        let s = strategy(60_000);
        let payload = json!({"sub": "u1"});
        let _ = s.generate(&payload).unwrap();
        assert_eq!(payload, json!({"sub": "u1"}));
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let s = strategy(60_000);
        assert!(matches!(
            s.generate(&json!(["not", "an", "object"])),
            Err(JwtError::Serialization(_))
        ));
    }

    #[test]
    fn per_call_ttl_override() {
        let s = strategy(0);
        let token = s
            .generate_with(
                &json!({"sub": "u1"}),
                GenerateOptions {
                    ttl_ms: Some(120_000),
                    key: None,
                },
            )
            .unwrap();
        assert!(s.verify(&token).is_ok());
    }

    #[test]
    fn wrong_segment_counts_are_malformed() {
        let s = strategy(60_000);
        for token in ["", "a", "a.b", "a.b.c.d"] {
            assert!(
                matches!(s.verify(token), Err(JwtError::MalformedToken(_))),
                "expected malformed for {token:?}"
            );
        }
    }

    #[test]
    fn undecodable_payload_is_malformed() {
        let s = strategy(60_000);
        let token = format!("{}.!!!.marker", s.encoded_header());
        assert!(matches!(
            s.verify(&token),
            Err(JwtError::MalformedToken(_))
        ));
    }

    #[test]
    fn foreign_header_is_rejected() {
        let s = strategy(60_000);
        let token = s.generate(&json!({"sub": "u1"})).unwrap();
        let (_, rest) = token.split_once('.').unwrap();
        let foreign_header = base64_url_encode(br#"{"alg":"none","typ":"JWT"}"#);
        let forged = format!("{foreign_header}.{rest}");
        assert_eq!(s.verify(&forged), Err(JwtError::InvalidHeader));
    }

    #[test]
    fn missing_exp_is_malformed() {
        let s = strategy(60_000);
        let payload = base64_url_encode(br#"{"sub":"u1"}"#);
        let token = format!("{}.{payload}.marker", s.encoded_header());
        assert!(matches!(
            s.verify(&token),
            Err(JwtError::MalformedToken(_))
        ));
    }

    #[test]
    fn expiry_is_checked_before_signature() {
        let s = strategy(0);
        let token = s.generate(&json!({"sub": "u1"})).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        // Tampered signature, but the expired check must win.
        let tampered = format!("{}bad", token);
        assert_eq!(s.verify(&tampered), Err(JwtError::TokenExpired));
    }

    #[test]
    fn bad_signature_is_rejected() {
        let s = strategy(60_000);
        let token = s.generate(&json!({"sub": "u1"})).unwrap();
        let tampered = token.replace("marker", "forged");
        assert_eq!(s.verify(&tampered), Err(JwtError::InvalidSignature));
    }

    #[test]
    fn per_call_key_override_reaches_binding() {
        let s = strategy(60_000);
        let token = s
            .generate_with(
                &json!({"sub": "u1"}),
                GenerateOptions {
                    ttl_ms: None,
                    key: Some("other"),
                },
            )
            .unwrap();
        assert_eq!(s.verify(&token), Err(JwtError::InvalidSignature));
        assert!(
            s.verify_with(&token, VerifyOptions { key: Some("other") })
                .is_ok()
        );
    }
}
