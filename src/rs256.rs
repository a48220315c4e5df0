//! Asymmetric RSA-PKCS#1v1.5-SHA256 (RS256) binding.

use crate::encoding::{base64_url_decode, base64_url_encode};
use crate::error::{JwtError, JwtResult};
use crate::strategy::{SigningAlgorithm, Strategy};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::sha2::Sha256;
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};

/// RS256 binding over an RSA key pair.
///
/// Signing uses the private key, verification the public key; either may be
/// overridden per call with a parsed key.
pub struct Rs256 {
    signing_key: SigningKey<Sha256>,
    verifying_key: VerifyingKey<Sha256>,
}

impl Rs256 {
    /// Create a binding from a PKCS#8 PEM private key and an SPKI PEM public
    /// key.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::InvalidKey` if either key fails to parse.
    pub fn from_pem(private_key_pem: &str, public_key_pem: &str) -> JwtResult<Self> {
        let private_key = RsaPrivateKey::from_pkcs8_pem(private_key_pem)
            .map_err(|e| JwtError::invalid_key(format!("invalid RSA private key: {e}")))?;
        let public_key = RsaPublicKey::from_public_key_pem(public_key_pem)
            .map_err(|e| JwtError::invalid_key(format!("invalid RSA public key: {e}")))?;
        Ok(Self::from_keys(private_key, public_key))
    }

    /// Create a binding from a PKCS#8 DER private key and an SPKI DER public
    /// key.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::InvalidKey` if either key fails to parse.
    pub fn from_der(private_key_der: &[u8], public_key_der: &[u8]) -> JwtResult<Self> {
        let private_key = RsaPrivateKey::from_pkcs8_der(private_key_der)
            .map_err(|e| JwtError::invalid_key(format!("invalid RSA private key: {e}")))?;
        let public_key = RsaPublicKey::from_public_key_der(public_key_der)
            .map_err(|e| JwtError::invalid_key(format!("invalid RSA public key: {e}")))?;
        Ok(Self::from_keys(private_key, public_key))
    }

    /// Create a binding from already-parsed RSA keys.
    #[must_use]
    pub fn from_keys(private_key: RsaPrivateKey, public_key: RsaPublicKey) -> Self {
        Self {
            signing_key: SigningKey::<Sha256>::new(private_key),
            verifying_key: VerifyingKey::<Sha256>::new(public_key),
        }
    }

    /// Generate a fresh RSA key pair of the given bit size and bind it.
    ///
    /// Intended for tests and provisioning tooling; 2048 bits minimum for
    /// production use.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::InvalidKey` if key generation fails.
    pub fn generate(bits: usize) -> JwtResult<Self> {
        let private_key = RsaPrivateKey::new(&mut rand::rng(), bits)
            .map_err(|e| JwtError::invalid_key(format!("RSA key generation failed: {e}")))?;
        let public_key = RsaPublicKey::from(&private_key);
        Ok(Self::from_keys(private_key, public_key))
    }

    /// Create a ready [`Strategy`] over this binding with a default
    /// time-to-live in milliseconds.
    pub fn strategy(
        private_key_pem: &str,
        public_key_pem: &str,
        ttl_ms: u64,
    ) -> JwtResult<Strategy<Rs256>> {
        Strategy::new(Self::from_pem(private_key_pem, public_key_pem)?, ttl_ms)
    }

    /// The bound signing key.
    #[must_use]
    pub fn signing_key(&self) -> &SigningKey<Sha256> {
        &self.signing_key
    }

    /// The bound verifying key.
    #[must_use]
    pub fn verifying_key(&self) -> &VerifyingKey<Sha256> {
        &self.verifying_key
    }

    /// Parse a PKCS#8 PEM private key into a per-call signing key override.
    pub fn signing_key_from_pem(pem: &str) -> JwtResult<SigningKey<Sha256>> {
        let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
            .map_err(|e| JwtError::invalid_key(format!("invalid RSA private key: {e}")))?;
        Ok(SigningKey::<Sha256>::new(private_key))
    }

    /// Parse an SPKI PEM public key into a per-call verifying key override.
    pub fn verifying_key_from_pem(pem: &str) -> JwtResult<VerifyingKey<Sha256>> {
        let public_key = RsaPublicKey::from_public_key_pem(pem)
            .map_err(|e| JwtError::invalid_key(format!("invalid RSA public key: {e}")))?;
        Ok(VerifyingKey::<Sha256>::new(public_key))
    }
}

impl SigningAlgorithm for Rs256 {
    type SigningKey = SigningKey<Sha256>;
    type VerifyingKey = VerifyingKey<Sha256>;

    fn name(&self) -> &'static str {
        "RS256"
    }

    fn sign(
        &self,
        unsigned: &str,
        key_override: Option<&SigningKey<Sha256>>,
    ) -> JwtResult<String> {
        let key = key_override.unwrap_or(&self.signing_key);
        let signature = key
            .try_sign(unsigned.as_bytes())
            .map_err(|e| JwtError::invalid_key(format!("RSA signing failed: {e}")))?;
        Ok(base64_url_encode(&signature.to_bytes()))
    }

    fn validate_signature(
        &self,
        unsigned: &str,
        candidate: &str,
        key_override: Option<&VerifyingKey<Sha256>>,
    ) -> JwtResult<()> {
        let key = key_override.unwrap_or(&self.verifying_key);
        let bytes = base64_url_decode(candidate).map_err(|_| JwtError::InvalidSignature)?;
        let signature =
            Signature::try_from(bytes.as_slice()).map_err(|_| JwtError::InvalidSignature)?;
        key.verify(unsigned.as_bytes(), &signature)
            .map_err(|_| JwtError::InvalidSignature)
    }
}
