//! # Digital Signatures
//!
//! secp256k1 ECDSA over raw message bytes, hashed with SHA-256 before
//! signing. Nonces are derived per RFC 6979, so the same key and message
//! always produce the same signature, and `s` is normalized to the low half
//! of the curve order.
//!
//! Keyrings only need a narrow contract here: something that can sign bytes
//! and say which public key verifies the result. That contract is
//! [`MessageSigner`]. A watch-only signer exists and fails every signing
//! call with [`SignatureError::PrivateKeyUnavailable`].

use std::fmt;

use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature as EcdsaSignature, SigningKey, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use super::keys::{PrivateKey, PublicKey};

/// Errors during signature operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid signature bytes: expected 64 bytes")]
    InvalidSignatureBytes,

    #[error("private key is not available on a watch-only signer")]
    PrivateKeyUnavailable,
}

/// A 64-byte compact ECDSA signature (`r || s`).
#[derive(Clone, PartialEq, Eq)]
pub struct Signature {
    bytes: [u8; 64],
}

impl Signature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        let bytes: [u8; 64] = bytes
            .try_into()
            .map_err(|_| SignatureError::InvalidSignatureBytes)?;
        Ok(Self { bytes })
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(hex_str).map_err(|_| SignatureError::InvalidSignatureBytes)?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Signature::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Anything that can sign a message on behalf of a public key.
pub trait MessageSigner {
    /// Sign `message`. Watch-only implementations return
    /// [`SignatureError::PrivateKeyUnavailable`].
    fn sign(&self, message: &[u8]) -> Result<Signature, SignatureError>;

    /// The key a verifier should check signatures against.
    fn public_key(&self) -> PublicKey;
}

impl MessageSigner for PrivateKey {
    fn sign(&self, message: &[u8]) -> Result<Signature, SignatureError> {
        let signing_key = SigningKey::from(self.as_secret());
        let signature: EcdsaSignature = signing_key.sign(message);
        Signature::from_bytes(&signature.to_bytes())
    }

    fn public_key(&self) -> PublicKey {
        PrivateKey::public_key(self)
    }
}

/// Verify an ECDSA signature against a public key and message.
///
/// Returns `false` for malformed signatures as well as for mismatches.
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    let verifying_key = VerifyingKey::from(*public_key.as_point());
    match EcdsaSignature::from_slice(signature.as_bytes()) {
        Ok(sig) => verifying_key.verify(message, &sig).is_ok(),
        Err(_) => false,
    }
}
