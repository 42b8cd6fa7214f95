//! # Key Primitives
//!
//! The three fixed-size values every extended key is built from:
//!
//! - [`PrivateKey`]: a secp256k1 scalar in `[1, n)`.
//! - [`PublicKey`]: a compressed secp256k1 point (33 bytes, `0x02`/`0x03`).
//! - [`ChainCode`]: the 32 bytes of extra entropy mixed into each BIP32 step.
//!
//! Each one is validated at construction, so holding a value of these types
//! means holding a usable key. None of them have setters: a different key is
//! a different value.
//!
//! ## Security considerations
//!
//! - Private scalars are zeroized on drop (`k256::SecretKey` does this) and
//!   byte exports come back wrapped in [`Zeroizing`].
//! - Chain codes are zeroized on drop as well. A leaked chain code plus an
//!   extended public key exposes every non-hardened child public key.
//! - `Debug` never prints private scalars or chain codes.

use std::fmt;
use std::hash::{Hash, Hasher};

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{FieldBytes, NonZeroScalar, SecretKey};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::codec::base58;
use crate::config::{
    CHAIN_CODE_SIZE, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE, UNCOMPRESSED_PUBLIC_KEY_SIZE,
    WIF_COMPRESSED_FLAG,
};
use crate::crypto::hash::hash160;

/// Errors raised while validating key material.
///
/// Messages describe the shape of the problem, never the offending bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid {what} length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Which value was being parsed.
        what: &'static str,
        /// Required length.
        expected: usize,
        /// Length actually supplied.
        got: usize,
    },

    #[error("invalid private key: scalar is zero or not below the curve order")]
    InvalidScalar,

    #[error("invalid public key: not a point on secp256k1")]
    InvalidCurvePoint,

    #[error("invalid public key prefix 0x{0:02x}")]
    InvalidPublicKeyPrefix(u8),

    #[error("chain code must not be all zero")]
    AllZeroChainCode,

    #[error("invalid hex encoding")]
    InvalidHex,

    #[error("invalid WIF: {0}")]
    InvalidWif(String),
}

// ---------------------------------------------------------------------------
// PrivateKey
// ---------------------------------------------------------------------------

/// A secp256k1 private key.
///
/// Intentionally does NOT implement `Serialize`. Exporting a private key is
/// done explicitly via [`to_wif`](Self::to_wif) or [`to_bytes`](Self::to_bytes).
///
/// # Examples
///
/// ```
/// use scintilla_keys::crypto::PrivateKey;
///
/// let key = PrivateKey::from_hex(
///     "0000000000000000000000000000000000000000000000000000000000000001",
/// ).unwrap();
/// assert_eq!(
///     key.public_key().to_hex(),
///     "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
/// );
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    secret: SecretKey,
}

impl PrivateKey {
    /// Generate a fresh private key from the OS RNG.
    pub fn generate() -> Self {
        Self {
            secret: SecretKey::random(&mut OsRng),
        }
    }

    /// Parse a 32-byte big-endian scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(KeyError::InvalidLength {
                what: "private key",
                expected: PRIVATE_KEY_SIZE,
                got: bytes.len(),
            });
        }
        let secret =
            SecretKey::from_bytes(FieldBytes::from_slice(bytes)).map_err(|_| KeyError::InvalidScalar)?;
        Ok(Self { secret })
    }

    /// Parse a hex-encoded 32-byte scalar.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = Zeroizing::new(hex::decode(hex_str).map_err(|_| KeyError::InvalidHex)?);
        Self::from_bytes(&bytes)
    }

    pub(crate) fn from_scalar(scalar: NonZeroScalar) -> Self {
        Self {
            secret: SecretKey::from(scalar),
        }
    }

    pub(crate) fn to_scalar(&self) -> NonZeroScalar {
        self.secret.to_nonzero_scalar()
    }

    pub(crate) fn as_secret(&self) -> &SecretKey {
        &self.secret
    }

    /// Export the raw 32-byte scalar. The buffer is wiped when dropped.
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        let mut out = Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);
        out.copy_from_slice(&self.secret.to_bytes());
        out
    }

    /// Hex rendering of the raw scalar.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&*self.to_bytes()))
    }

    /// Compute the compressed public key. Pure; nothing is cached.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_point(self.secret.public_key())
    }

    /// Export in Wallet Import Format: `version || key || 0x01`, Base58Check.
    ///
    /// Use [`WIF_MAINNET_VERSION`](crate::config::WIF_MAINNET_VERSION) for
    /// Bitcoin mainnet style exports.
    pub fn to_wif(&self, version: u8) -> Zeroizing<String> {
        let mut payload = Zeroizing::new(Vec::with_capacity(PRIVATE_KEY_SIZE + 2));
        payload.push(version);
        payload.extend_from_slice(&*self.to_bytes());
        payload.push(WIF_COMPRESSED_FLAG);
        Zeroizing::new(base58::encode_check(&payload))
    }

    /// Import a compressed-key WIF string. The version byte is returned
    /// alongside the key so callers can check the network they expect.
    pub fn from_wif(wif: &str) -> Result<(Self, u8), KeyError> {
        let payload = Zeroizing::new(
            base58::decode_check(wif).map_err(|e| KeyError::InvalidWif(e.to_string()))?,
        );
        if payload.len() != PRIVATE_KEY_SIZE + 2 {
            return Err(KeyError::InvalidWif(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_SIZE + 2,
                payload.len()
            )));
        }
        if payload[PRIVATE_KEY_SIZE + 1] != WIF_COMPRESSED_FLAG {
            return Err(KeyError::InvalidWif("missing compression flag".into()));
        }
        let key = Self::from_bytes(&payload[1..=PRIVATE_KEY_SIZE])?;
        Ok((key, payload[0]))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// A compressed secp256k1 public key.
///
/// Carries both the parsed curve point (for arithmetic) and its 33-byte
/// SEC1 encoding (for hashing and serialization). Equality and hashing use
/// the encoding.
#[derive(Clone, Copy)]
pub struct PublicKey {
    point: k256::PublicKey,
    bytes: [u8; PUBLIC_KEY_SIZE],
}

impl PublicKey {
    /// Parse a 33-byte compressed point.
    ///
    /// Rejects prefixes other than `0x02`/`0x03` and x coordinates that are
    /// not on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != PUBLIC_KEY_SIZE {
            return Err(KeyError::InvalidLength {
                what: "public key",
                expected: PUBLIC_KEY_SIZE,
                got: bytes.len(),
            });
        }
        if bytes[0] != 0x02 && bytes[0] != 0x03 {
            return Err(KeyError::InvalidPublicKeyPrefix(bytes[0]));
        }
        let point = k256::PublicKey::from_sec1_bytes(bytes).map_err(|_| KeyError::InvalidCurvePoint)?;
        Ok(Self::from_point(point))
    }

    /// Parse either a compressed (33-byte) or uncompressed (65-byte, `0x04`)
    /// SEC1 point. The result is always held compressed.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        match bytes.len() {
            PUBLIC_KEY_SIZE => Self::from_bytes(bytes),
            UNCOMPRESSED_PUBLIC_KEY_SIZE => {
                if bytes[0] != 0x04 {
                    return Err(KeyError::InvalidPublicKeyPrefix(bytes[0]));
                }
                let point =
                    k256::PublicKey::from_sec1_bytes(bytes).map_err(|_| KeyError::InvalidCurvePoint)?;
                Ok(Self::from_point(point))
            }
            got => Err(KeyError::InvalidLength {
                what: "public key",
                expected: PUBLIC_KEY_SIZE,
                got,
            }),
        }
    }

    /// Parse a hex-encoded compressed point.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidHex)?;
        Self::from_bytes(&bytes)
    }

    pub(crate) fn from_point(point: k256::PublicKey) -> Self {
        let mut bytes = [0u8; PUBLIC_KEY_SIZE];
        bytes.copy_from_slice(point.to_encoded_point(true).as_bytes());
        Self { point, bytes }
    }

    pub(crate) fn as_point(&self) -> &k256::PublicKey {
        &self.point
    }

    /// The 33-byte compressed encoding.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.bytes
    }

    /// Owned copy of the compressed encoding.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.bytes
    }

    /// The 65-byte uncompressed encoding (`0x04 || x || y`).
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_SIZE] {
        let mut out = [0u8; UNCOMPRESSED_PUBLIC_KEY_SIZE];
        out.copy_from_slice(self.point.to_encoded_point(false).as_bytes());
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// `RIPEMD160(SHA256(compressed))`.
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.bytes)
    }

    /// BIP32 fingerprint: the first four bytes of [`hash160`](Self::hash160)
    /// read as a big-endian integer.
    pub fn fingerprint(&self) -> u32 {
        let id = self.hash160();
        u32::from_be_bytes([id[0], id[1], id[2], id[3]])
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for PublicKey {}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PublicKey::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// ChainCode
// ---------------------------------------------------------------------------

/// The 32-byte chain code carried by every extended key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ChainCode([u8; CHAIN_CODE_SIZE]);

impl ChainCode {
    /// Parse 32 bytes. An all-zero chain code is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != CHAIN_CODE_SIZE {
            return Err(KeyError::InvalidLength {
                what: "chain code",
                expected: CHAIN_CODE_SIZE,
                got: bytes.len(),
            });
        }
        if bytes.iter().all(|b| *b == 0) {
            return Err(KeyError::AllZeroChainCode);
        }
        let mut code = [0u8; CHAIN_CODE_SIZE];
        code.copy_from_slice(bytes);
        Ok(Self(code))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = Zeroizing::new(hex::decode(hex_str).map_err(|_| KeyError::InvalidHex)?);
        Self::from_bytes(&bytes)
    }

    /// Fresh random chain code from the OS RNG.
    pub fn generate() -> Self {
        let mut code = [0u8; CHAIN_CODE_SIZE];
        loop {
            OsRng.fill_bytes(&mut code);
            if code.iter().any(|b| *b != 0) {
                return Self(code);
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8; CHAIN_CODE_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ChainCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChainCode([REDACTED])")
    }
}
