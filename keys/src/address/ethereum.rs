//! Ethereum account addresses with EIP-55 checksum casing.

use std::fmt;

use super::{AddressCodec, AddressError, AddressKind, DecodedAddress};
use crate::config::HASH160_SIZE;
use crate::crypto::hash::keccak256;
use crate::crypto::keys::PublicKey;

const HEX_LENGTH: usize = HASH160_SIZE * 2;

/// `0x` + the last 20 bytes of `keccak256(uncompressed_pubkey[1..])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthereumAddress {
    public_key: PublicKey,
    bytes: [u8; HASH160_SIZE],
    encoded: String,
}

impl EthereumAddress {
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let uncompressed = public_key.to_uncompressed();
        let digest = keccak256(&uncompressed[1..]);
        let mut bytes = [0u8; HASH160_SIZE];
        bytes.copy_from_slice(&digest[32 - HASH160_SIZE..]);
        Self {
            public_key: *public_key,
            bytes,
            encoded: to_checksum_address(&bytes),
        }
    }

    /// Accepts a 33-byte compressed or 65-byte `0x04`-prefixed key.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        Ok(Self::from_public_key(&PublicKey::from_sec1_bytes(bytes)?))
    }

    pub fn as_bytes(&self) -> &[u8; HASH160_SIZE] {
        &self.bytes
    }

    /// Parse `0x` + 40 hex digits. All-lowercase and all-uppercase inputs
    /// carry no checksum; mixed case must match EIP-55 exactly.
    pub fn decode_address(address: &str) -> Result<DecodedAddress, AddressError> {
        let digits = address
            .strip_prefix("0x")
            .filter(|d| d.len() == HEX_LENGTH && d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| AddressError::InvalidFormat(format!("{address:?} is not 0x + 40 hex digits")))?;

        let mut bytes = [0u8; HASH160_SIZE];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|err| AddressError::InvalidFormat(err.to_string()))?;

        let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
        let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
        let checksummed = has_upper && has_lower;
        if checksummed && to_checksum_address(&bytes) != address {
            return Err(AddressError::InvalidChecksum);
        }

        Ok(DecodedAddress::Ethereum {
            address: bytes,
            checksummed,
        })
    }

    pub fn validate_address(address: &str) -> bool {
        Self::decode_address(address).is_ok()
    }
}

/// EIP-55: uppercase each hex letter whose nibble in
/// `keccak256(lowercase_hex)` is 8 or more.
pub fn to_checksum_address(bytes: &[u8; HASH160_SIZE]) -> String {
    let lower = hex::encode(bytes);
    let digest = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(2 + HEX_LENGTH);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            digest[i / 2] >> 4
        } else {
            digest[i / 2] & 0x0f
        };
        out.push(if nibble >= 8 { c.to_ascii_uppercase() } else { c });
    }
    out
}

impl AddressCodec for EthereumAddress {
    fn kind(&self) -> AddressKind {
        AddressKind::Ethereum
    }

    fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    fn as_str(&self) -> &str {
        &self.encoded
    }

    fn validate(&self) -> bool {
        matches!(
            Self::decode_address(&self.encoded),
            Ok(DecodedAddress::Ethereum { address, .. }) if address == self.bytes
        ) && self.encoded == to_checksum_address(&self.bytes)
    }
}

impl fmt::Display for EthereumAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}
