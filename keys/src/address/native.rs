//! Bech32 hash160 addresses: the native `sct1...` form and Cosmos-style
//! chains that share the same construction under their own prefix.

use std::fmt;

use ::bech32::Hrp;

use super::{to_hash, AddressCodec, AddressError, AddressKind, DecodedAddress};
use crate::codec::bech32::{self, Variant};
use crate::config::{COSMOS_AMINO_PUBKEY_PREFIX, COSMOS_HRP, HASH160_SIZE, NATIVE_HRP};
use crate::crypto::keys::PublicKey;

const NATIVE: Hrp = Hrp::parse_unchecked(NATIVE_HRP);
const COSMOS: Hrp = Hrp::parse_unchecked(COSMOS_HRP);

fn encode_hash(prefix: &str, hash: &[u8; HASH160_SIZE]) -> Result<String, AddressError> {
    Ok(bech32::encode(prefix, &bech32::to_words(hash), Variant::Bech32)?)
}

fn decode_hash(address: &str) -> Result<(String, [u8; HASH160_SIZE]), AddressError> {
    let decoded = bech32::decode(address, Variant::Bech32)?;
    let hash = to_hash(&bech32::from_words(&decoded.words)?)?;
    Ok((decoded.hrp, hash))
}

fn is_lowercase_alpha(prefix: &str) -> bool {
    !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_lowercase())
}

/// Shared `validate` for both kinds: lowercase alphabetic prefix, and the
/// stored string decodes back to the same prefix and a 20-byte hash.
fn self_check(prefix: &str, hash: &[u8; HASH160_SIZE], encoded: &str) -> bool {
    is_lowercase_alpha(prefix)
        && matches!(decode_hash(encoded), Ok((hrp, decoded)) if hrp == prefix && &decoded == hash)
}

// ---------------------------------------------------------------------------
// NativeAddress
// ---------------------------------------------------------------------------

/// `bech32("sct", hash160(pk))`, or another prefix for test networks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeAddress {
    public_key: PublicKey,
    prefix: String,
    hash: [u8; HASH160_SIZE],
    encoded: String,
}

impl NativeAddress {
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let hash = public_key.hash160();
        Self {
            public_key: *public_key,
            prefix: NATIVE_HRP.to_string(),
            hash,
            encoded: bech32::encode_payload(&NATIVE, &hash),
        }
    }

    /// Same construction under a custom prefix (e.g. `tsct`).
    pub fn with_prefix(public_key: &PublicKey, prefix: &str) -> Result<Self, AddressError> {
        let hash = public_key.hash160();
        let encoded = encode_hash(prefix, &hash)?;
        Ok(Self {
            public_key: *public_key,
            prefix: prefix.to_string(),
            hash,
            encoded,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn hash(&self) -> &[u8; HASH160_SIZE] {
        &self.hash
    }

    /// Parse any bech32 string carrying a 20-byte payload. The prefix is not
    /// restricted to `sct`.
    pub fn decode_address(address: &str) -> Result<DecodedAddress, AddressError> {
        let (prefix, hash) = decode_hash(address)?;
        Ok(DecodedAddress::Native { prefix, hash })
    }

    pub fn validate_address(address: &str) -> bool {
        Self::decode_address(address).is_ok()
    }
}

impl AddressCodec for NativeAddress {
    fn kind(&self) -> AddressKind {
        AddressKind::Native
    }

    fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    fn as_str(&self) -> &str {
        &self.encoded
    }

    fn validate(&self) -> bool {
        self_check(&self.prefix, &self.hash, &self.encoded)
    }
}

impl fmt::Display for NativeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

// ---------------------------------------------------------------------------
// CosmosAddress
// ---------------------------------------------------------------------------

/// `bech32(prefix, hash160(pk))` for Cosmos SDK chains (`cosmos`, `osmo`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CosmosAddress {
    public_key: PublicKey,
    prefix: String,
    hash: [u8; HASH160_SIZE],
    encoded: String,
}

impl CosmosAddress {
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let hash = public_key.hash160();
        Self {
            public_key: *public_key,
            prefix: COSMOS_HRP.to_string(),
            hash,
            encoded: bech32::encode_payload(&COSMOS, &hash),
        }
    }

    pub fn with_prefix(public_key: &PublicKey, prefix: &str) -> Result<Self, AddressError> {
        let hash = public_key.hash160();
        let encoded = encode_hash(prefix, &hash)?;
        Ok(Self {
            public_key: *public_key,
            prefix: prefix.to_string(),
            hash,
            encoded,
        })
    }

    /// Build from a bech32 public key (`cosmospub1...`). The amino prefix
    /// `eb5ae98721`, when present, is stripped before the key is parsed.
    pub fn from_bech32_public_key(encoded: &str, prefix: &str) -> Result<Self, AddressError> {
        let decoded = bech32::decode(encoded, Variant::Bech32)?;
        let bytes = bech32::from_words(&decoded.words)?;
        let key_bytes = bytes
            .strip_prefix(&COSMOS_AMINO_PUBKEY_PREFIX[..])
            .unwrap_or(&bytes);
        let public_key = PublicKey::from_bytes(key_bytes)?;
        Self::with_prefix(&public_key, prefix)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn hash(&self) -> &[u8; HASH160_SIZE] {
        &self.hash
    }

    /// Parse a Cosmos-style address. The prefix must be lowercase letters.
    pub fn decode_address(address: &str) -> Result<DecodedAddress, AddressError> {
        let (prefix, hash) = decode_hash(address)?;
        if !is_lowercase_alpha(&prefix) {
            return Err(AddressError::InvalidPrefix(prefix));
        }
        Ok(DecodedAddress::Cosmos { prefix, hash })
    }

    pub fn validate_address(address: &str) -> bool {
        Self::decode_address(address).is_ok()
    }
}

impl AddressCodec for CosmosAddress {
    fn kind(&self) -> AddressKind {
        AddressKind::Cosmos
    }

    fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    fn as_str(&self) -> &str {
        &self.encoded
    }

    fn validate(&self) -> bool {
        self_check(&self.prefix, &self.hash, &self.encoded)
    }
}

impl fmt::Display for CosmosAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const G_PUBKEY: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const G_NATIVE: &str = "sct1w508d6qejxtdg4y5r3zarvary0c5xw7k2au4d9";
    const G_COSMOS: &str = "cosmos1w508d6qejxtdg4y5r3zarvary0c5xw7k6ah60c";
    const G_COSMOSPUB: &str =
        "cosmospub1addwnpepqfumuen7l8wthtz45p3ftn58pvrs9xlumvkuu2xet8egzkcklqtesk4fq47";

    fn g() -> PublicKey {
        PublicKey::from_hex(G_PUBKEY).unwrap()
    }

    /// Replace the character at `i` with a different one from the bech32
    /// alphabet (or the lowercase alphabet inside the prefix).
    fn flip(s: &str, i: usize) -> String {
        let mut chars: Vec<char> = s.chars().collect();
        chars[i] = if chars[i] == 'q' { 'p' } else { 'q' };
        chars.into_iter().collect()
    }

    #[test]
    fn test_native_vector() {
        let address = NativeAddress::from_public_key(&g());
        assert_eq!(address.to_string(), G_NATIVE);
        assert_eq!(address.prefix(), "sct");
        assert_eq!(
            hex::encode(address.hash()),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
        assert!(address.validate());
    }

    #[test]
    fn test_native_decode_accepts_any_prefix() {
        let testnet = NativeAddress::with_prefix(&g(), "tsct").unwrap();
        match NativeAddress::decode_address(testnet.as_str()).unwrap() {
            DecodedAddress::Native { prefix, hash } => {
                assert_eq!(prefix, "tsct");
                assert_eq!(hash, g().hash160());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_cosmos_vector() {
        let address = CosmosAddress::from_public_key(&g());
        assert_eq!(address.to_string(), G_COSMOS);
        assert!(address.validate());
        assert!(CosmosAddress::validate_address(G_COSMOS));
    }

    #[test]
    fn fixed_prefixes_match_the_checked_encoder() {
        assert_eq!(
            NativeAddress::from_public_key(&g()),
            NativeAddress::with_prefix(&g(), NATIVE_HRP).unwrap()
        );
        assert_eq!(
            CosmosAddress::from_public_key(&g()),
            CosmosAddress::with_prefix(&g(), COSMOS_HRP).unwrap()
        );
    }

    #[test]
    fn test_custom_cosmos_prefix() {
        let osmo = CosmosAddress::with_prefix(&g(), "osmo").unwrap();
        assert!(osmo.to_string().starts_with("osmo1"));
        assert!(osmo.validate());
        assert_eq!(
            CosmosAddress::decode_address(osmo.as_str()).unwrap().hash(),
            &g().hash160()
        );
    }

    #[test]
    fn validate_rejects_non_alphabetic_prefix() {
        let address = NativeAddress::with_prefix(&g(), "sct2").unwrap();
        assert!(!address.validate());
        assert!(matches!(
            CosmosAddress::decode_address(address.as_str()),
            Err(AddressError::InvalidPrefix(p)) if p == "sct2"
        ));
    }

    #[test]
    fn test_from_bech32_public_key() {
        let address = CosmosAddress::from_bech32_public_key(G_COSMOSPUB, "cosmos").unwrap();
        assert_eq!(address.public_key(), &g());
        assert_eq!(address.to_string(), G_COSMOS);

        // Without the amino prefix the raw key is used as is.
        let raw = bech32::encode(
            "cosmospub",
            &bech32::to_words(g().as_bytes()),
            Variant::Bech32,
        )
        .unwrap();
        let address = CosmosAddress::from_bech32_public_key(&raw, "cosmos").unwrap();
        assert_eq!(address.to_string(), G_COSMOS);
    }

    #[test]
    fn test_wrong_payload_length_rejected() {
        let short = bech32::encode("sct", &bech32::to_words(&[1u8; 19]), Variant::Bech32).unwrap();
        assert_eq!(
            NativeAddress::decode_address(&short),
            Err(AddressError::InvalidHashLength(19))
        );
    }

    #[test]
    fn single_character_flip_is_rejected() {
        for address in [G_NATIVE, G_COSMOS] {
            for i in 0..address.len() {
                let corrupted = flip(address, i);
                assert!(
                    !NativeAddress::validate_address(&corrupted),
                    "{corrupted} should not decode"
                );
            }
        }
    }

    #[test]
    fn test_mixed_case_rejected() {
        let mixed = G_NATIVE.replacen('w', "W", 1);
        assert!(matches!(
            NativeAddress::decode_address(&mixed),
            Err(AddressError::Bech32(bech32::Bech32Error::MixedCase))
        ));
    }
}
