//! Address type detection.
//!
//! Given a string of unknown origin, pick a decoder from its shape alone.
//! The checks run in a fixed priority order, first match wins:
//!
//! 1. `sct1...`                                  → native
//! 2. `0x` + 40 hex digits                       → Ethereum
//! 3. `bc1...` / `tb1...`                        → Bitcoin SegWit
//! 4. `1` or `3` + 25..=34 base58 characters      → Bitcoin legacy
//! 5. 1..=20 lowercase letters, `1`, 38..=58 of `[a-z0-9]` → Cosmos
//!
//! Detection only routes; the chosen decoder still verifies checksums and
//! lengths, so a string that looks right but is corrupt still fails.

use super::{
    AddressError, AddressKind, BitcoinLegacyAddress, BitcoinSegWitAddress, CosmosAddress,
    DecodedAddress, EthereumAddress, NativeAddress,
};

const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

fn is_ethereum_shape(s: &str) -> bool {
    s.strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}

fn is_legacy_shape(s: &str) -> bool {
    let Some((first, rest)) = s.as_bytes().split_first() else {
        return false;
    };
    matches!(first, b'1' | b'3')
        && (25..=34).contains(&rest.len())
        && rest.iter().all(|b| BASE58_ALPHABET.contains(b))
}

fn is_cosmos_shape(s: &str) -> bool {
    let Some(split) = s.find('1') else {
        return false;
    };
    let (prefix, data) = (&s[..split], &s[split + 1..]);
    (1..=20).contains(&prefix.len())
        && prefix.bytes().all(|b| b.is_ascii_lowercase())
        && (38..=58).contains(&data.len())
        && data
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

/// Classify an address string by shape.
pub fn detect_kind(address: &str) -> Result<AddressKind, AddressError> {
    if address.starts_with("sct1") {
        Ok(AddressKind::Native)
    } else if is_ethereum_shape(address) {
        Ok(AddressKind::Ethereum)
    } else if address.starts_with("bc1") || address.starts_with("tb1") {
        Ok(AddressKind::BitcoinSegWit)
    } else if is_legacy_shape(address) {
        Ok(AddressKind::BitcoinLegacy)
    } else if is_cosmos_shape(address) {
        Ok(AddressKind::Cosmos)
    } else {
        Err(AddressError::UnsupportedAddressType(address.to_string()))
    }
}

/// Detect the kind and decode with the matching decoder.
pub fn decode_address(address: &str) -> Result<DecodedAddress, AddressError> {
    let decoded = match detect_kind(address)? {
        AddressKind::Native => NativeAddress::decode_address(address),
        AddressKind::Ethereum => EthereumAddress::decode_address(address),
        AddressKind::BitcoinSegWit => BitcoinSegWitAddress::decode_address(address),
        AddressKind::BitcoinLegacy => BitcoinLegacyAddress::decode_address(address),
        AddressKind::Cosmos => CosmosAddress::decode_address(address),
    };
    if let Err(err) = &decoded {
        tracing::debug!(error = %err, "address failed to decode");
    }
    decoded
}

/// `true` when [`decode_address`] succeeds.
pub fn validate_address(address: &str) -> bool {
    decode_address(address).is_ok()
}
