//! # Addresses
//!
//! Every address is a deterministic function of a public key plus a few
//! parameters (prefix or network). Five encodings are supported:
//!
//! | Kind             | Construction                                        | Example prefix |
//! |------------------|-----------------------------------------------------|----------------|
//! | Native           | `bech32("sct", hash160(pk))`                        | `sct1`         |
//! | Cosmos           | `bech32(prefix, hash160(pk))`                       | `cosmos1`      |
//! | Bitcoin legacy   | `base58check(0x00 / 0x6f ‖ hash160(pk))`            | `1`, `m`, `n`  |
//! | Bitcoin SegWit   | `bech32("bc" / "tb", [0] ‖ words(hash160(pk)))`     | `bc1q`         |
//! | Ethereum         | `keccak256(uncompressed(pk)[1..])[12..]`, EIP-55    | `0x`           |
//!
//! Addresses are computed once at construction and kept as strings, so
//! `Display` is infallible. Parsing an address string goes the other way
//! only as far as the hash: the public key cannot be recovered, so decoding
//! yields a [`DecodedAddress`] with structural fields and nothing more.

pub mod bitcoin;
pub mod detect;
pub mod ethereum;
pub mod native;

pub use bitcoin::{BitcoinLegacyAddress, BitcoinNetwork, BitcoinSegWitAddress};
pub use detect::{decode_address, detect_kind, validate_address};
pub use ethereum::EthereumAddress;
pub use native::{CosmosAddress, NativeAddress};

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::codec::base58::Base58Error;
use crate::codec::bech32::Bech32Error;
use crate::config::HASH160_SIZE;
use crate::crypto::keys::{KeyError, PublicKey};

/// Errors from address construction and decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("bech32: {0}")]
    Bech32(#[from] Bech32Error),

    #[error("base58check: {0}")]
    Base58(#[from] Base58Error),

    #[error("invalid address prefix {0:?}")]
    InvalidPrefix(String),

    #[error("unsupported witness version {0}")]
    UnsupportedWitnessVersion(u8),

    #[error("invalid hash length: expected 20 bytes, got {0}")]
    InvalidHashLength(usize),

    #[error("address checksum mismatch")]
    InvalidChecksum,

    #[error("malformed address: {0}")]
    InvalidFormat(String),

    #[error("unsupported network: {0}")]
    UnsupportedNetwork(String),

    #[error("could not detect the address type of {0:?}")]
    UnsupportedAddressType(String),

    #[error("unsupported chain: {0}")]
    UnsupportedChain(String),

    #[error(transparent)]
    Key(#[from] KeyError),
}

// ---------------------------------------------------------------------------
// AddressKind / AddressChain
// ---------------------------------------------------------------------------

/// The five address encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressKind {
    Native,
    Cosmos,
    BitcoinLegacy,
    #[serde(rename = "bitcoin-segwit")]
    BitcoinSegWit,
    Ethereum,
}

impl AddressKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AddressKind::Native => "native",
            AddressKind::Cosmos => "cosmos",
            AddressKind::BitcoinLegacy => "bitcoin-legacy",
            AddressKind::BitcoinSegWit => "bitcoin-segwit",
            AddressKind::Ethereum => "ethereum",
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which address an address keyring should render. Parsed from the chain
/// names and tickers operators type (`sct`, `btc`, `eth`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressChain {
    #[default]
    Scintilla,
    Cosmos,
    Bitcoin,
    SegWit,
    Ethereum,
}

impl AddressChain {
    pub fn kind(self) -> AddressKind {
        match self {
            AddressChain::Scintilla => AddressKind::Native,
            AddressChain::Cosmos => AddressKind::Cosmos,
            AddressChain::Bitcoin => AddressKind::BitcoinLegacy,
            AddressChain::SegWit => AddressKind::BitcoinSegWit,
            AddressChain::Ethereum => AddressKind::Ethereum,
        }
    }
}

impl FromStr for AddressChain {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scintilla" | "sct" => Ok(AddressChain::Scintilla),
            "cosmos" | "atom" => Ok(AddressChain::Cosmos),
            "bitcoin" | "btc" => Ok(AddressChain::Bitcoin),
            "segwit" | "btc-segwit" => Ok(AddressChain::SegWit),
            "ethereum" | "eth" => Ok(AddressChain::Ethereum),
            _ => Err(AddressError::UnsupportedChain(s.to_string())),
        }
    }
}

impl fmt::Display for AddressChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AddressChain::Scintilla => "scintilla",
            AddressChain::Cosmos => "cosmos",
            AddressChain::Bitcoin => "bitcoin",
            AddressChain::SegWit => "segwit",
            AddressChain::Ethereum => "ethereum",
        })
    }
}

// ---------------------------------------------------------------------------
// AddressCodec
// ---------------------------------------------------------------------------

/// Shared behaviour of every address variant.
pub trait AddressCodec: fmt::Display {
    fn kind(&self) -> AddressKind;

    /// The key the address was built from.
    fn public_key(&self) -> &PublicKey;

    /// The canonical string form.
    fn as_str(&self) -> &str;

    /// Re-decode the canonical string and check it against this address's
    /// own parameters.
    fn validate(&self) -> bool;
}

/// Any of the five address variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    Native(NativeAddress),
    Cosmos(CosmosAddress),
    BitcoinLegacy(BitcoinLegacyAddress),
    BitcoinSegWit(BitcoinSegWitAddress),
    Ethereum(EthereumAddress),
}

impl Address {
    /// The default address for `chain`: `sct` prefix, `cosmos` prefix, or
    /// Bitcoin mainnet.
    pub fn from_public_key(public_key: &PublicKey, chain: AddressChain) -> Self {
        match chain {
            AddressChain::Scintilla => Address::Native(NativeAddress::from_public_key(public_key)),
            AddressChain::Cosmos => Address::Cosmos(CosmosAddress::from_public_key(public_key)),
            AddressChain::Bitcoin => Address::BitcoinLegacy(BitcoinLegacyAddress::from_public_key(
                public_key,
                BitcoinNetwork::Mainnet,
            )),
            AddressChain::SegWit => Address::BitcoinSegWit(BitcoinSegWitAddress::from_public_key(
                public_key,
                BitcoinNetwork::Mainnet,
            )),
            AddressChain::Ethereum => Address::Ethereum(EthereumAddress::from_public_key(public_key)),
        }
    }

    fn inner(&self) -> &dyn AddressCodec {
        match self {
            Address::Native(a) => a,
            Address::Cosmos(a) => a,
            Address::BitcoinLegacy(a) => a,
            Address::BitcoinSegWit(a) => a,
            Address::Ethereum(a) => a,
        }
    }
}

impl AddressCodec for Address {
    fn kind(&self) -> AddressKind {
        self.inner().kind()
    }

    fn public_key(&self) -> &PublicKey {
        self.inner().public_key()
    }

    fn as_str(&self) -> &str {
        self.inner().as_str()
    }

    fn validate(&self) -> bool {
        self.inner().validate()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DecodedAddress
// ---------------------------------------------------------------------------

/// What can be read back out of an address string. Structural only: the
/// hash is one-way, so no variant carries a public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DecodedAddress {
    Native {
        prefix: String,
        #[serde(serialize_with = "serialize_hash")]
        hash: [u8; HASH160_SIZE],
    },
    Cosmos {
        prefix: String,
        #[serde(serialize_with = "serialize_hash")]
        hash: [u8; HASH160_SIZE],
    },
    BitcoinLegacy {
        network: BitcoinNetwork,
        #[serde(serialize_with = "serialize_hash")]
        hash: [u8; HASH160_SIZE],
    },
    #[serde(rename = "bitcoin-segwit")]
    BitcoinSegWit {
        network: BitcoinNetwork,
        witness_version: u8,
        #[serde(serialize_with = "serialize_hash")]
        program: [u8; HASH160_SIZE],
    },
    Ethereum {
        #[serde(serialize_with = "serialize_hash")]
        address: [u8; HASH160_SIZE],
        /// Whether the input carried an EIP-55 mixed-case checksum.
        checksummed: bool,
    },
}

impl DecodedAddress {
    pub fn kind(&self) -> AddressKind {
        match self {
            DecodedAddress::Native { .. } => AddressKind::Native,
            DecodedAddress::Cosmos { .. } => AddressKind::Cosmos,
            DecodedAddress::BitcoinLegacy { .. } => AddressKind::BitcoinLegacy,
            DecodedAddress::BitcoinSegWit { .. } => AddressKind::BitcoinSegWit,
            DecodedAddress::Ethereum { .. } => AddressKind::Ethereum,
        }
    }

    /// The 20-byte payload: hash160 for four kinds, the account bytes for
    /// Ethereum.
    pub fn hash(&self) -> &[u8; HASH160_SIZE] {
        match self {
            DecodedAddress::Native { hash, .. }
            | DecodedAddress::Cosmos { hash, .. }
            | DecodedAddress::BitcoinLegacy { hash, .. } => hash,
            DecodedAddress::BitcoinSegWit { program, .. } => program,
            DecodedAddress::Ethereum { address, .. } => address,
        }
    }
}

fn serialize_hash<S: Serializer>(hash: &[u8; HASH160_SIZE], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(hash))
}

/// Copy a decoded payload into a fixed hash, or report its length.
pub(crate) fn to_hash(bytes: &[u8]) -> Result<[u8; HASH160_SIZE], AddressError> {
    bytes
        .try_into()
        .map_err(|_| AddressError::InvalidHashLength(bytes.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const G_PUBKEY: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    fn g() -> PublicKey {
        PublicKey::from_hex(G_PUBKEY).unwrap()
    }

    #[test]
    fn test_every_chain_renders_its_kind() {
        let expected = [
            (AddressChain::Scintilla, "sct1w508d6qejxtdg4y5r3zarvary0c5xw7k2au4d9"),
            (AddressChain::Cosmos, "cosmos1w508d6qejxtdg4y5r3zarvary0c5xw7k6ah60c"),
            (AddressChain::Bitcoin, "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"),
            (AddressChain::SegWit, "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"),
            (AddressChain::Ethereum, "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"),
        ];
        for (chain, address) in expected {
            let rendered = Address::from_public_key(&g(), chain);
            assert_eq!(rendered.to_string(), address, "{chain}");
            assert_eq!(rendered.kind(), chain.kind());
            assert_eq!(rendered.public_key(), &g());
            assert!(rendered.validate());
        }
    }

    #[test]
    fn test_chain_aliases() {
        for (name, chain) in [
            ("sct", AddressChain::Scintilla),
            ("Scintilla", AddressChain::Scintilla),
            ("atom", AddressChain::Cosmos),
            ("BTC", AddressChain::Bitcoin),
            ("btc-segwit", AddressChain::SegWit),
            ("segwit", AddressChain::SegWit),
            ("eth", AddressChain::Ethereum),
        ] {
            assert_eq!(name.parse::<AddressChain>().unwrap(), chain, "{name}");
        }
        assert_eq!(
            "dogecoin".parse::<AddressChain>(),
            Err(AddressError::UnsupportedChain("dogecoin".into()))
        );
    }

    #[test]
    fn decoded_address_serializes_hash_as_hex() {
        let decoded = DecodedAddress::Native {
            prefix: "sct".into(),
            hash: [0xab; 20],
        };
        let json = serde_json::to_value(&decoded).unwrap();
        assert_eq!(json["type"], "native");
        assert_eq!(json["prefix"], "sct");
        assert_eq!(json["hash"], "ab".repeat(20));
    }

    #[test]
    fn test_to_hash_length() {
        assert!(to_hash(&[0u8; 20]).is_ok());
        assert_eq!(to_hash(&[0u8; 19]), Err(AddressError::InvalidHashLength(19)));
    }
}
