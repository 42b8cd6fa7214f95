//! Bitcoin pay-to-pubkey-hash addresses, legacy (Base58Check) and native
//! SegWit v0 (bech32).

use std::fmt;
use std::str::FromStr;

use ::bech32::hrp::{BC, TB};
use ::bech32::Hrp;
use serde::Serialize;

use super::{to_hash, AddressCodec, AddressError, AddressKind, DecodedAddress};
use crate::codec::base58;
use crate::codec::bech32;
use crate::config::{
    BITCOIN_MAINNET_HRP, BITCOIN_MAINNET_P2PKH, BITCOIN_TESTNET_HRP, BITCOIN_TESTNET_P2PKH,
    HASH160_SIZE, SEGWIT_WITNESS_VERSION,
};
use crate::crypto::keys::PublicKey;

/// Bitcoin network selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BitcoinNetwork {
    #[default]
    Mainnet,
    Testnet,
}

impl BitcoinNetwork {
    /// P2PKH version byte.
    pub const fn p2pkh_version(self) -> u8 {
        match self {
            BitcoinNetwork::Mainnet => BITCOIN_MAINNET_P2PKH,
            BitcoinNetwork::Testnet => BITCOIN_TESTNET_P2PKH,
        }
    }

    /// SegWit human-readable prefix.
    pub const fn hrp(self) -> &'static str {
        match self {
            BitcoinNetwork::Mainnet => BITCOIN_MAINNET_HRP,
            BitcoinNetwork::Testnet => BITCOIN_TESTNET_HRP,
        }
    }

    fn segwit_hrp(self) -> Hrp {
        match self {
            BitcoinNetwork::Mainnet => BC,
            BitcoinNetwork::Testnet => TB,
        }
    }

    fn from_p2pkh_version(version: u8) -> Option<Self> {
        match version {
            BITCOIN_MAINNET_P2PKH => Some(BitcoinNetwork::Mainnet),
            BITCOIN_TESTNET_P2PKH => Some(BitcoinNetwork::Testnet),
            _ => None,
        }
    }

    fn from_hrp(hrp: &str) -> Option<Self> {
        match hrp {
            BITCOIN_MAINNET_HRP => Some(BitcoinNetwork::Mainnet),
            BITCOIN_TESTNET_HRP => Some(BitcoinNetwork::Testnet),
            _ => None,
        }
    }
}

impl FromStr for BitcoinNetwork {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Ok(BitcoinNetwork::Mainnet),
            "testnet" | "test" => Ok(BitcoinNetwork::Testnet),
            _ => Err(AddressError::UnsupportedNetwork(s.to_string())),
        }
    }
}

impl fmt::Display for BitcoinNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BitcoinNetwork::Mainnet => "mainnet",
            BitcoinNetwork::Testnet => "testnet",
        })
    }
}

// ---------------------------------------------------------------------------
// BitcoinLegacyAddress
// ---------------------------------------------------------------------------

/// P2PKH: `base58check(version ‖ hash160(pk))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitcoinLegacyAddress {
    public_key: PublicKey,
    network: BitcoinNetwork,
    hash: [u8; HASH160_SIZE],
    encoded: String,
}

impl BitcoinLegacyAddress {
    pub fn from_public_key(public_key: &PublicKey, network: BitcoinNetwork) -> Self {
        let hash = public_key.hash160();
        let mut payload = [0u8; 1 + HASH160_SIZE];
        payload[0] = network.p2pkh_version();
        payload[1..].copy_from_slice(&hash);
        Self {
            public_key: *public_key,
            network,
            hash,
            encoded: base58::encode_check(&payload),
        }
    }

    pub fn network(&self) -> BitcoinNetwork {
        self.network
    }

    pub fn hash(&self) -> &[u8; HASH160_SIZE] {
        &self.hash
    }

    pub fn decode_address(address: &str) -> Result<DecodedAddress, AddressError> {
        let payload = base58::decode_check(address)?;
        let (version, hash) = payload
            .split_first()
            .ok_or_else(|| AddressError::InvalidFormat("empty payload".into()))?;
        let network = BitcoinNetwork::from_p2pkh_version(*version)
            .ok_or_else(|| AddressError::UnsupportedNetwork(format!("version byte 0x{version:02x}")))?;
        Ok(DecodedAddress::BitcoinLegacy {
            network,
            hash: to_hash(hash)?,
        })
    }

    pub fn validate_address(address: &str) -> bool {
        Self::decode_address(address).is_ok()
    }
}

impl AddressCodec for BitcoinLegacyAddress {
    fn kind(&self) -> AddressKind {
        AddressKind::BitcoinLegacy
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
            Ok(DecodedAddress::BitcoinLegacy { network, hash })
                if network == self.network && hash == self.hash
        )
    }
}

impl fmt::Display for BitcoinLegacyAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

// ---------------------------------------------------------------------------
// BitcoinSegWitAddress
// ---------------------------------------------------------------------------

/// P2WPKH: `bech32(hrp, [0] ‖ words(hash160(pk)))`. Always built from the
/// compressed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitcoinSegWitAddress {
    public_key: PublicKey,
    network: BitcoinNetwork,
    program: [u8; HASH160_SIZE],
    encoded: String,
}

impl BitcoinSegWitAddress {
    pub fn from_public_key(public_key: &PublicKey, network: BitcoinNetwork) -> Self {
        let program = public_key.hash160();
        let encoded = bech32::encode_witness_v0(&network.segwit_hrp(), &program);
        Self {
            public_key: *public_key,
            network,
            program,
            encoded,
        }
    }

    pub fn network(&self) -> BitcoinNetwork {
        self.network
    }

    pub fn witness_version(&self) -> u8 {
        SEGWIT_WITNESS_VERSION
    }

    pub fn program(&self) -> &[u8; HASH160_SIZE] {
        &self.program
    }

    pub fn decode_address(address: &str) -> Result<DecodedAddress, AddressError> {
        let decoded = bech32::decode_segwit(address)?;
        let network = BitcoinNetwork::from_hrp(&decoded.hrp)
            .ok_or_else(|| AddressError::InvalidPrefix(decoded.hrp.clone()))?;
        if decoded.witness_version != SEGWIT_WITNESS_VERSION {
            return Err(AddressError::UnsupportedWitnessVersion(decoded.witness_version));
        }
        Ok(DecodedAddress::BitcoinSegWit {
            network,
            witness_version: decoded.witness_version,
            program: to_hash(&decoded.program)?,
        })
    }

    pub fn validate_address(address: &str) -> bool {
        Self::decode_address(address).is_ok()
    }
}

impl AddressCodec for BitcoinSegWitAddress {
    fn kind(&self) -> AddressKind {
        AddressKind::BitcoinSegWit
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
            Ok(DecodedAddress::BitcoinSegWit { network, program, .. })
                if network == self.network && program == self.program
        )
    }
}

impl fmt::Display for BitcoinSegWitAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}
