//! # Key Derivation Constants
//!
//! Every magic number the keyrings depend on lives here: version bytes for
//! extended keys, the master HMAC key, address prefixes, and the named-chain
//! table that maps a human chain name onto a BIP44 `(purpose, coin_type)`
//! pair.
//!
//! Changing any of these changes every key and address a wallet derives.
//! Existing funds sit behind the current values, so treat them as frozen.

// ---------------------------------------------------------------------------
// BIP32
// ---------------------------------------------------------------------------

/// Indices at or above this value are hardened. Written `n'` in paths.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// HMAC-SHA512 key used to turn a seed into the master extended key.
///
/// Standard BIP32 value. Wallets that agree on it agree on every root key,
/// which is what makes a seed portable between implementations.
pub const MASTER_SECRET: &[u8] = b"Bitcoin seed";

/// Deepest level an extended key can sit at. Depth is serialized in one byte.
pub const MAX_DEPTH: u8 = u8::MAX;

/// Upper bound on "invalid child, try the next index" rounds during derivation.
///
/// The odds of needing even one retry are below 2^-127, so this only guards
/// against pathological inputs.
pub const MAX_DERIVATION_RETRIES: u32 = 16;

/// Accepted seed lengths in bytes (BIP32 recommends 128 to 512 bits).
pub const MIN_SEED_LENGTH: usize = 16;
pub const MAX_SEED_LENGTH: usize = 64;

/// Path of the first receiving address of the first Scintilla account.
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/8888'/0'/0/0";

// ---------------------------------------------------------------------------
// Extended Key Versions
// ---------------------------------------------------------------------------

/// `xprv`: legacy private version bytes.
pub const LEGACY_PRIVATE_VERSION: u32 = 0x0488_ade4;

/// `xpub`: legacy public version bytes.
pub const LEGACY_PUBLIC_VERSION: u32 = 0x0488_b21e;

/// `zprv`: BIP84 (native SegWit) private version bytes.
pub const NATIVE_PRIVATE_VERSION: u32 = 0x04b2_430c;

/// `zpub`: BIP84 (native SegWit) public version bytes.
pub const NATIVE_PUBLIC_VERSION: u32 = 0x04b2_4746;

// ---------------------------------------------------------------------------
// Key Sizes
// ---------------------------------------------------------------------------

pub const PRIVATE_KEY_SIZE: usize = 32;
pub const CHAIN_CODE_SIZE: usize = 32;
pub const PUBLIC_KEY_SIZE: usize = 33;
pub const UNCOMPRESSED_PUBLIC_KEY_SIZE: usize = 65;

/// version(4) || depth(1) || fingerprint(4) || index(4) || chain(32) || key(33)
pub const EXTENDED_KEY_SIZE: usize = 78;

/// Length of every hash160-based address payload.
pub const HASH160_SIZE: usize = 20;

// ---------------------------------------------------------------------------
// WIF
// ---------------------------------------------------------------------------

/// Mainnet WIF version byte. Private keys export as `K...`/`L...`.
pub const WIF_MAINNET_VERSION: u8 = 0x80;

/// Trailing flag marking the exported key as belonging to a compressed point.
pub const WIF_COMPRESSED_FLAG: u8 = 0x01;

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// Human-readable prefix of native Scintilla addresses.
pub const NATIVE_HRP: &str = "sct";

/// Default Cosmos SDK account prefix.
pub const COSMOS_HRP: &str = "cosmos";

/// Amino prefix for secp256k1 public keys in `cosmospub` strings.
pub const COSMOS_AMINO_PUBKEY_PREFIX: [u8; 5] = [0xeb, 0x5a, 0xe9, 0x87, 0x21];

/// P2PKH version bytes.
pub const BITCOIN_MAINNET_P2PKH: u8 = 0x00;
pub const BITCOIN_TESTNET_P2PKH: u8 = 0x6f;

/// SegWit human-readable prefixes.
pub const BITCOIN_MAINNET_HRP: &str = "bc";
pub const BITCOIN_TESTNET_HRP: &str = "tb";

/// Only witness version 0 (P2WPKH) is produced.
pub const SEGWIT_WITNESS_VERSION: u8 = 0;

// ---------------------------------------------------------------------------
// Chains & Personas
// ---------------------------------------------------------------------------

/// BIP44 purpose used when nothing else is asked for.
pub const DEFAULT_PURPOSE: u32 = 44;

/// Scintilla's registered coin type.
pub const SCINTILLA_COIN_TYPE: u32 = 8888;

/// Chain selected when a caller does not name one.
pub const DEFAULT_CHAIN: &str = "scintilla";

/// Named chains and their `(purpose, coin_type)` pair.
pub const NAMED_CHAINS: &[(&str, u32, u32)] = &[
    ("bitcoin", 44, 0),
    ("testnet-bitcoin", 44, 1),
    ("segwit", 49, 0),
    ("testnet-segwit", 49, 1),
    ("ethereum", 44, 60),
    ("cosmos", 44, 118),
    ("scintilla", 44, SCINTILLA_COIN_TYPE),
];

/// First (hardened) segment of every persona path: `m/2'/...`.
pub const PERSONA_PURPOSE: u32 = 2;

/// Shortest moniker accepted, in characters.
pub const MIN_MONIKER_LENGTH: usize = 2;
