//! # Hierarchical Deterministic Keys
//!
//! BIP32 over secp256k1. A seed becomes a master [`ExtendedPrivateKey`];
//! every other key in the tree is reached by walking a [`DerivationPath`]
//! one [`ChildIndex`] at a time.
//!
//! ```text
//! seed ──HMAC-SHA512("Bitcoin seed")──▶ m
//! m ──44'──▶ m/44' ──8888'──▶ m/44'/8888' ──0'──▶ ... ──0──▶ m/44'/8888'/0'/0/0
//! ```
//!
//! Private and public extended keys are separate types. Only the private one
//! can take a hardened step; asking a public key for one is an error, not a
//! silent fallback. [`ExtendedKey`] is the sum of the two for code that
//! holds "whatever key the keyring was built from".

pub mod extended;
pub mod path;

pub use extended::{ExtendedKey, ExtendedKeyBase, ExtendedPrivateKey, ExtendedPublicKey, KeyEncoding};
pub use path::{ChildIndex, DerivationPath};

use thiserror::Error;

use crate::codec::base58::Base58Error;
use crate::crypto::keys::KeyError;

/// Errors from derivation, path parsing, and extended key (de)serialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DerivationError {
    #[error("cannot derive hardened child {0}' from a public key")]
    HardenedDerivationForbidden(u32),

    #[error("invalid derivation path segment {0:?}")]
    InvalidPathSegment(String),

    #[error("child index {0} is out of range (must be below 2^31)")]
    IndexOutOfRange(u64),

    #[error("depth overflow: extended keys cannot be deeper than 255")]
    DepthOverflow,

    #[error("a depth-0 key must have a zero parent fingerprint and index")]
    InvalidRootState,

    #[error("seed produces an invalid master key")]
    InvalidMasterKey,

    #[error("version bytes 0x{0:08x} do not match the expected key type")]
    InvalidVersion(u32),

    #[error("invalid extended key length: expected 78 bytes, got {0}")]
    InvalidLength(usize),

    #[error("no valid child key found after {0} consecutive indices")]
    RetryLimitExceeded(u32),

    #[error("HMAC-SHA512 rejected the chain code as a key")]
    HmacKey,

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Encoding(#[from] Base58Error),
}
