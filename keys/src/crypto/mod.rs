//! # Cryptographic Primitives
//!
//! Everything below the derivation engine: digests, validated secp256k1 key
//! wrappers, and the signing seam.
//!
//! - **secp256k1** via `k256`: keys, point arithmetic, ECDSA.
//! - **SHA-256 / RIPEMD-160 / Keccak-256 / HMAC-SHA512** via the RustCrypto
//!   hash crates.
//!
//! Nothing here is hand-rolled curve math. The only arithmetic this crate
//! does itself is the BIP32 tweak-add in [`crate::hd`], and that is a few
//! lines over `k256` types.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{double_sha256, hash160, hmac_sha512, keccak256, sha256};
pub use keys::{ChainCode, KeyError, PrivateKey, PublicKey};
pub use signatures::{verify, MessageSigner, Signature, SignatureError};
