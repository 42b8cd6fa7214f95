//! # Text Encodings
//!
//! The two checksummed alphabets every key and address string uses:
//!
//! - **Bech32 / Bech32m**: the `bech32` crate, with the length limit, strict
//!   word conversion and error mapping the addresses need.
//! - **Base58Check**: a thin wrapper around `bs58`.

pub mod base58;
pub mod bech32;

pub use base58::{decode_check, encode_check, Base58Error};
pub use bech32::{Bech32Error, Variant};
