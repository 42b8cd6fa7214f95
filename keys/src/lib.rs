// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Scintilla Keys
//!
//! Hierarchical-deterministic key management for Scintilla wallets. One
//! seed (or one BIP39 phrase) yields every key a user will ever hold, on
//! Scintilla and on the handful of other chains a Scintilla wallet talks to.
//!
//! ## Architecture
//!
//! - **crypto**: secp256k1 keys, digests, ECDSA. Thin wrappers over `k256`.
//! - **codec**: bech32 and base58check. The two string formats everything
//!   else is printed in.
//! - **hd**: BIP32 extended keys, derivation paths, `xprv`/`zprv` encoding.
//! - **moniker**: hashing persona names into hardened derivation paths.
//! - **keyring**: the seed → chain → account → persona → address hierarchy,
//!   with watch-only views at every layer.
//! - **address**: native `sct1...`, Cosmos, Bitcoin legacy and SegWit, and
//!   EIP-55 Ethereum addresses, plus format detection for arbitrary strings.
//! - **config**: version bytes, prefixes, and the named-chain table.
//!
//! ## Quick Start
//!
//! ```
//! use scintilla_keys::address::AddressChain;
//! use scintilla_keys::keyring::{AddressOptions, ChainOptions, SeedKeyring};
//!
//! let phrase = "abandon abandon abandon abandon abandon abandon \
//!               abandon abandon abandon abandon abandon about";
//! let seed = SeedKeyring::from_mnemonic(phrase, "").unwrap();
//! let account = seed
//!     .chain_keyring(&ChainOptions::default())
//!     .unwrap()
//!     .account_keyring(0)
//!     .unwrap();
//!
//! let alice = account.persona_keyring("sct.alice").unwrap();
//! let address = alice.address_keyring(0, AddressOptions::default()).unwrap();
//! assert_eq!(
//!     address.address(AddressChain::Scintilla).to_string(),
//!     "sct1xs3mt48hf9uyz36n5sdl5pfp99zgnlmslf6stm",
//! );
//! ```
//!
//! ## Ground Rules
//!
//! 1. Secrets are zeroized on drop, including every serialized form.
//! 2. Public keys never reach hardened children. It is an error, not a
//!    fallback.
//! 3. A keyring that has been secured stays secured.

pub mod address;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod hd;
pub mod keyring;
pub mod moniker;

pub use address::{Address, AddressChain, AddressError, DecodedAddress};
pub use crypto::{PrivateKey, PublicKey};
pub use hd::{DerivationError, DerivationPath, ExtendedKey, ExtendedPrivateKey, ExtendedPublicKey, KeyEncoding};
pub use keyring::{Keyring, KeyringError, SeedKeyring};
pub use moniker::{Moniker, MonikerError, MonikerPath};
