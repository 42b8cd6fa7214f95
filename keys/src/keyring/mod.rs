//! # Keyrings
//!
//! Keyrings layer the usual wallet hierarchy on top of the HD engine:
//!
//! ```text
//! SeedKeyring      m
//!   └─ ChainKeyring     m/purpose'/coin_type'
//!        └─ AccountKeyring   m/purpose'/coin_type'/account'
//!             ├─ AddressKeyring          .../change/index
//!             ├─ PersonaKeyring          .../2'/a'/b'           (moniker hash)
//!             │    └─ AddressKeyring     .../2'/a'/b'/type/change/index
//!             └─ SharedPersonaKeyring    .../2'/a'/b'           (moniker pair hash)
//!                  └─ AddressKeyring     .../2'/a'/b'/change/index
//! ```
//!
//! Every layer except the last wraps exactly one [`ExtendedKey`]. Whether a
//! keyring is full or watch-only is simply which variant that key is, so
//! watch-only status flows to every child without any bookkeeping: a public
//! extended key can only ever derive public children.
//!
//! `secure()` consumes a keyring and returns the same view with the private
//! half dropped. There is no way back.

pub mod account;
pub mod address;
pub mod chain;
pub mod persona;
pub mod seed;

pub use account::AccountKeyring;
pub use address::AddressKeyring;
pub use chain::ChainKeyring;
pub use persona::{AddressOptions, PersonaKeyring, PersonaType, SharedPersonaKeyring};
pub use seed::{seed_from_mnemonic, ChainOptions, SeedKeyring};

use thiserror::Error;

use crate::address::AddressError;
use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::hd::{DerivationError, DerivationPath, ExtendedKey};
use crate::moniker::MonikerError;

/// Errors from keyring construction and derivation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyringError {
    #[error("private key is not available on a watch-only keyring")]
    PrivateKeyUnavailable,

    #[error("unsupported chain: {0}")]
    UnsupportedChain(String),

    #[error("invalid persona type: {0}")]
    InvalidPersonaType(String),

    #[error("invalid seed length: expected 16 to 64 bytes, got {0}")]
    InvalidSeedLength(usize),

    #[error("invalid mnemonic: {0}")]
    Mnemonic(String),

    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error(transparent)]
    Moniker(#[from] MonikerError),

    #[error(transparent)]
    Address(#[from] AddressError),
}

/// Capabilities every keyring layer shares.
pub trait Keyring {
    fn public_key(&self) -> PublicKey;

    /// Fails with [`KeyringError::PrivateKeyUnavailable`] on watch-only
    /// keyrings.
    fn private_key(&self) -> Result<&PrivateKey, KeyringError>;

    fn is_watch_only(&self) -> bool {
        self.private_key().is_err()
    }

    /// Drop the private half for good.
    fn secure(self) -> Self
    where
        Self: Sized;
}

/// Shared by the layers that wrap an extended key.
pub(crate) fn private_key_of(key: &ExtendedKey) -> Result<&PrivateKey, KeyringError> {
    key.private_key().ok_or(KeyringError::PrivateKeyUnavailable)
}

/// Walk `path` from `parent` and log the new layer.
pub(crate) fn derive_layer(
    parent: &ExtendedKey,
    path: &DerivationPath,
    layer: &'static str,
) -> Result<ExtendedKey, KeyringError> {
    let key = parent.derive_path(path)?;
    tracing::debug!(
        layer,
        path = %path,
        depth = key.base().depth(),
        watch_only = !key.is_private(),
        "derived keyring"
    );
    Ok(key)
}

/// Any keyring layer, for code that handles them uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyKeyring {
    Seed(SeedKeyring),
    Chain(ChainKeyring),
    Account(AccountKeyring),
    Persona(PersonaKeyring),
    SharedPersona(SharedPersonaKeyring),
    Address(AddressKeyring),
}

impl Keyring for AnyKeyring {
    fn public_key(&self) -> PublicKey {
        match self {
            AnyKeyring::Seed(k) => k.public_key(),
            AnyKeyring::Chain(k) => k.public_key(),
            AnyKeyring::Account(k) => k.public_key(),
            AnyKeyring::Persona(k) => k.public_key(),
            AnyKeyring::SharedPersona(k) => k.public_key(),
            AnyKeyring::Address(k) => k.public_key(),
        }
    }

    fn private_key(&self) -> Result<&PrivateKey, KeyringError> {
        match self {
            AnyKeyring::Seed(k) => k.private_key(),
            AnyKeyring::Chain(k) => k.private_key(),
            AnyKeyring::Account(k) => k.private_key(),
            AnyKeyring::Persona(k) => k.private_key(),
            AnyKeyring::SharedPersona(k) => k.private_key(),
            AnyKeyring::Address(k) => k.private_key(),
        }
    }

    fn secure(self) -> Self {
        match self {
            AnyKeyring::Seed(k) => AnyKeyring::Seed(k.secure()),
            AnyKeyring::Chain(k) => AnyKeyring::Chain(k.secure()),
            AnyKeyring::Account(k) => AnyKeyring::Account(k.secure()),
            AnyKeyring::Persona(k) => AnyKeyring::Persona(k.secure()),
            AnyKeyring::SharedPersona(k) => AnyKeyring::SharedPersona(k.secure()),
            AnyKeyring::Address(k) => AnyKeyring::Address(k.secure()),
        }
    }
}

macro_rules! impl_from_keyring {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for AnyKeyring {
                fn from(keyring: $ty) -> Self {
                    AnyKeyring::$variant(keyring)
                }
            }
        )*
    };
}

impl_from_keyring! {
    Seed => SeedKeyring,
    Chain => ChainKeyring,
    Account => AccountKeyring,
    Persona => PersonaKeyring,
    SharedPersona => SharedPersonaKeyring,
    Address => AddressKeyring,
}
