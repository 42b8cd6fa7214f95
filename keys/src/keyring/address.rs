//! The leaf of the tree: one key pair, rendered as an address on any
//! supported chain.
//!
//! Unlike the other layers an address keyring holds no chain code. It can
//! sign, export WIF, and produce addresses, but it cannot derive further.

use zeroize::Zeroizing;

use super::{Keyring, KeyringError};
use crate::address::{Address, AddressChain};
use crate::config::WIF_MAINNET_VERSION;
use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::crypto::signatures::{MessageSigner, Signature, SignatureError};
use crate::hd::ExtendedKey;

/// A full key pair or its watch-only public half.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressKeyring {
    Full {
        private: PrivateKey,
        public: PublicKey,
    },
    WatchOnly {
        public: PublicKey,
    },
}

impl AddressKeyring {
    pub fn from_private_key(private: PrivateKey) -> Self {
        let public = private.public_key();
        AddressKeyring::Full { private, public }
    }

    pub fn from_public_key(public: PublicKey) -> Self {
        AddressKeyring::WatchOnly { public }
    }

    /// Drop the chain code of a derived key.
    pub(crate) fn from_extended_key(key: &ExtendedKey) -> Self {
        match key.private_key() {
            Some(private) => Self::from_private_key(private.clone()),
            None => Self::from_public_key(key.public_key()),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            AddressKeyring::Full { public, .. } | AddressKeyring::WatchOnly { public } => *public,
        }
    }

    /// The address of this key on `chain`.
    pub fn address(&self, chain: AddressChain) -> Address {
        Address::from_public_key(&self.public_key(), chain)
    }

    /// Like [`address`](Self::address), taking a chain name or ticker.
    pub fn address_for(&self, chain: &str) -> Result<Address, KeyringError> {
        let chain = chain
            .parse::<AddressChain>()
            .map_err(|_| KeyringError::UnsupportedChain(chain.to_string()))?;
        Ok(self.address(chain))
    }

    /// Compressed mainnet WIF (`K...`/`L...`).
    pub fn to_wif(&self) -> Result<Zeroizing<String>, KeyringError> {
        Ok(Keyring::private_key(self)?.to_wif(WIF_MAINNET_VERSION))
    }
}

impl Keyring for AddressKeyring {
    fn public_key(&self) -> PublicKey {
        AddressKeyring::public_key(self)
    }

    fn private_key(&self) -> Result<&PrivateKey, KeyringError> {
        match self {
            AddressKeyring::Full { private, .. } => Ok(private),
            AddressKeyring::WatchOnly { .. } => Err(KeyringError::PrivateKeyUnavailable),
        }
    }

    fn secure(self) -> Self {
        AddressKeyring::WatchOnly {
            public: AddressKeyring::public_key(&self),
        }
    }
}

impl MessageSigner for AddressKeyring {
    fn sign(&self, message: &[u8]) -> Result<Signature, SignatureError> {
        match self {
            AddressKeyring::Full { private, .. } => private.sign(message),
            AddressKeyring::WatchOnly { .. } => Err(SignatureError::PrivateKeyUnavailable),
        }
    }

    fn public_key(&self) -> PublicKey {
        AddressKeyring::public_key(self)
    }
}
