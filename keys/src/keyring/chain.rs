//! `m/purpose'/coin_type'`: one chain's branch of the tree.

use zeroize::Zeroizing;

use super::account::AccountKeyring;
use super::{derive_layer, private_key_of, Keyring, KeyringError};
use crate::config::HARDENED_OFFSET;
use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::hd::{ChildIndex, DerivationPath, ExtendedKey, ExtendedPublicKey, KeyEncoding};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainKeyring {
    key: ExtendedKey,
    purpose: u32,
    coin_type: u32,
    encoding: KeyEncoding,
}

impl ChainKeyring {
    /// Wrap a key already derived to `m/purpose'/coin_type'`.
    pub fn new(key: impl Into<ExtendedKey>, purpose: u32, coin_type: u32) -> Self {
        Self {
            key: key.into(),
            purpose,
            coin_type,
            encoding: KeyEncoding::Legacy,
        }
    }

    /// Serialize this layer with another version family (`zprv`/`zpub` for
    /// [`KeyEncoding::Native`]). Accounts derived from it are unaffected.
    pub fn with_encoding(mut self, encoding: KeyEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// The account at `m/account'` below this chain.
    pub fn account_keyring(&self, account: u32) -> Result<AccountKeyring, KeyringError> {
        let path = DerivationPath::from(vec![ChildIndex::hardened(account)?]);
        let key = derive_layer(&self.key, &path, "account")?;
        Ok(AccountKeyring::new(key))
    }

    pub fn purpose(&self) -> u32 {
        self.purpose
    }

    pub fn coin_type(&self) -> u32 {
        self.coin_type
    }

    pub fn encoding(&self) -> KeyEncoding {
        self.encoding
    }

    /// This layer's path from the master key.
    pub fn path(&self) -> DerivationPath {
        DerivationPath::from(vec![
            ChildIndex::from_raw(self.purpose | HARDENED_OFFSET),
            ChildIndex::from_raw(self.coin_type | HARDENED_OFFSET),
        ])
    }

    pub fn extended_key(&self) -> &ExtendedKey {
        &self.key
    }

    pub fn extended_public_key(&self) -> ExtendedPublicKey {
        self.key.to_extended_public_key()
    }

    pub fn to_base58(&self) -> Zeroizing<String> {
        self.key.to_base58(self.encoding)
    }
}

impl Keyring for ChainKeyring {
    fn public_key(&self) -> PublicKey {
        self.key.public_key()
    }

    fn private_key(&self) -> Result<&PrivateKey, KeyringError> {
        private_key_of(&self.key)
    }

    fn secure(self) -> Self {
        Self {
            key: self.key.neuter(),
            ..self
        }
    }
}
