//! One account: BIP44 addresses plus the persona sub-trees.

use zeroize::Zeroizing;

use super::address::AddressKeyring;
use super::persona::{PersonaKeyring, SharedPersonaKeyring};
use super::{derive_layer, private_key_of, Keyring, KeyringError};
use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::hd::{ChildIndex, DerivationPath, ExtendedKey, ExtendedPublicKey, KeyEncoding};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountKeyring {
    key: ExtendedKey,
}

impl AccountKeyring {
    /// Wrap an account-level key. An `xpub` gives a watch-only account.
    pub fn new(key: impl Into<ExtendedKey>) -> Self {
        Self { key: key.into() }
    }

    /// Parse an account `xprv`/`xpub` (or `z` variant).
    pub fn from_base58(encoded: &str) -> Result<Self, KeyringError> {
        Ok(Self::new(ExtendedKey::from_base58(encoded)?))
    }

    /// The address at `m/change/index` (both non-hardened).
    pub fn address_keyring(&self, index: u32, change: u32) -> Result<AddressKeyring, KeyringError> {
        let path = DerivationPath::from(vec![ChildIndex::normal(change)?, ChildIndex::normal(index)?]);
        let key = derive_layer(&self.key, &path, "address")?;
        Ok(AddressKeyring::from_extended_key(&key))
    }

    /// The persona sub-tree for `moniker`.
    pub fn persona_keyring(&self, moniker: &str) -> Result<PersonaKeyring, KeyringError> {
        PersonaKeyring::new(&self.key, moniker)
    }

    /// The sub-tree shared by two monikers, in either order.
    pub fn shared_persona_keyring(
        &self,
        moniker: &str,
        other: &str,
    ) -> Result<SharedPersonaKeyring, KeyringError> {
        SharedPersonaKeyring::new(&self.key, moniker, other)
    }

    pub fn extended_key(&self) -> &ExtendedKey {
        &self.key
    }

    pub fn extended_public_key(&self) -> ExtendedPublicKey {
        self.key.to_extended_public_key()
    }

    pub fn to_base58(&self) -> Zeroizing<String> {
        self.key.to_base58(KeyEncoding::Legacy)
    }
}

impl Keyring for AccountKeyring {
    fn public_key(&self) -> PublicKey {
        self.key.public_key()
    }

    fn private_key(&self) -> Result<&PrivateKey, KeyringError> {
        private_key_of(&self.key)
    }

    fn secure(self) -> Self {
        Self {
            key: self.key.neuter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::AddressChain;
    use crate::hd::ExtendedPrivateKey;

    fn account() -> AccountKeyring {
        AccountKeyring::new(
            ExtendedPrivateKey::from_seed(&[1u8; 32])
                .unwrap()
                .derive("m/44'/8888'/0'")
                .unwrap(),
        )
    }

    #[test]
    fn test_address_path_is_change_then_index() {
        let account = account();
        let direct = account.extended_key().derive("m/1/5").unwrap();
        let keyring = account.address_keyring(5, 1).unwrap();
        assert_eq!(keyring.public_key(), direct.public_key());
    }

    #[test]
    fn watch_only_account_derives_same_addresses() {
        let full = account();
        let watch = AccountKeyring::new(full.extended_public_key());
        assert!(watch.is_watch_only());
        for index in 0..3 {
            let a = full.address_keyring(index, 0).unwrap();
            let b = watch.address_keyring(index, 0).unwrap();
            assert!(b.is_watch_only());
            assert_eq!(
                a.address(AddressChain::Scintilla).to_string(),
                b.address(AddressChain::Scintilla).to_string()
            );
        }
    }

    #[test]
    fn test_base58_roundtrip() {
        let account = account();
        let parsed = AccountKeyring::from_base58(&account.to_base58()).unwrap();
        assert_eq!(parsed, account);

        let xpub = account.extended_public_key().to_base58(KeyEncoding::Legacy);
        assert!(AccountKeyring::from_base58(&xpub).unwrap().is_watch_only());
    }

    #[test]
    fn test_address_index_range() {
        assert!(account().address_keyring(u32::MAX, 0).is_err());
    }
}
