//! # Personas
//!
//! A persona is a sub-tree of an account addressed by a moniker instead of
//! an index. The base key sits at the moniker path (`m/2'/a'/b'`, see
//! [`crate::moniker`]); below it, a persona type picks a role branch and
//! the usual `change/index` pair picks the address.
//!
//! | Type                          | Segment |
//! |-------------------------------|---------|
//! | `default`, `owner`, `spender` | 0       |
//! | `proposer`                    | 1       |
//! | `voter`                       | 2       |
//! | `stake`                       | 3       |
//! | `operator`                    | 4       |
//! | `public` (personal only)      | 5       |
//!
//! A shared persona hashes a sorted moniker pair instead, so either party
//! reaches the same base key from their own account. Its addresses sit
//! directly under the base key unless a type is requested explicitly.

use std::fmt;
use std::str::FromStr;

use zeroize::Zeroizing;

use super::address::AddressKeyring;
use super::{derive_layer, private_key_of, Keyring, KeyringError};
use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::hd::{ChildIndex, DerivationPath, ExtendedKey, ExtendedPublicKey, KeyEncoding};
use crate::moniker::{Moniker, MonikerPath, SharedMoniker};

// ---------------------------------------------------------------------------
// PersonaType
// ---------------------------------------------------------------------------

/// The role branch under a persona base key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PersonaType {
    #[default]
    Default,
    Owner,
    Spender,
    Proposer,
    Voter,
    Stake,
    Operator,
    Public,
}

impl PersonaType {
    /// The derivation segment for this role.
    pub const fn segment(self) -> u32 {
        match self {
            PersonaType::Default | PersonaType::Owner | PersonaType::Spender => 0,
            PersonaType::Proposer => 1,
            PersonaType::Voter => 2,
            PersonaType::Stake => 3,
            PersonaType::Operator => 4,
            PersonaType::Public => 5,
        }
    }

    /// Whether the role exists on shared personas.
    pub const fn is_shareable(self) -> bool {
        !matches!(self, PersonaType::Public)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PersonaType::Default => "default",
            PersonaType::Owner => "owner",
            PersonaType::Spender => "spender",
            PersonaType::Proposer => "proposer",
            PersonaType::Voter => "voter",
            PersonaType::Stake => "stake",
            PersonaType::Operator => "operator",
            PersonaType::Public => "public",
        }
    }
}

impl FromStr for PersonaType {
    type Err = KeyringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(PersonaType::Default),
            "owner" => Ok(PersonaType::Owner),
            "spender" => Ok(PersonaType::Spender),
            "proposer" => Ok(PersonaType::Proposer),
            "voter" => Ok(PersonaType::Voter),
            "stake" => Ok(PersonaType::Stake),
            "operator" => Ok(PersonaType::Operator),
            "public" => Ok(PersonaType::Public),
            _ => Err(KeyringError::InvalidPersonaType(s.to_string())),
        }
    }
}

impl fmt::Display for PersonaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an address sits below a persona base key.
///
/// `persona_type: None` means the keyring's default: the `default` branch
/// for personal personas, the base key itself for shared ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddressOptions {
    pub change: u32,
    pub persona_type: Option<PersonaType>,
}

impl AddressOptions {
    pub fn with_type(persona_type: PersonaType) -> Self {
        Self {
            change: 0,
            persona_type: Some(persona_type),
        }
    }
}

fn typed_key(base: &ExtendedKey, persona_type: PersonaType) -> Result<ExtendedKey, KeyringError> {
    let path = DerivationPath::from(vec![ChildIndex::normal(persona_type.segment())?]);
    derive_layer(base, &path, "persona type")
}

fn address_below(key: &ExtendedKey, change: u32, index: u32) -> Result<AddressKeyring, KeyringError> {
    let path = DerivationPath::from(vec![ChildIndex::normal(change)?, ChildIndex::normal(index)?]);
    let key = derive_layer(key, &path, "address")?;
    Ok(AddressKeyring::from_extended_key(&key))
}

// ---------------------------------------------------------------------------
// PersonaKeyring
// ---------------------------------------------------------------------------

/// A personal persona, or the older colon-joined shared form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaKeyring {
    key: ExtendedKey,
    moniker: Moniker,
    shared_with: Option<Moniker>,
    path: MonikerPath,
}

impl PersonaKeyring {
    /// Derive the persona base for `moniker` from an account-level key.
    pub fn new(account: &ExtendedKey, moniker: &str) -> Result<Self, KeyringError> {
        let moniker = Moniker::new(moniker)?;
        let path = moniker.path();
        let key = derive_layer(account, path.path(), "persona")?;
        Ok(Self {
            key,
            moniker,
            shared_with: None,
            path,
        })
    }

    /// The colon-joined shared form: `sorted_a:sorted_b` hashed as a single
    /// moniker. Kept for personas created before [`SharedPersonaKeyring`];
    /// the two derive different trees.
    pub fn shared_with(account: &ExtendedKey, moniker: &str, other: &str) -> Result<Self, KeyringError> {
        let own = Moniker::new(moniker)?;
        let other = Moniker::new(other)?;
        let path = SharedMoniker::new(own.clone(), other.clone()).joined_path();
        let key = derive_layer(account, path.path(), "persona")?;
        Ok(Self {
            key,
            moniker: own,
            shared_with: Some(other),
            path,
        })
    }

    pub fn moniker(&self) -> &Moniker {
        &self.moniker
    }

    pub fn shared_with_moniker(&self) -> Option<&Moniker> {
        self.shared_with.as_ref()
    }

    pub fn is_shared(&self) -> bool {
        self.shared_with.is_some()
    }

    /// The moniker path this persona was derived at, relative to the account.
    pub fn path(&self) -> &MonikerPath {
        &self.path
    }

    /// The role branch key. `public` is refused on the shared form.
    pub fn persona_typed_key(&self, persona_type: PersonaType) -> Result<ExtendedKey, KeyringError> {
        if self.is_shared() && !persona_type.is_shareable() {
            return Err(KeyringError::InvalidPersonaType(persona_type.to_string()));
        }
        typed_key(&self.key, persona_type)
    }

    /// `typed/change/index`, with `default` when no type is given.
    pub fn address_keyring(&self, index: u32, options: AddressOptions) -> Result<AddressKeyring, KeyringError> {
        let typed = self.persona_typed_key(options.persona_type.unwrap_or_default())?;
        address_below(&typed, options.change, index)
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

impl Keyring for PersonaKeyring {
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

// ---------------------------------------------------------------------------
// SharedPersonaKeyring
// ---------------------------------------------------------------------------

/// A persona owned jointly by two monikers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedPersonaKeyring {
    key: ExtendedKey,
    monikers: SharedMoniker,
    path: MonikerPath,
}

impl SharedPersonaKeyring {
    /// Derive the shared base from an account-level key. Argument order does
    /// not matter.
    pub fn new(account: &ExtendedKey, moniker: &str, other: &str) -> Result<Self, KeyringError> {
        let monikers = SharedMoniker::new(Moniker::new(moniker)?, Moniker::new(other)?);
        let path = monikers.path();
        let key = derive_layer(account, path.path(), "shared persona")?;
        Ok(Self {
            key,
            monikers,
            path,
        })
    }

    /// A watch-only view from the shared base `xpub` a counterpart exported.
    /// The key is taken as already sitting at the shared path.
    pub fn from_extended_public_key(
        base: ExtendedPublicKey,
        moniker: &str,
        other: &str,
    ) -> Result<Self, KeyringError> {
        let monikers = SharedMoniker::new(Moniker::new(moniker)?, Moniker::new(other)?);
        let path = monikers.path();
        tracing::debug!(path = %path, "watch-only shared persona from xpub");
        Ok(Self {
            key: ExtendedKey::Public(base),
            monikers,
            path,
        })
    }

    pub fn monikers(&self) -> &SharedMoniker {
        &self.monikers
    }

    pub fn path(&self) -> &MonikerPath {
        &self.path
    }

    /// The role branch key. `public` does not exist on shared personas.
    pub fn persona_typed_key(&self, persona_type: PersonaType) -> Result<ExtendedKey, KeyringError> {
        if !persona_type.is_shareable() {
            return Err(KeyringError::InvalidPersonaType(persona_type.to_string()));
        }
        typed_key(&self.key, persona_type)
    }

    /// `change/index` below the base key, or below the typed key when
    /// `options.persona_type` is set.
    pub fn address_keyring(&self, index: u32, options: AddressOptions) -> Result<AddressKeyring, KeyringError> {
        match options.persona_type {
            Some(persona_type) => {
                let typed = self.persona_typed_key(persona_type)?;
                address_below(&typed, options.change, index)
            }
            None => address_below(&self.key, options.change, index),
        }
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

impl Keyring for SharedPersonaKeyring {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::AddressChain;
    use crate::hd::{DerivationError, ExtendedPrivateKey};

    fn account_key() -> ExtendedKey {
        ExtendedPrivateKey::from_seed(&[2u8; 32])
            .unwrap()
            .derive("m/44'/8888'/0'")
            .unwrap()
            .into()
    }

    #[test]
    fn test_persona_type_table() {
        for (name, segment) in [
            ("default", 0),
            ("owner", 0),
            ("SPENDER", 0),
            ("proposer", 1),
            ("voter", 2),
            ("stake", 3),
            ("Operator", 4),
            ("public", 5),
        ] {
            assert_eq!(name.parse::<PersonaType>().unwrap().segment(), segment, "{name}");
        }
        assert_eq!(
            "admin".parse::<PersonaType>(),
            Err(KeyringError::InvalidPersonaType("admin".into()))
        );
    }

    #[test]
    fn test_persona_base_at_moniker_path() {
        let account = account_key();
        let persona = PersonaKeyring::new(&account, "sct.alice").unwrap();
        let expected = account.derive("m/2'/1387663315'/1787011306'").unwrap();
        assert_eq!(persona.extended_key(), &expected);
        assert_eq!(persona.moniker().as_str(), "sct.alice");
        assert!(!persona.is_shared());
    }

    #[test]
    fn test_persona_address_goes_through_type_branch() {
        let account = account_key();
        let persona = PersonaKeyring::new(&account, "sct.alice").unwrap();
        let voter = persona
            .address_keyring(2, AddressOptions { change: 1, persona_type: Some(PersonaType::Voter) })
            .unwrap();
        let expected = persona.extended_key().derive("m/2/1/2").unwrap();
        assert_eq!(voter.public_key(), expected.public_key());

        let default = persona.address_keyring(0, AddressOptions::default()).unwrap();
        let owner = persona
            .address_keyring(0, AddressOptions::with_type(PersonaType::Owner))
            .unwrap();
        assert_eq!(default.public_key(), owner.public_key());
    }

    #[test]
    fn shared_persona_is_order_independent() {
        let account = account_key();
        let ab = SharedPersonaKeyring::new(&account, "sct.alice", "sct.bob").unwrap();
        let ba = SharedPersonaKeyring::new(&account, "sct.bob", "sct.alice").unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.path().to_string(), "m/2'/7971736'/11852131'");
    }

    #[test]
    fn test_shared_address_without_type_skips_branch() {
        let account = account_key();
        let shared = SharedPersonaKeyring::new(&account, "sct.alice", "sct.bob").unwrap();
        let direct = shared.address_keyring(0, AddressOptions::default()).unwrap();
        assert_eq!(
            direct.public_key(),
            shared.extended_key().derive("m/0/0").unwrap().public_key()
        );
        let typed = shared
            .address_keyring(0, AddressOptions::with_type(PersonaType::Default))
            .unwrap();
        assert_eq!(
            typed.public_key(),
            shared.extended_key().derive("m/0/0/0").unwrap().public_key()
        );
    }

    #[test]
    fn test_shared_persona_refuses_public_type() {
        let shared = SharedPersonaKeyring::new(&account_key(), "sct.alice", "sct.bob").unwrap();
        assert_eq!(
            shared.persona_typed_key(PersonaType::Public),
            Err(KeyringError::InvalidPersonaType("public".into()))
        );
        let legacy = PersonaKeyring::shared_with(&account_key(), "sct.alice", "sct.bob").unwrap();
        assert!(legacy.persona_typed_key(PersonaType::Public).is_err());
        let personal = PersonaKeyring::new(&account_key(), "sct.alice").unwrap();
        assert!(personal.persona_typed_key(PersonaType::Public).is_ok());
    }

    #[test]
    fn test_legacy_shared_mode() {
        let account = account_key();
        let legacy = PersonaKeyring::shared_with(&account, "sct.bob", "sct.alice").unwrap();
        let joined = PersonaKeyring::new(&account, "sct.alice:sct.bob").unwrap();
        assert_eq!(legacy.extended_key(), joined.extended_key());
        assert_eq!(legacy.moniker().as_str(), "sct.bob");
        assert_eq!(legacy.shared_with_moniker().map(Moniker::as_str), Some("sct.alice"));

        let shared = SharedPersonaKeyring::new(&account, "sct.alice", "sct.bob").unwrap();
        assert_ne!(legacy.extended_key(), shared.extended_key());
    }

    #[test]
    fn test_counterpart_xpub_gives_watch_only_view() {
        let account = account_key();
        let shared = SharedPersonaKeyring::new(&account, "sct.alice", "sct.bob").unwrap();
        let view = SharedPersonaKeyring::from_extended_public_key(
            shared.extended_public_key(),
            "sct.bob",
            "sct.alice",
        )
        .unwrap();
        assert!(view.is_watch_only());
        for index in 0..2 {
            let theirs = view.address_keyring(index, AddressOptions::default()).unwrap();
            let ours = shared.address_keyring(index, AddressOptions::default()).unwrap();
            assert_eq!(
                theirs.address(AddressChain::Scintilla).to_string(),
                ours.address(AddressChain::Scintilla).to_string()
            );
        }
    }

    #[test]
    fn watch_only_account_cannot_reach_persona() {
        let account = ExtendedKey::Public(account_key().to_extended_public_key());
        assert!(matches!(
            PersonaKeyring::new(&account, "sct.alice"),
            Err(KeyringError::Derivation(DerivationError::HardenedDerivationForbidden(2)))
        ));
    }

    #[test]
    fn test_secure_persona() {
        let persona = PersonaKeyring::new(&account_key(), "sct.alice").unwrap();
        let public = persona.public_key();
        let secured = persona.secure();
        assert!(secured.is_watch_only());
        assert_eq!(secured.public_key(), public);
        let address = secured.address_keyring(0, AddressOptions::default()).unwrap();
        assert!(address.is_watch_only());
    }
}
