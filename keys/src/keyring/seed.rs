//! The root keyring, built from a seed, a mnemonic, or an existing master
//! extended key.

use bip39::{Language, Mnemonic};
use zeroize::Zeroizing;

use super::chain::ChainKeyring;
use super::{derive_layer, private_key_of, Keyring, KeyringError};
use crate::config::{
    DEFAULT_CHAIN, DEFAULT_PURPOSE, MAX_SEED_LENGTH, MIN_SEED_LENGTH, NAMED_CHAINS,
    SCINTILLA_COIN_TYPE,
};
use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::hd::{
    ChildIndex, DerivationPath, ExtendedKey, ExtendedPrivateKey, ExtendedPublicKey, KeyEncoding,
};

/// BIP39 English mnemonic to 64-byte seed (PBKDF2-HMAC-SHA512, 2048 rounds,
/// salt `"mnemonic" + passphrase`).
pub fn seed_from_mnemonic(phrase: &str, passphrase: &str) -> Result<Zeroizing<[u8; 64]>, KeyringError> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
        .map_err(|err| KeyringError::Mnemonic(err.to_string()))?;
    Ok(Zeroizing::new(mnemonic.to_seed_normalized(passphrase)))
}

// ---------------------------------------------------------------------------
// ChainOptions
// ---------------------------------------------------------------------------

/// Selects the `m/purpose'/coin_type'` branch for a chain keyring.
///
/// With neither `purpose` nor `coin_type` set, the named chain (default
/// `scintilla`) supplies both numbers. Once either is set the name is
/// ignored and a missing field falls back to `44` / `8888`.
///
/// ```
/// use scintilla_keys::keyring::ChainOptions;
///
/// let segwit = ChainOptions::named("segwit");
/// assert_eq!(segwit.resolve().unwrap(), (49, 0));
///
/// let bip84 = ChainOptions::named("bitcoin").with_purpose(84).with_coin_type(0);
/// assert_eq!(bip84.resolve().unwrap(), (84, 0));
///
/// // A lone override does not pull the other number from the name.
/// let partial = ChainOptions::named("bitcoin").with_purpose(84);
/// assert_eq!(partial.resolve().unwrap(), (84, 8888));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChainOptions {
    pub chain: Option<String>,
    pub purpose: Option<u32>,
    pub coin_type: Option<u32>,
    /// Version family for the chain keyring's own `to_base58`.
    pub encoding: KeyEncoding,
}

impl ChainOptions {
    pub fn named(chain: impl Into<String>) -> Self {
        Self {
            chain: Some(chain.into()),
            ..Self::default()
        }
    }

    pub fn with_purpose(mut self, purpose: u32) -> Self {
        self.purpose = Some(purpose);
        self
    }

    pub fn with_coin_type(mut self, coin_type: u32) -> Self {
        self.coin_type = Some(coin_type);
        self
    }

    pub fn with_encoding(mut self, encoding: KeyEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// `(purpose, coin_type)` for this branch. The chain name is only looked
    /// up when no explicit number is given.
    pub fn resolve(&self) -> Result<(u32, u32), KeyringError> {
        if self.purpose.is_some() || self.coin_type.is_some() {
            return Ok((
                self.purpose.unwrap_or(DEFAULT_PURPOSE),
                self.coin_type.unwrap_or(SCINTILLA_COIN_TYPE),
            ));
        }
        let name = self.chain.as_deref().unwrap_or(DEFAULT_CHAIN);
        NAMED_CHAINS
            .iter()
            .find(|(known, _, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, purpose, coin_type)| (*purpose, *coin_type))
            .ok_or_else(|| KeyringError::UnsupportedChain(name.to_string()))
    }
}

// ---------------------------------------------------------------------------
// SeedKeyring
// ---------------------------------------------------------------------------

/// The master node `m`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedKeyring {
    key: ExtendedKey,
}

impl SeedKeyring {
    /// From raw seed bytes (16 to 64 bytes).
    pub fn from_seed(seed: &[u8]) -> Result<Self, KeyringError> {
        if !(MIN_SEED_LENGTH..=MAX_SEED_LENGTH).contains(&seed.len()) {
            return Err(KeyringError::InvalidSeedLength(seed.len()));
        }
        let key = ExtendedPrivateKey::from_seed(seed)?;
        tracing::debug!(seed_len = seed.len(), "seed keyring created");
        Ok(Self { key: key.into() })
    }

    /// From a BIP39 English phrase and optional passphrase.
    pub fn from_mnemonic(phrase: &str, passphrase: &str) -> Result<Self, KeyringError> {
        let seed = seed_from_mnemonic(phrase, passphrase)?;
        Self::from_seed(&*seed)
    }

    /// Wrap an existing extended key. A public key gives a watch-only root.
    pub fn from_extended_key(key: impl Into<ExtendedKey>) -> Self {
        Self { key: key.into() }
    }

    /// Parse an `xprv`/`xpub`/`zprv`/`zpub` string.
    pub fn from_base58(encoded: &str) -> Result<Self, KeyringError> {
        Ok(Self::from_extended_key(ExtendedKey::from_base58(encoded)?))
    }

    /// The chain branch `m/purpose'/coin_type'`.
    pub fn chain_keyring(&self, options: &ChainOptions) -> Result<ChainKeyring, KeyringError> {
        let (purpose, coin_type) = options.resolve()?;
        let path = DerivationPath::from(vec![
            ChildIndex::hardened(purpose)?,
            ChildIndex::hardened(coin_type)?,
        ]);
        let key = derive_layer(&self.key, &path, "chain")?;
        Ok(ChainKeyring::new(key, purpose, coin_type).with_encoding(options.encoding))
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

impl Keyring for SeedKeyring {
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

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const ABANDON_SEED: &str = "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4";
    const ABANDON_ROOT: &str = "xprv9s21ZrQH143K3GJpoapnV8SFfukcVBSfeCficPSGfubmSFDxo1kuHnLisriDvSnRRuL2Qrg5ggqHKNVpxR86QEC8w35uxmGoggxtQTPvfUu";

    #[test]
    fn test_mnemonic_to_seed() {
        let seed = seed_from_mnemonic(ABANDON, "").unwrap();
        assert_eq!(hex::encode(&*seed), ABANDON_SEED);
    }

    #[test]
    fn test_root_from_mnemonic() {
        let keyring = SeedKeyring::from_mnemonic(ABANDON, "").unwrap();
        assert_eq!(keyring.to_base58().as_str(), ABANDON_ROOT);
        assert!(!keyring.is_watch_only());
    }

    #[test]
    fn test_invalid_mnemonic() {
        assert!(matches!(
            SeedKeyring::from_mnemonic("abandon abandon abandon", ""),
            Err(KeyringError::Mnemonic(_))
        ));
        // Valid words, wrong checksum.
        let bad_checksum = ABANDON.replace("about", "abandon");
        assert!(matches!(
            SeedKeyring::from_mnemonic(&bad_checksum, ""),
            Err(KeyringError::Mnemonic(_))
        ));
    }

    #[test]
    fn test_seed_length_bounds() {
        assert_eq!(
            SeedKeyring::from_seed(&[1u8; 15]),
            Err(KeyringError::InvalidSeedLength(15))
        );
        assert_eq!(
            SeedKeyring::from_seed(&[1u8; 65]),
            Err(KeyringError::InvalidSeedLength(65))
        );
        assert!(SeedKeyring::from_seed(&[1u8; 16]).is_ok());
        assert!(SeedKeyring::from_seed(&[1u8; 64]).is_ok());
    }

    #[test]
    fn test_named_chains_resolve() {
        for (name, expected) in [
            ("bitcoin", (44, 0)),
            ("testnet-bitcoin", (44, 1)),
            ("segwit", (49, 0)),
            ("testnet-segwit", (49, 1)),
            ("ethereum", (44, 60)),
            ("cosmos", (44, 118)),
            ("scintilla", (44, 8888)),
        ] {
            assert_eq!(ChainOptions::named(name).resolve().unwrap(), expected, "{name}");
        }
        assert_eq!(ChainOptions::default().resolve().unwrap(), (44, 8888));
    }

    #[test]
    fn explicit_values_replace_the_named_lookup() {
        // Both given: the name is never consulted.
        assert_eq!(
            ChainOptions::named("bitcoin")
                .with_purpose(84)
                .with_coin_type(0)
                .resolve()
                .unwrap(),
            (84, 0)
        );
        assert_eq!(
            ChainOptions::named("unknown")
                .with_purpose(1)
                .with_coin_type(2)
                .resolve()
                .unwrap(),
            (1, 2)
        );
    }

    #[test]
    fn lone_override_falls_back_to_defaults() {
        assert_eq!(
            ChainOptions::named("bitcoin").with_purpose(84).resolve().unwrap(),
            (84, 8888)
        );
        assert_eq!(
            ChainOptions::named("ethereum").with_coin_type(61).resolve().unwrap(),
            (44, 61)
        );
        assert_eq!(
            ChainOptions::named("segwit").with_coin_type(1).resolve().unwrap(),
            (44, 1)
        );
        assert_eq!(
            ChainOptions::default().with_purpose(84).resolve().unwrap(),
            (84, 8888)
        );
    }

    #[test]
    fn unknown_chain_with_override_is_accepted() {
        assert_eq!(
            ChainOptions::named("dogecoin").with_purpose(44).resolve().unwrap(),
            (44, 8888)
        );
        assert_eq!(
            ChainOptions::named("dogecoin").with_coin_type(3).resolve().unwrap(),
            (44, 3)
        );
        assert_eq!(
            ChainOptions::named("dogecoin").resolve(),
            Err(KeyringError::UnsupportedChain("dogecoin".into()))
        );
    }

    #[test]
    fn test_chain_names_ignore_case() {
        assert_eq!(ChainOptions::named("Bitcoin").resolve().unwrap(), (44, 0));
        assert_eq!(ChainOptions::named("TESTNET-SEGWIT").resolve().unwrap(), (49, 1));
    }

    #[test]
    fn partial_override_derives_default_coin_branch() {
        let keyring = SeedKeyring::from_mnemonic(ABANDON, "").unwrap();
        let chain = keyring
            .chain_keyring(&ChainOptions::named("bitcoin").with_purpose(84))
            .unwrap();
        let expected = ExtendedKey::from_base58(ABANDON_ROOT)
            .unwrap()
            .derive("m/84'/8888'")
            .unwrap();
        assert_eq!(chain.extended_key(), &expected);
        assert_eq!((chain.purpose(), chain.coin_type()), (84, 8888));
    }

    #[test]
    fn test_unknown_chain_rejected() {
        let keyring = SeedKeyring::from_seed(&[3u8; 32]).unwrap();
        assert_eq!(
            keyring.chain_keyring(&ChainOptions::named("dogecoin")),
            Err(KeyringError::UnsupportedChain("dogecoin".into()))
        );
    }

    #[test]
    fn test_chain_keyring_path() {
        let keyring = SeedKeyring::from_mnemonic(ABANDON, "").unwrap();
        let chain = keyring.chain_keyring(&ChainOptions::named("bitcoin")).unwrap();
        let expected = ExtendedKey::from_base58(ABANDON_ROOT)
            .unwrap()
            .derive("m/44'/0'")
            .unwrap();
        assert_eq!(chain.extended_key(), &expected);
        assert_eq!((chain.purpose(), chain.coin_type()), (44, 0));
    }

    #[test]
    fn watch_only_root_cannot_reach_hardened_chain() {
        let keyring = SeedKeyring::from_mnemonic(ABANDON, "").unwrap().secure();
        assert!(keyring.is_watch_only());
        assert!(matches!(
            keyring.chain_keyring(&ChainOptions::default()),
            Err(KeyringError::Derivation(
                crate::hd::DerivationError::HardenedDerivationForbidden(44)
            ))
        ));
    }
}
