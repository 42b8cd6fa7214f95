//! # Extended Keys
//!
//! A BIP32 extended key is a key plus the metadata needed to derive its
//! children and to place it in the tree: depth, parent fingerprint, child
//! index, and chain code. That shared part is [`ExtendedKeyBase`].
//!
//! ## Serialization
//!
//! ```text
//! version(4 BE) || depth(1) || parent_fp(4 BE) || index(4 BE) || chain(32) || key(33)
//! ```
//!
//! Private keys are written as `0x00 || scalar`, public keys as the
//! compressed point. The whole 78 bytes are Base58Check-encoded. Which
//! version pair is used (`xprv`/`xpub` or `zprv`/`zpub`) is picked by the
//! caller through [`KeyEncoding`] at serialization time; the key itself does
//! not remember it.
//!
//! ## Invalid children
//!
//! If `IL` is not a valid scalar, or the resulting key is zero or the point
//! at infinity, BIP32 says to move on to the next index. That is done here
//! in a bounded loop. Callers never see it except as a child whose
//! `child_index` is one higher than requested.

use std::str::FromStr;

use k256::{NonZeroScalar, ProjectivePoint};
use zeroize::Zeroizing;

use super::path::{ChildIndex, DerivationPath};
use super::DerivationError;
use crate::codec::base58;
use crate::config::{
    EXTENDED_KEY_SIZE, LEGACY_PRIVATE_VERSION, LEGACY_PUBLIC_VERSION, MASTER_SECRET,
    MAX_DERIVATION_RETRIES, NATIVE_PRIVATE_VERSION, NATIVE_PUBLIC_VERSION,
};
use crate::crypto::hash::hmac_sha512;
use crate::crypto::keys::{ChainCode, PrivateKey, PublicKey};

// ---------------------------------------------------------------------------
// KeyEncoding
// ---------------------------------------------------------------------------

/// Version-byte family used when serializing an extended key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEncoding {
    /// `xprv` / `xpub`.
    #[default]
    Legacy,
    /// `zprv` / `zpub` (BIP84, native SegWit).
    Native,
}

impl KeyEncoding {
    pub const fn private_version(self) -> u32 {
        match self {
            KeyEncoding::Legacy => LEGACY_PRIVATE_VERSION,
            KeyEncoding::Native => NATIVE_PRIVATE_VERSION,
        }
    }

    pub const fn public_version(self) -> u32 {
        match self {
            KeyEncoding::Legacy => LEGACY_PUBLIC_VERSION,
            KeyEncoding::Native => NATIVE_PUBLIC_VERSION,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            KeyEncoding::Legacy => "legacy",
            KeyEncoding::Native => "native",
        }
    }

    /// Which family a version belongs to, and whether it is the private one.
    fn classify(version: u32) -> Option<(KeyEncoding, bool)> {
        match version {
            LEGACY_PRIVATE_VERSION => Some((KeyEncoding::Legacy, true)),
            LEGACY_PUBLIC_VERSION => Some((KeyEncoding::Legacy, false)),
            NATIVE_PRIVATE_VERSION => Some((KeyEncoding::Native, true)),
            NATIVE_PUBLIC_VERSION => Some((KeyEncoding::Native, false)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ExtendedKeyBase
// ---------------------------------------------------------------------------

/// Tree position and chain code shared by private and public extended keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedKeyBase {
    depth: u8,
    parent_fingerprint: u32,
    child_index: ChildIndex,
    chain_code: ChainCode,
}

impl ExtendedKeyBase {
    /// Build and validate. A depth-0 key must have no parent and index 0.
    pub fn new(
        depth: u8,
        parent_fingerprint: u32,
        child_index: ChildIndex,
        chain_code: ChainCode,
    ) -> Result<Self, DerivationError> {
        if depth == 0 && (parent_fingerprint != 0 || child_index.raw() != 0) {
            return Err(DerivationError::InvalidRootState);
        }
        Ok(Self {
            depth,
            parent_fingerprint,
            child_index,
            chain_code,
        })
    }

    fn master(chain_code: ChainCode) -> Self {
        Self {
            depth: 0,
            parent_fingerprint: 0,
            child_index: ChildIndex::from_raw(0),
            chain_code,
        }
    }

    fn child(
        &self,
        parent_fingerprint: u32,
        child_index: ChildIndex,
        chain_code: ChainCode,
    ) -> Result<Self, DerivationError> {
        let depth = self.depth.checked_add(1).ok_or(DerivationError::DepthOverflow)?;
        Ok(Self {
            depth,
            parent_fingerprint,
            child_index,
            chain_code,
        })
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent_fingerprint(&self) -> u32 {
        self.parent_fingerprint
    }

    pub fn child_index(&self) -> ChildIndex {
        self.child_index
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    fn serialize(&self, version: u32, key: &[u8; 33]) -> Zeroizing<[u8; EXTENDED_KEY_SIZE]> {
        let mut out = Zeroizing::new([0u8; EXTENDED_KEY_SIZE]);
        out[0..4].copy_from_slice(&version.to_be_bytes());
        out[4] = self.depth;
        out[5..9].copy_from_slice(&self.parent_fingerprint.to_be_bytes());
        out[9..13].copy_from_slice(&self.child_index.raw().to_be_bytes());
        out[13..45].copy_from_slice(self.chain_code.as_bytes());
        out[45..78].copy_from_slice(key);
        out
    }

    /// Split a 78-byte buffer into version, base, and raw key bytes.
    fn parse(bytes: &[u8]) -> Result<(u32, Self, &[u8]), DerivationError> {
        if bytes.len() != EXTENDED_KEY_SIZE {
            return Err(DerivationError::InvalidLength(bytes.len()));
        }
        let be32 = |at: usize| u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
        let version = be32(0);
        let base = Self::new(
            bytes[4],
            be32(5),
            ChildIndex::from_raw(be32(9)),
            ChainCode::from_bytes(&bytes[13..45])?,
        )?;
        Ok((version, base, &bytes[45..78]))
    }
}

/// One HMAC-SHA512 round of child derivation: `(IL, IR)`.
fn child_hmac(chain_code: &ChainCode, parts: &[&[u8]]) -> Result<Zeroizing<[u8; 64]>, DerivationError> {
    hmac_sha512(chain_code.as_bytes(), parts)
        .map(Zeroizing::new)
        .map_err(|_| DerivationError::HmacKey)
}

/// `parent + IL mod n`, or `None` when either is out of range.
fn tweak_private(parent: &PrivateKey, il: &[u8]) -> Option<PrivateKey> {
    let tweak = NonZeroScalar::try_from(il).ok()?;
    let sum = Option::<NonZeroScalar>::from(NonZeroScalar::new(*parent.to_scalar() + *tweak))?;
    Some(PrivateKey::from_scalar(sum))
}

/// `IL·G + parent`, or `None` for an invalid tweak or the point at infinity.
fn tweak_public(parent: &PublicKey, il: &[u8]) -> Option<PublicKey> {
    let tweak = NonZeroScalar::try_from(il).ok()?;
    let point = ProjectivePoint::GENERATOR * *tweak + ProjectivePoint::from(*parent.as_point().as_affine());
    k256::PublicKey::from_affine(point.to_affine())
        .ok()
        .map(PublicKey::from_point)
}

fn next_index(raw: u32) -> Result<u32, DerivationError> {
    raw.checked_add(1)
        .ok_or(DerivationError::IndexOutOfRange(u64::from(raw) + 1))
}

// ---------------------------------------------------------------------------
// ExtendedPrivateKey
// ---------------------------------------------------------------------------

/// A private extended key (`xprv`). Can derive hardened and normal children.
///
/// # Examples
///
/// ```
/// use scintilla_keys::hd::{ExtendedPrivateKey, KeyEncoding};
///
/// let seed = [0x42u8; 64];
/// let master = ExtendedPrivateKey::from_seed(&seed).unwrap();
/// let account = master.derive("m/44'/8888'/0'").unwrap();
/// assert_eq!(account.depth(), 3);
/// assert!(account.to_base58(KeyEncoding::Legacy).starts_with("xprv"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedPrivateKey {
    base: ExtendedKeyBase,
    private_key: PrivateKey,
}

impl ExtendedPrivateKey {
    /// Master key from a seed: `HMAC-SHA512("Bitcoin seed", seed)`.
    pub fn from_seed(seed: &[u8]) -> Result<Self, DerivationError> {
        let i = Zeroizing::new(
            hmac_sha512(MASTER_SECRET, &[seed]).map_err(|_| DerivationError::HmacKey)?,
        );
        let (il, ir) = i.split_at(32);
        let private_key = PrivateKey::from_bytes(il).map_err(|_| DerivationError::InvalidMasterKey)?;
        let chain_code = ChainCode::from_bytes(ir).map_err(|_| DerivationError::InvalidMasterKey)?;
        Ok(Self {
            base: ExtendedKeyBase::master(chain_code),
            private_key,
        })
    }

    pub fn new(base: ExtendedKeyBase, private_key: PrivateKey) -> Self {
        Self { base, private_key }
    }

    pub fn base(&self) -> &ExtendedKeyBase {
        &self.base
    }

    pub fn depth(&self) -> u8 {
        self.base.depth
    }

    pub fn parent_fingerprint(&self) -> u32 {
        self.base.parent_fingerprint
    }

    pub fn child_index(&self) -> ChildIndex {
        self.base.child_index
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.base.chain_code
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> PublicKey {
        self.private_key.public_key()
    }

    /// This key's own fingerprint, which its children record as their parent.
    pub fn fingerprint(&self) -> u32 {
        self.public_key().fingerprint()
    }

    /// Derive one child. Hardened when `index.is_hardened()`.
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self, DerivationError> {
        let parent_public = self.public_key();
        let mut raw = index.raw();

        for _ in 0..MAX_DERIVATION_RETRIES {
            let child_index = ChildIndex::from_raw(raw);
            let index_be = raw.to_be_bytes();
            let i = if child_index.is_hardened() {
                let secret = self.private_key.to_bytes();
                child_hmac(self.chain_code(), &[&[0u8][..], &secret[..], &index_be[..]])?
            } else {
                child_hmac(self.chain_code(), &[&parent_public.as_bytes()[..], &index_be[..]])?
            };
            let (il, ir) = i.split_at(32);

            if let (Some(private_key), Ok(chain_code)) =
                (tweak_private(&self.private_key, il), ChainCode::from_bytes(ir))
            {
                let base = self
                    .base
                    .child(parent_public.fingerprint(), child_index, chain_code)?;
                tracing::trace!(
                    index = child_index.index(),
                    hardened = child_index.is_hardened(),
                    depth = base.depth,
                    "derived private child"
                );
                return Ok(Self { base, private_key });
            }

            tracing::warn!(index = raw, "invalid child key, retrying with the next index");
            raw = next_index(raw)?;
        }

        Err(DerivationError::RetryLimitExceeded(MAX_DERIVATION_RETRIES))
    }

    /// Walk a parsed path. The empty path returns a copy of `self`.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, DerivationError> {
        path.iter()
            .try_fold(self.clone(), |key, index| key.derive_child(*index))
    }

    /// Parse and walk a path string such as `m/44'/0'/0'`.
    pub fn derive(&self, path: &str) -> Result<Self, DerivationError> {
        self.derive_path(&DerivationPath::from_str(path)?)
    }

    /// Public projection: same position and chain code, public key only.
    pub fn to_extended_public_key(&self) -> ExtendedPublicKey {
        ExtendedPublicKey {
            base: self.base.clone(),
            public_key: self.public_key(),
        }
    }

    /// The 78-byte serialization.
    pub fn serialize(&self, encoding: KeyEncoding) -> Zeroizing<[u8; EXTENDED_KEY_SIZE]> {
        let mut key = Zeroizing::new([0u8; 33]);
        key[1..].copy_from_slice(&*self.private_key.to_bytes());
        self.base.serialize(encoding.private_version(), &key)
    }

    /// Base58Check form (`xprv...` or `zprv...`).
    pub fn to_base58(&self, encoding: KeyEncoding) -> Zeroizing<String> {
        Zeroizing::new(base58::encode_check(&*self.serialize(encoding)))
    }

    /// Parse a 78-byte serialization carrying a private version.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, KeyEncoding), DerivationError> {
        let (version, base, key) = ExtendedKeyBase::parse(bytes)?;
        match KeyEncoding::classify(version) {
            Some((encoding, true)) if key[0] == 0x00 => {
                let private_key = PrivateKey::from_bytes(&key[1..])?;
                Ok((Self { base, private_key }, encoding))
            }
            _ => Err(DerivationError::InvalidVersion(version)),
        }
    }

    /// Parse an `xprv`/`zprv` string.
    pub fn from_base58(encoded: &str) -> Result<Self, DerivationError> {
        let bytes = Zeroizing::new(base58::decode_check(encoded)?);
        Self::from_bytes(&bytes).map(|(key, _)| key)
    }
}

// ---------------------------------------------------------------------------
// ExtendedPublicKey
// ---------------------------------------------------------------------------

/// A public extended key (`xpub`). Normal children only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedPublicKey {
    base: ExtendedKeyBase,
    public_key: PublicKey,
}

impl ExtendedPublicKey {
    pub fn new(base: ExtendedKeyBase, public_key: PublicKey) -> Self {
        Self { base, public_key }
    }

    pub fn base(&self) -> &ExtendedKeyBase {
        &self.base
    }

    pub fn depth(&self) -> u8 {
        self.base.depth
    }

    pub fn parent_fingerprint(&self) -> u32 {
        self.base.parent_fingerprint
    }

    pub fn child_index(&self) -> ChildIndex {
        self.base.child_index
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.base.chain_code
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    pub fn fingerprint(&self) -> u32 {
        self.public_key.fingerprint()
    }

    /// Derive one non-hardened child. Hardened indices fail with
    /// [`DerivationError::HardenedDerivationForbidden`].
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self, DerivationError> {
        let mut raw = index.raw();

        for _ in 0..MAX_DERIVATION_RETRIES {
            let child_index = ChildIndex::from_raw(raw);
            if child_index.is_hardened() {
                return Err(DerivationError::HardenedDerivationForbidden(child_index.index()));
            }
            let i = child_hmac(
                self.chain_code(),
                &[&self.public_key.as_bytes()[..], &raw.to_be_bytes()[..]],
            )?;
            let (il, ir) = i.split_at(32);

            if let (Some(public_key), Ok(chain_code)) =
                (tweak_public(&self.public_key, il), ChainCode::from_bytes(ir))
            {
                let base = self
                    .base
                    .child(self.fingerprint(), child_index, chain_code)?;
                tracing::trace!(index = raw, depth = base.depth, "derived public child");
                return Ok(Self { base, public_key });
            }

            tracing::warn!(index = raw, "invalid child key, retrying with the next index");
            raw = next_index(raw)?;
        }

        Err(DerivationError::RetryLimitExceeded(MAX_DERIVATION_RETRIES))
    }

    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, DerivationError> {
        path.iter()
            .try_fold(self.clone(), |key, index| key.derive_child(*index))
    }

    pub fn derive(&self, path: &str) -> Result<Self, DerivationError> {
        self.derive_path(&DerivationPath::from_str(path)?)
    }

    pub fn serialize(&self, encoding: KeyEncoding) -> [u8; EXTENDED_KEY_SIZE] {
        *self
            .base
            .serialize(encoding.public_version(), self.public_key.as_bytes())
    }

    /// Base58Check form (`xpub...` or `zpub...`).
    pub fn to_base58(&self, encoding: KeyEncoding) -> String {
        base58::encode_check(&self.serialize(encoding))
    }

    /// Parse a 78-byte serialization carrying a public version.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, KeyEncoding), DerivationError> {
        let (version, base, key) = ExtendedKeyBase::parse(bytes)?;
        match KeyEncoding::classify(version) {
            Some((encoding, false)) => {
                let public_key = PublicKey::from_bytes(key)?;
                Ok((Self { base, public_key }, encoding))
            }
            _ => Err(DerivationError::InvalidVersion(version)),
        }
    }

    /// Parse an `xpub`/`zpub` string.
    pub fn from_base58(encoded: &str) -> Result<Self, DerivationError> {
        let bytes = base58::decode_check(encoded)?;
        Self::from_bytes(&bytes).map(|(key, _)| key)
    }
}

// ---------------------------------------------------------------------------
// ExtendedKey
// ---------------------------------------------------------------------------

/// Either kind of extended key. Keyrings hold one of these; a `Public`
/// variant is what makes a keyring watch-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtendedKey {
    Private(ExtendedPrivateKey),
    Public(ExtendedPublicKey),
}

impl ExtendedKey {
    /// Parse any of `xprv`/`xpub`/`zprv`/`zpub`, reporting the family found.
    pub fn decode(encoded: &str) -> Result<(Self, KeyEncoding), DerivationError> {
        let bytes = Zeroizing::new(base58::decode_check(encoded)?);
        if bytes.len() != EXTENDED_KEY_SIZE {
            return Err(DerivationError::InvalidLength(bytes.len()));
        }
        let version = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        match KeyEncoding::classify(version) {
            Some((_, true)) => ExtendedPrivateKey::from_bytes(&bytes)
                .map(|(key, encoding)| (ExtendedKey::Private(key), encoding)),
            Some((_, false)) => ExtendedPublicKey::from_bytes(&bytes)
                .map(|(key, encoding)| (ExtendedKey::Public(key), encoding)),
            None => Err(DerivationError::InvalidVersion(version)),
        }
    }

    pub fn from_base58(encoded: &str) -> Result<Self, DerivationError> {
        Self::decode(encoded).map(|(key, _)| key)
    }

    pub fn base(&self) -> &ExtendedKeyBase {
        match self {
            ExtendedKey::Private(key) => key.base(),
            ExtendedKey::Public(key) => key.base(),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            ExtendedKey::Private(key) => key.public_key(),
            ExtendedKey::Public(key) => key.public_key(),
        }
    }

    pub fn private_key(&self) -> Option<&PrivateKey> {
        match self {
            ExtendedKey::Private(key) => Some(key.private_key()),
            ExtendedKey::Public(_) => None,
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self, ExtendedKey::Private(_))
    }

    pub fn fingerprint(&self) -> u32 {
        self.public_key().fingerprint()
    }

    pub fn to_extended_public_key(&self) -> ExtendedPublicKey {
        match self {
            ExtendedKey::Private(key) => key.to_extended_public_key(),
            ExtendedKey::Public(key) => key.clone(),
        }
    }

    /// Drop the private half. Public keys come back unchanged.
    pub fn neuter(self) -> Self {
        match self {
            ExtendedKey::Private(key) => ExtendedKey::Public(key.to_extended_public_key()),
            public => public,
        }
    }

    pub fn derive_child(&self, index: ChildIndex) -> Result<Self, DerivationError> {
        match self {
            ExtendedKey::Private(key) => key.derive_child(index).map(ExtendedKey::Private),
            ExtendedKey::Public(key) => key.derive_child(index).map(ExtendedKey::Public),
        }
    }

    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, DerivationError> {
        match self {
            ExtendedKey::Private(key) => key.derive_path(path).map(ExtendedKey::Private),
            ExtendedKey::Public(key) => key.derive_path(path).map(ExtendedKey::Public),
        }
    }

    pub fn derive(&self, path: &str) -> Result<Self, DerivationError> {
        self.derive_path(&DerivationPath::from_str(path)?)
    }

    /// Base58Check form in the requested family. Private keys serialize as
    /// `xprv`/`zprv`, so handle the result accordingly.
    pub fn to_base58(&self, encoding: KeyEncoding) -> Zeroizing<String> {
        match self {
            ExtendedKey::Private(key) => key.to_base58(encoding),
            ExtendedKey::Public(key) => Zeroizing::new(key.to_base58(encoding)),
        }
    }
}

impl From<ExtendedPrivateKey> for ExtendedKey {
    fn from(key: ExtendedPrivateKey) -> Self {
        ExtendedKey::Private(key)
    }
}

impl From<ExtendedPublicKey> for ExtendedKey {
    fn from(key: ExtendedPublicKey) -> Self {
        ExtendedKey::Public(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HARDENED_OFFSET;

    // BIP32 test vector 1.
    const TV1_SEED: &str = "000102030405060708090a0b0c0d0e0f";
    const TV1_M_XPRV: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
    const TV1_M_XPUB: &str = "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8";
    const TV1_M0H_XPRV: &str = "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7";
    const TV1_M0H_XPUB: &str = "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw";
    const TV1_M0H1_XPRV: &str = "xprv9wTYmMFdV23N2TdNG573QoEsfRrWKQgWeibmLntzniatZvR9BmLnvSxqu53Kw1UmYPxLgboyZQaXwTCg8MSY3H2EU4pWcQDnRnrVA1xe8fs";
    const TV1_M0H1_XPUB: &str = "xpub6ASuArnXKPbfEwhqN6e3mwBcDTgzisQN1wXN9BJcM47sSikHjJf3UFHKkNAWbWMiGj7Wf5uMash7SyYq527Hqck2AxYysAA7xmALppuCkwQ";

    fn tv1_master() -> ExtendedPrivateKey {
        ExtendedPrivateKey::from_seed(&hex::decode(TV1_SEED).unwrap()).unwrap()
    }

    #[test]
    fn test_bip32_vector_1_master() {
        let master = tv1_master();
        assert_eq!(master.to_base58(KeyEncoding::Legacy).as_str(), TV1_M_XPRV);
        assert_eq!(
            master.to_extended_public_key().to_base58(KeyEncoding::Legacy),
            TV1_M_XPUB
        );
        assert_eq!(master.depth(), 0);
        assert_eq!(master.parent_fingerprint(), 0);
    }

    #[test]
    fn test_bip32_vector_1_children() {
        let m0h = tv1_master().derive("m/0'").unwrap();
        assert_eq!(m0h.to_base58(KeyEncoding::Legacy).as_str(), TV1_M0H_XPRV);
        assert_eq!(
            m0h.to_extended_public_key().to_base58(KeyEncoding::Legacy),
            TV1_M0H_XPUB
        );

        let m0h1 = tv1_master().derive("m/0'/1").unwrap();
        assert_eq!(m0h1.to_base58(KeyEncoding::Legacy).as_str(), TV1_M0H1_XPRV);
        assert_eq!(m0h1.child_index().raw(), 1);
        assert_eq!(m0h1.parent_fingerprint(), m0h.fingerprint());
    }

    #[test]
    fn public_derivation_matches_private_projection() {
        let xpub = ExtendedPublicKey::from_base58(TV1_M0H_XPUB).unwrap();
        let child = xpub.derive("m/1").unwrap();
        assert_eq!(child.to_base58(KeyEncoding::Legacy), TV1_M0H1_XPUB);
    }

    #[test]
    fn test_hardened_from_public_is_forbidden() {
        let xpub = tv1_master().to_extended_public_key();
        assert_eq!(
            xpub.derive_child(ChildIndex::hardened(0).unwrap()),
            Err(DerivationError::HardenedDerivationForbidden(0))
        );
        assert_eq!(
            xpub.derive("m/1/2'"),
            Err(DerivationError::HardenedDerivationForbidden(2))
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = tv1_master().derive("m/44'/8888'/0'/0/7").unwrap();
        let b = tv1_master().derive("m/44'/8888'/0'/0/7").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_identity_path_returns_same_key() {
        let master = tv1_master();
        assert_eq!(master.derive("m").unwrap(), master);
        assert_eq!(master.derive("M").unwrap(), master);
    }

    #[test]
    fn test_roundtrip_both_encodings() {
        let key = tv1_master().derive("m/84'/0'/0'").unwrap();
        for encoding in [KeyEncoding::Legacy, KeyEncoding::Native] {
            let encoded = key.to_base58(encoding);
            let (decoded, found) = ExtendedKey::decode(&encoded).unwrap();
            assert_eq!(found, encoding);
            assert_eq!(decoded, ExtendedKey::Private(key.clone()));

            let xpub = key.to_extended_public_key();
            let (decoded, found) = ExtendedKey::decode(&xpub.to_base58(encoding)).unwrap();
            assert_eq!(found, encoding);
            assert_eq!(decoded, ExtendedKey::Public(xpub));
        }
    }

    #[test]
    fn test_native_prefixes() {
        let key = tv1_master();
        assert!(key.to_base58(KeyEncoding::Native).starts_with("zprv"));
        assert!(key
            .to_extended_public_key()
            .to_base58(KeyEncoding::Native)
            .starts_with("zpub"));
    }

    #[test]
    fn test_version_must_match_key_type() {
        let public_version = LEGACY_PUBLIC_VERSION;
        assert_eq!(
            ExtendedPrivateKey::from_base58(TV1_M_XPUB),
            Err(DerivationError::InvalidVersion(public_version))
        );
        assert_eq!(
            ExtendedPublicKey::from_base58(TV1_M_XPRV),
            Err(DerivationError::InvalidVersion(LEGACY_PRIVATE_VERSION))
        );

        let mut bytes = *tv1_master().serialize(KeyEncoding::Legacy);
        bytes[..4].copy_from_slice(&0x0435_8394u32.to_be_bytes());
        assert_eq!(
            ExtendedKey::decode(&base58::encode_check(&bytes)),
            Err(DerivationError::InvalidVersion(0x0435_8394))
        );
    }

    #[test]
    fn test_root_invariant_checked_on_parse() {
        let mut bytes = *tv1_master().serialize(KeyEncoding::Legacy);
        // depth 0 but a non-zero parent fingerprint
        bytes[5] = 1;
        assert_eq!(
            ExtendedPrivateKey::from_bytes(&bytes).map(|(k, _)| k),
            Err(DerivationError::InvalidRootState)
        );
    }

    #[test]
    fn test_corrupted_string_rejected() {
        let mut chars: Vec<char> = TV1_M_XPUB.chars().collect();
        chars[20] = if chars[20] == 'a' { 'b' } else { 'a' };
        let corrupted: String = chars.into_iter().collect();
        assert!(ExtendedKey::from_base58(&corrupted).is_err());
    }

    #[test]
    fn test_depth_overflow() {
        let base = ExtendedKeyBase::new(
            255,
            1,
            ChildIndex::from_raw(1),
            ChainCode::from_bytes(&[9u8; 32]).unwrap(),
        )
        .unwrap();
        let key = ExtendedPrivateKey::new(base, PrivateKey::generate());
        assert_eq!(
            key.derive_child(ChildIndex::normal(0).unwrap()),
            Err(DerivationError::DepthOverflow)
        );
    }

    #[test]
    fn test_root_state_constructor() {
        let code = ChainCode::from_bytes(&[9u8; 32]).unwrap();
        assert_eq!(
            ExtendedKeyBase::new(0, 0, ChildIndex::from_raw(HARDENED_OFFSET), code),
            Err(DerivationError::InvalidRootState)
        );
    }

    #[test]
    fn neuter_discards_private_half() {
        let key = ExtendedKey::from(tv1_master());
        let public = key.clone().neuter();
        assert!(!public.is_private());
        assert!(public.private_key().is_none());
        assert_eq!(public.public_key(), key.public_key());
        assert_eq!(
            public.to_base58(KeyEncoding::Legacy).as_str(),
            TV1_M_XPUB
        );
    }

    #[test]
    fn extended_keys_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExtendedPrivateKey>();
        assert_send_sync::<ExtendedPublicKey>();
        assert_send_sync::<ExtendedKey>();
    }
}
