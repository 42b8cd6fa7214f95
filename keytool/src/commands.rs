//! Subcommand implementations.
//!
//! Each command returns a serializable report; `main` prints it as JSON.
//! Keeping the printing out of here lets the tests assert on fields.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use zeroize::Zeroizing;

use scintilla_keys::address::{
    decode_address, BitcoinLegacyAddress, BitcoinNetwork, BitcoinSegWitAddress, DecodedAddress,
};
use scintilla_keys::config::WIF_MAINNET_VERSION;
use scintilla_keys::hd::{ExtendedKey, KeyEncoding};
use scintilla_keys::keyring::{
    AddressKeyring, AddressOptions, ChainOptions, PersonaKeyring, PersonaType, SeedKeyring,
};
use scintilla_keys::moniker::{derive_moniker_path, derive_shared_moniker_path, MonikerPath};

use crate::cli::{AddressArgs, DecodeArgs, InspectArgs, MonikerPathArgs, PersonaArgs, SeedArgs};

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct AddressReport {
    pub chain: String,
    pub path: String,
    pub account_xpub: String,
    pub public_key: String,
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct PersonaReport {
    pub mode: &'static str,
    pub monikers: Vec<String>,
    pub persona_path: String,
    pub persona_type: Option<String>,
    pub persona_xpub: String,
    pub public_key: String,
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub kind: &'static str,
    pub encoding: &'static str,
    pub depth: u8,
    pub parent_fingerprint: String,
    pub child_index: String,
    pub fingerprint: String,
    pub chain_code: String,
    pub public_key: String,
    pub xpub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wif: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DecodeReport {
    pub address: String,
    #[serde(flatten)]
    pub decoded: DecodedAddress,
}

#[derive(Debug, Serialize)]
pub struct MonikerPathReport {
    pub monikers: Vec<String>,
    pub path: String,
    pub first_index: u32,
    pub second_index: u32,
    pub hash_prefix: String,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn seed_keyring(args: &SeedArgs) -> Result<SeedKeyring> {
    match (&args.mnemonic, &args.seed) {
        (Some(phrase), _) => SeedKeyring::from_mnemonic(phrase, &args.passphrase)
            .context("failed to derive seed from mnemonic"),
        (None, Some(seed_hex)) => {
            let seed = Zeroizing::new(hex::decode(seed_hex.trim()).context("seed is not valid hex")?);
            SeedKeyring::from_seed(&seed).context("invalid seed")
        }
        (None, None) => bail!("no key material: pass --mnemonic or --seed (or set SCT_MNEMONIC / SCT_SEED)"),
    }
}

/// Render `keyring` for a named chain. Testnet chains get testnet
/// networks; everything else goes through `AddressChain` parsing.
fn render_address(keyring: &AddressKeyring, chain: &str, address_type: Option<&str>) -> Result<String> {
    let public_key = keyring.public_key();
    let rendered = match (address_type, chain.to_ascii_lowercase().as_str()) {
        (Some(address_type), _) => keyring.address_for(address_type)?.to_string(),
        (None, "testnet-bitcoin") => {
            BitcoinLegacyAddress::from_public_key(&public_key, BitcoinNetwork::Testnet).to_string()
        }
        (None, "testnet-segwit") => {
            BitcoinSegWitAddress::from_public_key(&public_key, BitcoinNetwork::Testnet).to_string()
        }
        (None, name) => keyring.address_for(name)?.to_string(),
    };
    Ok(rendered)
}

pub fn address(args: &AddressArgs) -> Result<AddressReport> {
    let seed = seed_keyring(&args.seed)?;
    let mut options = ChainOptions::named(args.chain.clone());
    options.purpose = args.purpose;
    options.coin_type = args.coin_type;

    let chain = seed.chain_keyring(&options)?;
    let account = chain.account_keyring(args.account)?;
    let keyring = account.address_keyring(args.index, args.change)?;
    let address = render_address(&keyring, &args.chain, args.address_type.as_deref())?;

    let path = format!(
        "{}/{}'/{}/{}",
        chain.path(),
        args.account,
        args.change,
        args.index
    );
    tracing::info!(%path, chain = %args.chain, "derived address");

    Ok(AddressReport {
        chain: args.chain.clone(),
        path,
        account_xpub: account.extended_public_key().to_base58(KeyEncoding::Legacy),
        public_key: keyring.public_key().to_hex(),
        address,
    })
}

pub fn persona(args: &PersonaArgs) -> Result<PersonaReport> {
    let seed = seed_keyring(&args.seed)?;
    let account = seed
        .chain_keyring(&ChainOptions::default())?
        .account_keyring(args.account)?;

    let persona_type = args
        .persona_type
        .as_deref()
        .map(str::parse::<PersonaType>)
        .transpose()?;
    let options = AddressOptions {
        change: args.change,
        persona_type,
    };

    let (mode, monikers, path, xpub, keyring) = match (&args.shared_with, args.legacy_shared) {
        (None, _) => {
            let persona = account.persona_keyring(&args.moniker)?;
            let keyring = persona.address_keyring(args.index, options)?;
            (
                "personal",
                vec![persona.moniker().to_string()],
                persona.path().clone(),
                persona.extended_public_key(),
                keyring,
            )
        }
        (Some(other), true) => {
            let persona = PersonaKeyring::shared_with(account.extended_key(), &args.moniker, other)?;
            let keyring = persona.address_keyring(args.index, options)?;
            (
                "legacy-shared",
                vec![args.moniker.clone(), other.clone()],
                persona.path().clone(),
                persona.extended_public_key(),
                keyring,
            )
        }
        (Some(other), false) => {
            let shared = account.shared_persona_keyring(&args.moniker, other)?;
            let keyring = shared.address_keyring(args.index, options)?;
            let (lower, higher) = shared.monikers().monikers();
            (
                "shared",
                vec![lower.to_string(), higher.to_string()],
                shared.path().clone(),
                shared.extended_public_key(),
                keyring,
            )
        }
    };

    let address = keyring.address_for(&args.address_type)?.to_string();
    tracing::info!(mode, path = %path, "derived persona address");

    Ok(PersonaReport {
        mode,
        monikers,
        persona_path: path.to_string(),
        persona_type: persona_type.map(|t| t.to_string()),
        persona_xpub: xpub.to_base58(KeyEncoding::Legacy),
        public_key: keyring.public_key().to_hex(),
        address,
    })
}

pub fn inspect(args: &InspectArgs) -> Result<InspectReport> {
    let (key, encoding) = ExtendedKey::decode(args.key.trim()).context("not a valid extended key")?;
    let base = key.base();

    let (private_key, wif) = match (args.reveal, key.private_key()) {
        (true, Some(private)) => (
            Some(private.to_hex().to_string()),
            Some(private.to_wif(WIF_MAINNET_VERSION).to_string()),
        ),
        _ => (None, None),
    };
    if args.reveal && !key.is_private() {
        tracing::warn!("--reveal has no effect on a public extended key");
    }

    Ok(InspectReport {
        kind: if key.is_private() { "private" } else { "public" },
        encoding: encoding.as_str(),
        depth: base.depth(),
        parent_fingerprint: format!("{:08x}", base.parent_fingerprint()),
        child_index: base.child_index().to_string(),
        fingerprint: format!("{:08x}", key.fingerprint()),
        chain_code: base.chain_code().to_hex(),
        public_key: key.public_key().to_hex(),
        xpub: key.to_extended_public_key().to_base58(encoding),
        private_key,
        wif,
    })
}

pub fn decode(args: &DecodeArgs) -> Result<DecodeReport> {
    let address = args.address.trim().to_string();
    let decoded = decode_address(&address).with_context(|| format!("cannot decode {address:?}"))?;
    Ok(DecodeReport { address, decoded })
}

pub fn moniker_path(args: &MonikerPathArgs) -> Result<MonikerPathReport> {
    let (monikers, path): (Vec<String>, MonikerPath) = match &args.shared_with {
        Some(other) => {
            let mut pair = vec![args.moniker.clone(), other.clone()];
            pair.sort();
            (pair, derive_shared_moniker_path(&args.moniker, other)?)
        }
        None => (vec![args.moniker.clone()], derive_moniker_path(&args.moniker)?),
    };
    Ok(MonikerPathReport {
        monikers,
        path: path.to_string(),
        first_index: path.first_index(),
        second_index: path.second_index(),
        hash_prefix: hex::encode(path.truncated_hash()),
    })
}
