//! Known-answer tests for the full keyring hierarchy.
//!
//! Everything here starts from the BIP39 test phrase
//! `abandon ×11 about` and walks down to concrete addresses. The Bitcoin and
//! Ethereum values match every other BIP44 wallet; the Scintilla values pin
//! the persona hashing so a change to it cannot slip through unnoticed.

use scintilla_keys::address::{decode_address, AddressChain, AddressCodec, DecodedAddress};
use scintilla_keys::keyring::{
    seed_from_mnemonic, AccountKeyring, AddressOptions, ChainOptions, Keyring, PersonaType,
    SeedKeyring,
};
use scintilla_keys::KeyEncoding;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
const ABANDON_SEED: &str = "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4";
const ROOT_XPRV: &str = "xprv9s21ZrQH143K3GJpoapnV8SFfukcVBSfeCficPSGfubmSFDxo1kuHnLisriDvSnRRuL2Qrg5ggqHKNVpxR86QEC8w35uxmGoggxtQTPvfUu";
const BITCOIN_CHAIN_XPRV: &str = "xprv9wnZLsHUEcR3UVuysrCTjAu7FWKXN2m5XVrgkEmeptHqi5yNkR8seouPutDWAJQcUPYDzTDgjK7G1h53M4QeA4myt6gUSUgdFhQSYw7XAV4";
const BITCOIN_ACCOUNT_XPRV: &str = "xprv9xpXFhFpqdQK3TmytPBqXtGSwS3DLjojFhTGht8gwAAii8py5X6pxeBnQ6ehJiyJ6nDjWGJfZ95WxByFXVkDxHXrqu53WCRGypk2ttuqncb";
const BITCOIN_ACCOUNT_XPUB: &str = "xpub6BosfCnifzxcFwrSzQiqu2DBVTshkCXacvNsWGYJVVhhawA7d4R5WSWGFNbi8Aw6ZRc1brxMyWMzG3DSSSSoekkudhUd9yLb6qx39T9nMdj";

const NATIVE_ADDRESS: &str = "sct170psr9zhfp9nd9qeyp0mdggxj9m7y6el2ezeq5";
const PERSONA_ALICE: &str = "sct1xs3mt48hf9uyz36n5sdl5pfp99zgnlmslf6stm";
const SHARED_ALICE_BOB: &str = "sct1xszap63hzdaks75e2qr098ky3rxk4cp7vetdmu";

fn seed_keyring() -> SeedKeyring {
    SeedKeyring::from_mnemonic(ABANDON, "").expect("valid test mnemonic")
}

fn account(chain: &str) -> AccountKeyring {
    seed_keyring()
        .chain_keyring(&ChainOptions::named(chain))
        .expect("known chain")
        .account_keyring(0)
        .expect("account 0")
}

// ---------------------------------------------------------------------------
// Seed and root
// ---------------------------------------------------------------------------

#[test]
fn mnemonic_and_raw_seed_agree() {
    let seed = seed_from_mnemonic(ABANDON, "").unwrap();
    assert_eq!(hex::encode(&*seed), ABANDON_SEED);

    let from_seed = SeedKeyring::from_seed(&hex::decode(ABANDON_SEED).unwrap()).unwrap();
    assert_eq!(from_seed, seed_keyring());
    assert_eq!(from_seed.to_base58().as_str(), ROOT_XPRV);
}

#[test]
fn passphrase_changes_the_tree() {
    let plain = SeedKeyring::from_mnemonic(ABANDON, "").unwrap();
    let salted = SeedKeyring::from_mnemonic(ABANDON, "TREZOR").unwrap();
    assert_ne!(plain.public_key(), salted.public_key());
}

// ---------------------------------------------------------------------------
// Native chain
// ---------------------------------------------------------------------------

#[test]
fn default_chain_first_address() {
    let address = account("scintilla").address_keyring(0, 0).unwrap();
    assert_eq!(
        address.address(AddressChain::Scintilla).to_string(),
        NATIVE_ADDRESS
    );

    // The default options select the same chain.
    let default = seed_keyring()
        .chain_keyring(&ChainOptions::default())
        .unwrap()
        .account_keyring(0)
        .unwrap()
        .address_keyring(0, 0)
        .unwrap();
    assert_eq!(default, address);
}

#[test]
fn native_address_decodes_to_key_hash() {
    let keyring = account("scintilla").address_keyring(0, 0).unwrap();
    let decoded = decode_address(NATIVE_ADDRESS).unwrap();
    match &decoded {
        DecodedAddress::Native { prefix, hash } => {
            assert_eq!(prefix, "sct");
            assert_eq!(hash, &keyring.public_key().hash160());
        }
        other => panic!("expected native address, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Bitcoin and Ethereum
// ---------------------------------------------------------------------------

#[test]
fn bitcoin_bip44_layers() {
    let seed = seed_keyring();
    assert_eq!(seed.to_base58().as_str(), ROOT_XPRV);

    let chain = seed.chain_keyring(&ChainOptions::named("bitcoin")).unwrap();
    assert_eq!(chain.to_base58().as_str(), BITCOIN_CHAIN_XPRV);

    let account = chain.account_keyring(0).unwrap();
    assert_eq!(account.to_base58().as_str(), BITCOIN_ACCOUNT_XPRV);
    assert_eq!(
        account.extended_public_key().to_base58(KeyEncoding::Legacy),
        BITCOIN_ACCOUNT_XPUB
    );

    let address = account.address_keyring(0, 0).unwrap();
    assert_eq!(
        address.address(AddressChain::Bitcoin).to_string(),
        "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA"
    );
}

#[test]
fn bitcoin_bip84_segwit() {
    let address = seed_keyring()
        .chain_keyring(&ChainOptions::named("bitcoin").with_purpose(84).with_coin_type(0))
        .unwrap()
        .account_keyring(0)
        .unwrap()
        .address_keyring(0, 0)
        .unwrap()
        .address(AddressChain::SegWit);
    assert_eq!(
        address.to_string(),
        "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu"
    );
    assert!(address.validate());
}

#[test]
fn ethereum_first_address() {
    let address = account("ethereum")
        .address_keyring(0, 0)
        .unwrap()
        .address_for("eth")
        .unwrap();
    assert_eq!(
        address.to_string(),
        "0x9858EfFD232B4033E47d90003D41EC34EcaEda94"
    );
}

// ---------------------------------------------------------------------------
// Personas
// ---------------------------------------------------------------------------

#[test]
fn persona_first_address() {
    let persona = account("scintilla").persona_keyring("sct.alice").unwrap();
    let address = persona
        .address_keyring(0, AddressOptions::default())
        .unwrap()
        .address(AddressChain::Scintilla);
    assert_eq!(address.to_string(), PERSONA_ALICE);
    assert_eq!(persona.path().to_string(), "m/2'/1387663315'/1787011306'");
}

#[test]
fn persona_type_aliases_share_a_branch() {
    let persona = account("scintilla").persona_keyring("sct.alice").unwrap();
    for persona_type in [PersonaType::Owner, PersonaType::Spender] {
        let address = persona
            .address_keyring(0, AddressOptions::with_type(persona_type))
            .unwrap()
            .address(AddressChain::Scintilla);
        assert_eq!(address.to_string(), PERSONA_ALICE, "{persona_type}");
    }
    let voter = persona
        .address_keyring(0, AddressOptions::with_type(PersonaType::Voter))
        .unwrap()
        .address(AddressChain::Scintilla);
    assert_ne!(voter.to_string(), PERSONA_ALICE);
}

#[test]
fn shared_persona_is_symmetric() {
    let account = account("scintilla");
    for (first, second) in [("sct.alice", "sct.bob"), ("sct.bob", "sct.alice")] {
        let address = account
            .shared_persona_keyring(first, second)
            .unwrap()
            .address_keyring(0, AddressOptions::default())
            .unwrap()
            .address(AddressChain::Scintilla);
        assert_eq!(address.to_string(), SHARED_ALICE_BOB, "{first}/{second}");
    }
}

#[test]
fn shared_persona_differs_from_both_personal_ones() {
    let account = account("scintilla");
    let shared = account
        .shared_persona_keyring("sct.alice", "sct.bob")
        .unwrap()
        .public_key();
    let alice = account.persona_keyring("sct.alice").unwrap().public_key();
    let bob = account.persona_keyring("sct.bob").unwrap().public_key();
    assert_ne!(shared, alice);
    assert_ne!(shared, bob);
}
