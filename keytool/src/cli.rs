//! # CLI Interface
//!
//! Defines the command-line argument structure for `sct-keytool` using
//! `clap` derive. Secrets can come from flags or from the environment
//! (`SCT_MNEMONIC`, `SCT_PASSPHRASE`, `SCT_SEED`); prefer the environment,
//! flags end up in shell history.

use clap::{Args, Parser, Subcommand};

/// Scintilla key and address tool.
///
/// Derives addresses and persona keys from a seed or mnemonic, inspects
/// extended keys, and decodes addresses of any supported chain.
#[derive(Parser, Debug)]
#[command(
    name = "sct-keytool",
    about = "Scintilla key and address tool",
    version,
    propagate_version = true
)]
pub struct KeytoolCli {
    /// Log output format: pretty or json. Logs go to stderr.
    #[arg(long, global = true, env = "SCT_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Default log level when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Derive an address at `m/purpose'/coin_type'/account'/change/index`.
    Address(AddressArgs),
    /// Derive a persona or shared persona address.
    Persona(PersonaArgs),
    /// Parse an extended key and print its fields.
    Inspect(InspectArgs),
    /// Detect an address's format and print its decoded fields.
    Decode(DecodeArgs),
    /// Print the derivation path for a moniker or moniker pair.
    MonikerPath(MonikerPathArgs),
    /// Print version information and exit.
    Version,
}

/// Where the root key comes from. Exactly one of `--mnemonic` and `--seed`.
#[derive(Args, Debug, Clone, Default)]
pub struct SeedArgs {
    /// BIP39 English mnemonic.
    #[arg(long, env = "SCT_MNEMONIC", hide_env_values = true, conflicts_with = "seed")]
    pub mnemonic: Option<String>,

    /// Optional BIP39 passphrase.
    #[arg(long, env = "SCT_PASSPHRASE", hide_env_values = true, default_value = "")]
    pub passphrase: String,

    /// Hex-encoded seed, 16 to 64 bytes.
    #[arg(long, env = "SCT_SEED", hide_env_values = true)]
    pub seed: Option<String>,
}

/// Arguments for the `address` subcommand.
#[derive(Args, Debug, Clone)]
pub struct AddressArgs {
    #[command(flatten)]
    pub seed: SeedArgs,

    /// Named chain selecting purpose and coin type: scintilla, bitcoin,
    /// testnet-bitcoin, segwit, testnet-segwit, ethereum, cosmos.
    #[arg(long, default_value = "scintilla")]
    pub chain: String,

    /// Explicit purpose (e.g. 84 for BIP84). Setting this or `--coin-type`
    /// bypasses `--chain`; the other one defaults to 44 / 8888.
    #[arg(long)]
    pub purpose: Option<u32>,

    /// Explicit coin type.
    #[arg(long)]
    pub coin_type: Option<u32>,

    /// Address format to render. Defaults to the chain's own format.
    #[arg(long)]
    pub address_type: Option<String>,

    #[arg(long, default_value_t = 0)]
    pub account: u32,

    #[arg(long, default_value_t = 0)]
    pub change: u32,

    #[arg(long, default_value_t = 0)]
    pub index: u32,
}

/// Arguments for the `persona` subcommand.
#[derive(Args, Debug, Clone)]
pub struct PersonaArgs {
    #[command(flatten)]
    pub seed: SeedArgs,

    /// The persona's moniker, e.g. `sct.alice`.
    #[arg(long)]
    pub moniker: String,

    /// The counterpart moniker for a shared persona.
    #[arg(long)]
    pub shared_with: Option<String>,

    /// Use the older colon-joined derivation for shared personas.
    #[arg(long, requires = "shared_with")]
    pub legacy_shared: bool,

    /// Persona type: default, owner, spender, proposer, voter, stake,
    /// operator, public.
    #[arg(long = "type")]
    pub persona_type: Option<String>,

    /// Address format to render.
    #[arg(long, default_value = "scintilla")]
    pub address_type: String,

    #[arg(long, default_value_t = 0)]
    pub account: u32,

    #[arg(long, default_value_t = 0)]
    pub change: u32,

    #[arg(long, default_value_t = 0)]
    pub index: u32,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// An `xprv`, `xpub`, `zprv` or `zpub` string.
    pub key: String,

    /// Also print the private key (hex and WIF).
    #[arg(long)]
    pub reveal: bool,
}

/// Arguments for the `decode` subcommand.
#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Any supported address.
    pub address: String,
}

/// Arguments for the `moniker-path` subcommand.
#[derive(Args, Debug, Clone)]
pub struct MonikerPathArgs {
    pub moniker: String,

    /// Second moniker; prints the shared path of the pair.
    #[arg(long)]
    pub shared_with: Option<String>,
}
