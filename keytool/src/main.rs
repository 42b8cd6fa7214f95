// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Scintilla Keytool
//!
//! Entry point for the `sct-keytool` binary. Parses CLI arguments,
//! initializes logging, runs one subcommand and prints its report as JSON
//! on stdout.
//!
//! The binary supports six subcommands:
//!
//! - `address`      : derive a BIP44-style address for a named chain
//! - `persona`      : derive a persona or shared persona address
//! - `inspect`      : print the fields of an extended key
//! - `decode`       : detect and decode any supported address
//! - `moniker-path` : print the derivation path of a moniker or pair
//! - `version`      : print build version information

mod cli;
mod commands;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use cli::{Commands, KeytoolCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = KeytoolCli::parse();
    logging::init_logging(&cli.log_level, LogFormat::from_str_lossy(&cli.log_format));

    match cli.command {
        Commands::Address(args) => print_report(&commands::address(&args)?),
        Commands::Persona(args) => print_report(&commands::persona(&args)?),
        Commands::Inspect(args) => print_report(&commands::inspect(&args)?),
        Commands::Decode(args) => print_report(&commands::decode(&args)?),
        Commands::MonikerPath(args) => print_report(&commands::moniker_path(&args)?),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn print_report<T: Serialize>(report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    println!("{json}");
    Ok(())
}

fn print_version() {
    println!("sct-keytool {}", env!("CARGO_PKG_VERSION"));
    println!("derivation  {}", scintilla_keys::config::DEFAULT_DERIVATION_PATH);
    println!("rustc       {}", rustc_version());
}

fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
