//! Multisig envelope CLI
//!
//! A command-line interface for co-signing and wrapping multisig
//! transactions.

use clap::{Parser, Subcommand};
use multisig_envelope::cli::{self, BuildOptions};
use multisig_envelope::config::ContextConfig;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "envelope")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "Build and sign multisig envelope transactions", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new key pair
    Keygen,

    /// Co-sign an inner transaction
    Cosign {
        /// Cosigner's private key (hex)
        #[arg(short, long)]
        key: String,

        /// Inner transaction JSON file
        #[arg(short, long)]
        inner: PathBuf,

        /// Co-signature fee in micro-units
        #[arg(long)]
        fee: Option<u64>,
    },

    /// Wrap an inner transaction in a signed multisig envelope
    Build {
        /// Sender's private key (hex)
        #[arg(short, long)]
        key: String,

        /// Inner transaction JSON file
        #[arg(short, long)]
        inner: PathBuf,

        /// Co-signature JSON file (repeatable)
        #[arg(long = "cosig")]
        cosignatures: Vec<PathBuf>,

        /// Deadline (RFC 3339), defaults to 23 hours from now
        #[arg(short, long)]
        deadline: Option<String>,

        /// Explicit fee; the envelope then carries a zero fee
        #[arg(long)]
        fee: Option<u64>,

        /// Delegate signer public key (hex)
        #[arg(long)]
        signed_by: Option<String>,

        /// Announce the envelope through the outbox
        #[arg(long)]
        send: bool,

        /// Outbox directory, overrides the configuration
        #[arg(long)]
        outbox: Option<PathBuf>,
    },

    /// Verify an envelope's signature and co-signatures
    Verify {
        /// Envelope JSON file
        #[arg(short, long)]
        envelope: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = ContextConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Keygen => cli::cmd_keygen()?,
        Commands::Cosign { key, inner, fee } => cli::cmd_cosign(&key, &inner, fee)?,
        Commands::Build {
            key,
            inner,
            cosignatures,
            deadline,
            fee,
            signed_by,
            send,
            outbox,
        } => {
            let options = BuildOptions {
                private_key: key,
                inner,
                cosignatures,
                deadline,
                fee,
                signed_by,
                send,
                outbox,
            };
            cli::cmd_build(&config, &options)?
        }
        Commands::Verify { envelope } => {
            if !cli::cmd_verify(&envelope)? {
                log::warn!("Envelope {:?} failed verification", envelope);
                process::exit(1);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["envelope", "keygen", "--config", "ctx.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("ctx.json")));
        assert!(matches!(cli.command, Commands::Keygen));

        let cli = Cli::try_parse_from(["envelope", "--config", "ctx.json", "keygen"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("ctx.json")));
    }
}
