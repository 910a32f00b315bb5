// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! RxRelay - doctor-to-pharmacy prescription relay.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rxrelay_config::{ConfigError, RxRelayConfig};

/// RxRelay - relays doctors' prescription requests to the pharmacy.
#[derive(Parser, Debug)]
#[command(name = "rxrelay", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server.
    Serve,
    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Load and validate configuration, printing any problems.
    Check,
}

fn load(path: Option<&std::path::Path>) -> Result<RxRelayConfig, Vec<ConfigError>> {
    match path {
        Some(path) => rxrelay_config::load_and_validate_path(path),
        None => rxrelay_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            rxrelay_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("rxrelay: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config {
            action: ConfigAction::Check,
        }) => {
            println!(
                "configuration OK (bot.name={}, ledger={:?}, senders={})",
                config.bot.name,
                config.ledger.backend,
                config.bot.allowed_senders.len()
            );
        }
        None => {
            println!("rxrelay: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_parses_serve_with_config_path() {
        let cli = Cli::try_parse_from(["rxrelay", "--config", "/tmp/rx.toml", "serve"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve)));
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/rx.toml")));
    }

    #[test]
    fn cli_parses_config_check() {
        let cli = Cli::try_parse_from(["rxrelay", "config", "check"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Check
            })
        ));
    }

    #[test]
    fn cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["rxrelay", "shell"]).is_err());
    }

    #[test]
    fn load_reports_missing_pharmacy_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rxrelay.toml");
        std::fs::write(&path, "[bot]\nname = \"rx\"\n").unwrap();
        let errors = load(Some(&path)).unwrap_err();
        assert!(!errors.is_empty());
    }
}
