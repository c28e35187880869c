mod session;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::PiggyBankService;

pub use session::*;

/// Piggybank - a single-balance piggy bank
#[derive(Parser)]
#[command(name = "piggybank")]
#[command(about = "Deposit, withdraw and check the balance of an in-memory piggy bank")]
#[command(version)]
pub struct Cli {
    /// Currency symbol shown in front of amounts
    #[arg(long, env = "PIGGYBANK_CURRENCY", default_value = "R$", global = true)]
    pub currency: String,

    /// Enable verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive session (default)
    Shell,

    /// Execute session commands from a file, one per line
    Run {
        /// Script file
        file: PathBuf,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_tracing(self.verbose);

        // The balance lives only as long as this process
        let service = PiggyBankService::new();
        let config = SessionConfig {
            currency: self.currency,
        };
        let mut session = Session::new(&service, config, io::stdout().lock());

        match self.command.unwrap_or(Commands::Shell) {
            Commands::Shell => {
                session.run(io::stdin().lock(), SessionMode::Interactive)?;
            }

            Commands::Run { file } => {
                let script = File::open(&file)
                    .with_context(|| format!("Failed to open script '{}'", file.display()))?;
                session.run(BufReader::new(script), SessionMode::Script)?;
            }
        }

        Ok(())
    }
}

/// Logs go to stderr so they never mix with session output.
/// `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose)));

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .try_init();
}

/// Filter used when `RUST_LOG` is not set: rejected operations are always
/// reported, every operation with `--verbose`.
fn default_log_filter(verbose: bool) -> &'static str {
    if verbose { "piggybank=debug" } else { "warn" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_shell() {
        let cli = Cli::try_parse_from(["piggybank"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_default_log_filter() {
        assert_eq!(default_log_filter(false), "warn");
        assert_eq!(default_log_filter(true), "piggybank=debug");
        assert!(EnvFilter::try_new(default_log_filter(true)).is_ok());
    }

    #[test]
    fn test_run_command_with_currency() {
        let cli =
            Cli::try_parse_from(["piggybank", "run", "ops.txt", "--currency", "$", "-v"]).unwrap();

        assert_eq!(cli.currency, "$");
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Run { file }) if file == PathBuf::from("ops.txt")));
    }
}
