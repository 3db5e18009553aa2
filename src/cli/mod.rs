use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod menu;

pub use menu::{render_record, MenuSession};

/// Saldo - In-memory Banking Ledger
#[derive(Parser)]
#[command(name = "saldo")]
#[command(about = "An in-memory banking ledger: register users, move money, review history")]
#[command(version)]
pub struct Cli {
    /// Currency symbol shown next to amounts
    #[arg(long, env = "SALDO_CURRENCY", default_value = "S/", global = true)]
    pub currency: String,

    /// Read menu input from a file instead of stdin
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// Enable verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive menu session (the default)
    Menu,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_logging(self.verbose);

        match self.command.unwrap_or(Commands::Menu) {
            Commands::Menu => {
                let stdout = io::stdout();
                match &self.input {
                    Some(path) => {
                        let file = File::open(path).with_context(|| {
                            format!("Failed to open input file: {}", path.display())
                        })?;
                        MenuSession::new(BufReader::new(file), stdout.lock(), &self.currency)
                            .run()?;
                    }
                    None => {
                        MenuSession::new(io::stdin().lock(), stdout.lock(), &self.currency)
                            .run()?;
                    }
                }
            }
        }

        Ok(())
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed (e.g. by a test harness)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
