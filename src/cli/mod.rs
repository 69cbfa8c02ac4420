use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod runner;

#[derive(Parser)]
#[command(name = "highwater")]
#[command(
    version,
    about = "Peak brokerage account value evaluator for tax-year reporting"
)]
#[command(
    long_about = "Reconstructs a brokerage account's value at every point of a tax year by \
replaying its operation history backward from the current snapshot, and reports the maximum \
aggregate value observed (FBAR-style peak value)."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay the year backward and report the peak account value
    Evaluate {
        /// Path to the TOML config (tax year, reporting currency, rates)
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// Path to the current portfolio snapshot export (JSON)
        #[arg(long, default_value = "snapshot.json")]
        snapshot: PathBuf,

        /// Path to the operation history export (JSON)
        #[arg(long, default_value = "operations.json")]
        operations: PathBuf,

        /// Path to the historical candles export (JSON)
        #[arg(long, default_value = "candles.json")]
        candles: PathBuf,

        /// Also print every replayed step, newest first
        #[arg(long)]
        trace: bool,
    },

    /// Value the current snapshot without replaying history
    Snapshot {
        /// Path to the TOML config (tax year, reporting currency, rates)
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// Path to the current portfolio snapshot export (JSON)
        #[arg(long, default_value = "snapshot.json")]
        snapshot: PathBuf,
    },
}
