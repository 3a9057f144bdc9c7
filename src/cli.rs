//! Command-line interface for kalah.

use clap::{Parser, Subcommand, ValueEnum};
use kalah::Player;

/// Kalah - stone-sowing board game against an oracle-backed opponent
#[derive(Parser, Debug)]
#[command(name = "kalah")]
#[command(about = "Play kalah against an oracle-backed opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game in the terminal
    Play {
        /// Path to the settings file
        #[arg(short, long, default_value = "kalah.toml")]
        config: std::path::PathBuf,

        /// Oracle base URL (overrides the settings file and environment)
        #[arg(long)]
        oracle_url: Option<String>,

        /// Which seat opens the game
        #[arg(long, value_enum, default_value = "user")]
        first: FirstMover,
    },
}

/// Seat that makes the first move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FirstMover {
    /// The human seat opens.
    User,
    /// The automated seat opens.
    Ai,
}

impl From<FirstMover> for Player {
    fn from(first: FirstMover) -> Self {
        match first {
            FirstMover::User => Player::User,
            FirstMover::Ai => Player::Ai,
        }
    }
}
