//! Command-line interface for strictly_tictactoe_ai.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use strictly_tictactoe_ai::{Difficulty, LlmProvider};

/// Strictly Tic-Tac-Toe AI - play tic-tac-toe against a language model
#[derive(Parser, Debug)]
#[command(name = "strictly_tictactoe_ai")]
#[command(about = "Tic-tac-toe against an LLM opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (optional)
    #[arg(short, long, global = true, default_value = "tictactoe.toml")]
    pub config: PathBuf,

    /// Override the stats storage backend
    #[arg(long, global = true, value_enum)]
    pub storage: Option<StorageKind>,

    /// Directory (file backend) or database path (sqlite backend)
    #[arg(long, global = true)]
    pub storage_path: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Storage backends selectable on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// JSON files in a directory
    File,
    /// SQLite database
    Sqlite,
    /// In memory, discarded on exit
    Memory,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Play {
        /// Starting difficulty (easy, medium, hard)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Use the offline random opponent instead of an LLM
        #[arg(long)]
        offline: bool,

        /// Override the LLM provider (gemini, openai, anthropic)
        #[arg(long)]
        provider: Option<LlmProvider>,

        /// Override the LLM model name
        #[arg(long)]
        model: Option<String>,

        /// Minimum delay before each AI move, in milliseconds
        #[arg(long)]
        think_delay_ms: Option<u64>,
    },

    /// Print persisted stats
    Stats,

    /// Zero persisted stats
    ResetStats,
}
