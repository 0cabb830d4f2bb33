//! Strictly Tic-Tac-Toe AI - terminal front end and stats commands.

#![warn(missing_docs)]

mod cli;
mod tui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, StorageKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strictly_tictactoe_ai::{
    AppConfig, GameEngine, LlmPolicy, MovePolicy, Orchestrator, RandomPolicy, StorageConfig,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,strictly_tictactoe_ai=debug";
const LOG_FILE: &str = "strictly_tictactoe_ai.log";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            difficulty,
            offline,
            provider,
            model,
            think_delay_ms,
        } => {
            init_file_tracing()?;
            let mut config = load_config(&cli.config, cli.storage, cli.storage_path)?;
            if let Some(difficulty) = difficulty {
                config = config.with_difficulty(difficulty);
            }
            if let Some(provider) = provider {
                config = config.with_llm_provider(provider);
            }
            if let Some(model) = model {
                config = config.with_llm_model(model);
            }
            if let Some(ms) = think_delay_ms {
                config = config.with_think_delay_ms(ms);
            }
            run_play(config, offline).await
        }
        Command::Stats => {
            init_stderr_tracing();
            let config = load_config(&cli.config, cli.storage, cli.storage_path)?;
            print_stats(&config);
            Ok(())
        }
        Command::ResetStats => {
            init_stderr_tracing();
            let config = load_config(&cli.config, cli.storage, cli.storage_path)?;
            config.open_stats_store().reset();
            println!("Stats reset.");
            Ok(())
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Logs to a file so output does not corrupt the terminal UI.
fn init_file_tracing() -> Result<()> {
    let log_file = std::fs::File::create(LOG_FILE)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn init_stderr_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Loads the config file and applies storage overrides from the command line.
#[instrument(skip_all, fields(path = %path.display()))]
fn load_config(
    path: &Path,
    storage: Option<StorageKind>,
    storage_path: Option<PathBuf>,
) -> Result<AppConfig> {
    let config = AppConfig::load_or_default(path)?;

    let storage = match (storage, storage_path) {
        (None, None) => return Ok(config),
        (Some(StorageKind::Memory), _) => StorageConfig::Memory,
        (Some(StorageKind::Sqlite), path) => StorageConfig::Sqlite {
            path: path
                .unwrap_or_else(|| PathBuf::from("tictactoe.db"))
                .to_string_lossy()
                .into_owned(),
        },
        (Some(StorageKind::File), path) => StorageConfig::File {
            dir: path.unwrap_or_else(|| PathBuf::from(".tictactoe")),
        },
        (None, Some(path)) => match config.storage() {
            StorageConfig::Sqlite { .. } => StorageConfig::Sqlite {
                path: path.to_string_lossy().into_owned(),
            },
            StorageConfig::File { .. } | StorageConfig::Memory => StorageConfig::File { dir: path },
        },
    };

    info!(?storage, "Storage overridden from command line");
    Ok(config.with_storage(storage))
}

/// Picks the LLM policy, or the random policy when offline or unconfigured.
#[instrument(skip(config))]
fn build_policy(config: &AppConfig, offline: bool) -> Arc<dyn MovePolicy> {
    if offline {
        info!("Offline mode, using random policy");
        return Arc::new(RandomPolicy::new());
    }
    match config.create_llm_config() {
        Ok(llm) => Arc::new(LlmPolicy::from_config(llm)),
        Err(e) => {
            warn!(error = %e, "No LLM configured, using random policy");
            eprintln!("{}; playing against the random opponent.", e.message);
            Arc::new(RandomPolicy::new())
        }
    }
}

async fn run_play(config: AppConfig, offline: bool) -> Result<()> {
    info!("Starting Strictly Tic-Tac-Toe AI");
    let policy = build_policy(&config, offline);
    let engine = GameEngine::new(config.open_stats_store(), *config.difficulty());
    let orchestrator = Orchestrator::new(engine, policy, config.think_delay());
    tui::run(orchestrator).await
}

fn print_stats(config: &AppConfig) {
    let stats = config.open_stats_store().load();
    println!("Played: {}", stats.played());
    println!("Wins:   {}", stats.wins());
    println!("Losses: {}", stats.losses());
    println!("Draws:  {}", stats.draws());
    println!("Win rate: {:.1}%", stats.win_rate());
}
