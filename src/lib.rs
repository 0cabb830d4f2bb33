//! Strictly Tic-Tac-Toe AI - a human vs. language-model tic-tac-toe engine
//!
//! # Architecture
//!
//! - **Games**: board, positions, and the pure win/draw/legality rules
//! - **Stats**: persisted win/loss/draw counters over pluggable key-value storage
//! - **Policy**: the AI's move source (LLM-backed or random), always sanitized
//! - **Engine**: turn sequencing with generation-tagged AI requests
//! - **Orchestrator**: runs AI requests as tokio tasks and feeds answers back
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use strictly_tictactoe_ai::{
//!     Difficulty, GameEngine, MemoryStorage, Orchestrator, RandomPolicy, StatsStore,
//! };
//!
//! # async fn example() {
//! let engine = GameEngine::new(StatsStore::new(MemoryStorage::new()), Difficulty::Medium);
//! let mut game = Orchestrator::new(engine, Arc::new(RandomPolicy::new()), Duration::ZERO);
//! game.click_square(4);
//! game.settle().await;
//! println!("{}", game.engine().status_message());
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod app_config;
mod engine;
mod games;
mod llm_client;
mod orchestrator;
mod policy;
mod stats;

// Crate-level exports - Configuration
pub use app_config::{AppConfig, ConfigError, DEFAULT_CONFIG_FILE, StorageConfig};

// Crate-level exports - Game engine
pub use engine::{AiMoveOutcome, GameEngine, GameSummary, MoveRequest, MoveResolution};
pub use orchestrator::{EngineEvent, Orchestrator};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider, TextGenerator};

// Crate-level exports - Move policies
pub use policy::{
    LlmPolicy, MovePolicy, Proposal, RandomPolicy, USER_MESSAGE, parse_move, random_legal_move,
    sanitize, system_instruction, temperature,
};

// Crate-level exports - Stats
pub use stats::{
    GameOutcome, GameStats, JsonFileStorage, KeyValueStorage, MemoryStorage, STATS_STORAGE_KEY,
    SqliteStorage, StatsError, StatsStore,
};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    Board, BoardParseError, Difficulty, GameStatus, Player, Position, Square, Win, WinLine,
    check_winner, evaluate, is_draw, is_full, is_legal_move,
};
