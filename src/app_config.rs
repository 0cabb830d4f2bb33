//! Application configuration loaded from `tictactoe.toml`.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::games::tictactoe::Difficulty;
use crate::llm_client::{LlmConfig, LlmProvider};
use crate::stats::{JsonFileStorage, MemoryStorage, STATS_STORAGE_KEY, SqliteStorage, StatsStore};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "tictactoe.toml";

/// Where the stats record is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// One JSON file per record in `dir`.
    File {
        /// Directory holding the record files.
        dir: PathBuf,
    },
    /// SQLite database at `path`.
    Sqlite {
        /// Database file path.
        path: String,
    },
    /// Process memory; nothing survives exit.
    Memory,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::File {
            dir: PathBuf::from(".tictactoe"),
        }
    }
}

/// Top-level configuration. Every field has a default, so an empty file
/// (or no file) is valid.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM provider (gemini, openai or anthropic).
    #[serde(default)]
    llm_provider: LlmProvider,

    /// LLM model name; empty means the provider default.
    #[serde(default)]
    llm_model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// Starting difficulty.
    #[serde(default)]
    difficulty: Difficulty,

    /// Minimum delay before each AI request, in milliseconds.
    #[serde(default = "default_think_delay_ms")]
    think_delay_ms: u64,

    /// Stats persistence backend.
    #[serde(default)]
    storage: StorageConfig,

    /// Key of the stats record.
    #[serde(default = "default_stats_key")]
    stats_key: String,
}

fn default_max_tokens() -> u32 {
    150
}

fn default_think_delay_ms() -> u64 {
    500
}

fn default_stats_key() -> String {
    STATS_STORAGE_KEY.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm_provider: LlmProvider::default(),
            llm_model: String::new(),
            llm_max_tokens: default_max_tokens(),
            difficulty: Difficulty::default(),
            think_delay_ms: default_think_delay_ms(),
            storage: StorageConfig::default(),
            stats_key: default_stats_key(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(provider = %config.llm_provider, storage = ?config.storage, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed TOML or unknown values.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but is invalid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Overrides the starting difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Overrides the think delay.
    pub fn with_think_delay_ms(mut self, think_delay_ms: u64) -> Self {
        self.think_delay_ms = think_delay_ms;
        self
    }

    /// Overrides the storage backend.
    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }

    /// Overrides the LLM provider.
    pub fn with_llm_provider(mut self, provider: LlmProvider) -> Self {
        self.llm_provider = provider;
        self
    }

    /// Overrides the LLM model.
    pub fn with_llm_model(mut self, model: impl Into<String>) -> Self {
        self.llm_model = model.into();
        self
    }

    /// Think delay as a [`Duration`].
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }

    /// Configured model, or the provider's default when unset.
    pub fn effective_model(&self) -> &str {
        if self.llm_model.is_empty() {
            self.llm_provider.default_model()
        } else {
            &self.llm_model
        }
    }

    /// Creates LLM configuration using API keys from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if no API key variable for the provider is set.
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        self.create_llm_config_with(|name| std::env::var(name).ok())
    }

    /// Creates LLM configuration, resolving API keys through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `lookup` yields no non-empty key.
    #[instrument(skip(self, lookup), fields(provider = ?self.llm_provider))]
    pub fn create_llm_config_with<F>(&self, lookup: F) -> Result<LlmConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = self.llm_provider.api_key_vars();
        let api_key = vars
            .iter()
            .find_map(|var| lookup(var).filter(|key| !key.trim().is_empty()))
            .ok_or_else(|| {
                ConfigError::new(format!(
                    "{} environment variable not set",
                    vars.join(" or ")
                ))
            })?;

        debug!(model = %self.effective_model(), "Creating LLM config");
        Ok(LlmConfig::new(
            self.llm_provider,
            api_key,
            self.effective_model().to_string(),
            self.llm_max_tokens,
        ))
    }

    /// Opens the stats store for the configured backend.
    ///
    /// An SQLite database that cannot be opened degrades to in-memory
    /// storage, so stats still work for the session.
    #[instrument(skip(self), fields(storage = ?self.storage))]
    pub fn open_stats_store(&self) -> StatsStore {
        let store = match &self.storage {
            StorageConfig::File { dir } => StatsStore::new(JsonFileStorage::new(dir)),
            StorageConfig::Sqlite { path } => match SqliteStorage::open(path.clone()) {
                Ok(storage) => StatsStore::new(storage),
                Err(e) => {
                    warn!(error = %e, "Falling back to in-memory stats storage");
                    StatsStore::new(MemoryStorage::new())
                }
            },
            StorageConfig::Memory => StatsStore::new(MemoryStorage::new()),
        };
        store.with_key(self.stats_key.clone())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
