//! Persisted game statistics.

mod error;
mod models;
mod schema; // Diesel generated schema - internal use only
mod sqlite;
mod storage;
mod store;

pub use error::StatsError;
pub use models::{GameOutcome, GameStats};
pub(crate) use models::KvEntry;
pub use sqlite::SqliteStorage;
pub use storage::{JsonFileStorage, KeyValueStorage, MemoryStorage};
pub use store::{STATS_STORAGE_KEY, StatsStore};
