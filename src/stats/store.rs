//! Load/save/reset of the persisted stats record.

use tracing::{debug, info, instrument, warn};

use crate::stats::storage::KeyValueStorage;
use crate::stats::{GameStats, StatsError};

/// Storage key of the stats record.
pub const STATS_STORAGE_KEY: &str = "tic-tac-toe-stats";

/// Stats persistence over any [`KeyValueStorage`].
///
/// Reads never fail: a missing, unreadable, or corrupt record loads as zero.
/// Writes report failure so the caller can log it; the caller's in-memory
/// value stays authoritative.
#[derive(Debug)]
pub struct StatsStore {
    storage: Box<dyn KeyValueStorage>,
    key: String,
}

impl StatsStore {
    /// Creates a store writing under [`STATS_STORAGE_KEY`].
    #[instrument(skip(storage), fields(storage = ?storage))]
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        info!("Creating StatsStore");
        Self {
            storage: Box::new(storage),
            key: STATS_STORAGE_KEY.to_string(),
        }
    }

    /// Uses a different record key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Record key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the persisted stats, falling back to zero.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn load(&self) -> GameStats {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stats recorded yet");
                return GameStats::default();
            }
            Err(e) => {
                warn!(error = %e, "Could not read stats, starting from zero");
                return GameStats::default();
            }
        };

        match serde_json::from_str::<GameStats>(&raw) {
            Ok(stats) if stats.is_consistent() => {
                info!(played = stats.played(), wins = stats.wins(), "Stats loaded");
                stats
            }
            Ok(stats) => {
                warn!(?stats, "Stored stats are inconsistent, starting from zero");
                GameStats::default()
            }
            Err(e) => {
                warn!(error = %e, "Could not parse stats, starting from zero");
                GameStats::default()
            }
        }
    }

    /// Overwrites the persisted record with `stats`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if serialization or the write fails.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn save(&self, stats: &GameStats) -> Result<(), StatsError> {
        let json = serde_json::to_string(stats)?;
        self.storage.write(&self.key, &json)?;
        debug!("Stats saved");
        Ok(())
    }

    /// Persists and returns the zero record. A failed write is logged.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn reset(&self) -> GameStats {
        let zero = GameStats::default();
        if let Err(e) = self.save(&zero) {
            warn!(error = %e, "Could not persist stats reset");
        }
        info!("Stats reset");
        zero
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::MemoryStorage;

    #[test]
    fn test_load_missing_is_zero() {
        let store = StatsStore::new(MemoryStorage::new());
        assert_eq!(store.load(), GameStats::default());
    }

    #[test]
    fn test_load_corrupt_is_zero() {
        let storage = MemoryStorage::new();
        storage.write(STATS_STORAGE_KEY, "{not json").unwrap();
        let store = StatsStore::new(storage.clone());
        assert_eq!(store.load(), GameStats::default());

        storage
            .write(STATS_STORAGE_KEY, r#"{"played":-1,"wins":0,"losses":0,"draws":0}"#)
            .unwrap();
        assert_eq!(store.load(), GameStats::default());
    }

    #[test]
    fn test_load_inconsistent_is_zero() {
        let storage = MemoryStorage::new();
        storage
            .write(STATS_STORAGE_KEY, r#"{"played":5,"wins":1,"losses":0,"draws":0}"#)
            .unwrap();
        assert_eq!(StatsStore::new(storage).load(), GameStats::default());
    }

    #[test]
    fn test_save_then_load() {
        let store = StatsStore::new(MemoryStorage::new());
        let stats = GameStats::new(3, 2, 1, 0);
        store.save(&stats).unwrap();
        assert_eq!(store.load(), stats);
    }

    #[test]
    fn test_reset_persists_zero() {
        let store = StatsStore::new(MemoryStorage::new()).with_key("custom");
        store.save(&GameStats::new(1, 1, 0, 0)).unwrap();
        assert_eq!(store.reset(), GameStats::default());
        assert_eq!(store.load(), GameStats::default());
    }
}
