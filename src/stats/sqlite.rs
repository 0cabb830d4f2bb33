//! SQLite-backed key-value storage.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::stats::storage::KeyValueStorage;
use crate::stats::{KvEntry, StatsError, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Key-value storage in a single SQLite table.
///
/// Use `":memory:"` only for throwaway stores: every operation opens a fresh
/// connection, so an in-memory database does not survive between calls.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db_path: String,
}

impl SqliteStorage {
    /// Opens the database at `db_path`, creating it and applying pending
    /// migrations as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, StatsError> {
        info!(path = %db_path, "Opening SqliteStorage");
        let storage = Self { db_path };
        let mut conn = storage.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StatsError::new(format!("Failed to run migrations: {}", e)))?;
        debug!(count = applied.len(), "Migrations applied");
        Ok(storage)
    }

    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StatsError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| StatsError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }
}

impl KeyValueStorage for SqliteStorage {
    #[instrument(skip(self))]
    fn read(&self, key: &str) -> Result<Option<String>, StatsError> {
        let mut conn = self.connection()?;
        let value = schema::kv_store::table
            .filter(schema::kv_store::key.eq(key))
            .select(schema::kv_store::value)
            .first::<String>(&mut conn)
            .optional()?;
        debug!(found = value.is_some(), "Record lookup");
        Ok(value)
    }

    #[instrument(skip(self, value))]
    fn write(&self, key: &str, value: &str) -> Result<(), StatsError> {
        let mut conn = self.connection()?;
        let entry = KvEntry::new(key.to_string(), value.to_string());
        diesel::replace_into(schema::kv_store::table)
            .values(&entry)
            .execute(&mut conn)?;
        debug!("Record written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_round_trip_and_overwrite() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let storage = SqliteStorage::open(path.clone()).unwrap();

        assert_eq!(storage.read("stats").unwrap(), None);
        storage.write("stats", "one").unwrap();
        storage.write("stats", "two").unwrap();
        assert_eq!(storage.read("stats").unwrap(), Some("two".to_string()));

        // Re-opening runs no migrations and sees the same data.
        let reopened = SqliteStorage::open(path).unwrap();
        assert_eq!(reopened.read("stats").unwrap(), Some("two".to_string()));
    }
}
