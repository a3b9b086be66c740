//! Repository pattern for database access.

use crate::db::error::DbError;
use chrono::Utc;
use matchquiz_core::is_valid_code;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

const LANGUAGE_KEY: &str = "language";

/// Repository for persisted user preferences.
pub trait PreferenceRepository {
    fn get_preference(&self, key: &str) -> Result<Option<String>>;
    fn set_preference(&self, key: &str, value: &str) -> Result<()>;

    /// Language picked in a previous session.
    fn get_language(&self) -> Result<Option<String>> {
        match self.get_preference(LANGUAGE_KEY)? {
            Some(code) if is_valid_code(&code) => Ok(Some(code)),
            Some(code) => Err(DbError::InvalidData(format!("stored language {code:?}"))),
            None => Ok(None),
        }
    }

    fn save_language(&self, code: &str) -> Result<()> {
        if !is_valid_code(code) {
            return Err(DbError::InvalidData(format!("language {code:?}")));
        }
        self.set_preference(LANGUAGE_KEY, code)
    }
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute_batch(super::schema::INIT_SCHEMA_VERSION)?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i32> {
        let version = self
            .conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
        Ok(version)
    }
}

impl PreferenceRepository for SqliteRepository {
    fn get_preference(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::SCHEMA_VERSION;

    #[test]
    fn fresh_database_has_no_language() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert_eq!(repo.get_language().unwrap(), None);
        assert_eq!(repo.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn language_round_trip() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.save_language("en").unwrap();
        assert_eq!(repo.get_language().unwrap().as_deref(), Some("en"));

        repo.save_language("pt-BR").unwrap();
        assert_eq!(repo.get_language().unwrap().as_deref(), Some("pt-BR"));
    }

    #[test]
    fn reject_unsafe_language_code() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert!(matches!(
            repo.save_language("../en"),
            Err(DbError::InvalidData(_))
        ));
        assert_eq!(repo.get_language().unwrap(), None);
    }

    #[test]
    fn corrupted_language_is_reported() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.set_preference("language", "en us").unwrap();
        assert!(repo.get_language().is_err());
    }

    #[test]
    fn reinitializing_keeps_preferences() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.set_preference("theme", "dark").unwrap();
        repo.initialize().unwrap();
        assert_eq!(repo.get_preference("theme").unwrap().as_deref(), Some("dark"));
    }
}
