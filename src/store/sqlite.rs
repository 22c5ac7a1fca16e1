use rusqlite::{params, OptionalExtension};

use crate::db::DbPool;

use super::KvStore;

/// SQLite-backed implementation of the KvStore trait.
/// Wraps an r2d2 connection pool over the `kv` table.
pub struct SqliteStore {
    pub pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Result<Self, String> {
        crate::db::run_migrations(&pool)?;
        Ok(Self { pool })
    }

    pub fn new_at(path: &str) -> Result<Self, String> {
        let pool = crate::db::init_pool_at(path)?;
        Self::new(pool)
    }

    pub fn in_memory() -> Result<Self, String> {
        let pool = crate::db::init_memory_pool()?;
        Self::new(pool)
    }
}

impl KvStore for SqliteStore {
    fn kv_try_get(&self, key: &str) -> Result<Option<String>, String> {
        let conn = self.pool.get().map_err(|e| e.to_string())?;
        conn.query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| e.to_string())
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), String> {
        let conn = self.pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    fn backend(&self) -> &str {
        "sqlite"
    }
}
