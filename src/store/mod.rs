use std::sync::Arc;

use log::info;

use crate::config::SocialConfig;

pub mod memory;
pub mod mongo;
pub mod sqlite;

/// Synchronous string key/value capability. Every persisted comment list,
/// like flag and like count goes through here.
/// Implementations: `MemoryStore`, `SqliteStore` (rusqlite/r2d2) and `MongoStore` (mongodb).
pub trait KvStore: Send + Sync {
    /// `Ok(None)` when the key is absent, `Err` when the backend could not answer.
    /// Read-modify-write paths must use this so a failed read never looks like an empty entry.
    fn kv_try_get(&self, key: &str) -> Result<Option<String>, String>;

    /// Lenient read for display paths: backend errors read as absent.
    fn kv_get(&self, key: &str) -> Option<String> {
        self.kv_try_get(key).ok().flatten()
    }
    fn kv_get_i64(&self, key: &str) -> i64 {
        self.kv_get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }
    fn kv_set(&self, key: &str, value: &str) -> Result<(), String>;

    /// Backend name: "memory", "sqlite" or "mongodb".
    fn backend(&self) -> &str;
}

/// Build the backend named in the config.
pub fn open(config: &SocialConfig) -> Result<Arc<dyn KvStore>, String> {
    let storage = &config.storage;
    match storage.backend.as_str() {
        "mongodb" => {
            let ms = mongo::MongoStore::new(&storage.uri, &storage.database)?;
            ms.test_connection()?;
            ms.run_migrations()?;
            info!("Opened mongodb store (database {})", storage.database);
            Ok(Arc::new(ms) as Arc<dyn KvStore>)
        }
        "sqlite" => {
            let ss = sqlite::SqliteStore::new_at(&storage.path)?;
            info!("Opened sqlite store at {}", storage.path);
            Ok(Arc::new(ss) as Arc<dyn KvStore>)
        }
        "memory" => {
            info!("Opened in-memory store");
            Ok(Arc::new(memory::MemoryStore::new()) as Arc<dyn KvStore>)
        }
        other => Err(format!("Unknown storage backend: {}", other)),
    }
}
