use std::collections::HashMap;
use std::sync::Mutex;

use super::KvStore;

/// Process-local store. Used as the default backend and as the fake in tests.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryStore {
    fn kv_try_get(&self, key: &str) -> Result<Option<String>, String> {
        let map = self.entries.lock().map_err(|e| e.to_string())?;
        Ok(map.get(key).cloned())
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut map = self.entries.lock().map_err(|e| e.to_string())?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn backend(&self) -> &str {
        "memory"
    }
}
