use log::debug;
use serde::Serialize;

use crate::config::SocialConfig;
use crate::models::key::ProjectKey;
use crate::store::KvStore;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReactionState {
    pub liked: bool,
    /// Not clamped: toggles from several buttons bound to one project can push it below zero.
    pub count: i64,
}

/// Like flag and like count per project, stored as two separate entries.
pub struct ReactionRepository<'a> {
    store: &'a dyn KvStore,
    config: &'a SocialConfig,
}

impl<'a> ReactionRepository<'a> {
    pub fn new(store: &'a dyn KvStore, config: &'a SocialConfig) -> Self {
        ReactionRepository { store, config }
    }

    pub fn read(&self, key: &ProjectKey) -> ReactionState {
        let prefix = &self.config.keys.prefix;
        let liked = self.store.kv_get(&key.like_status_key(prefix)).as_deref() == Some("true");
        let count = self.store.kv_get_i64(&key.like_count_key(prefix));
        ReactionState { liked, count }
    }

    /// Current state ahead of a rewrite; a backend read failure is an error.
    fn read_for_update(&self, key: &ProjectKey) -> Result<ReactionState, String> {
        let prefix = &self.config.keys.prefix;
        let status = self.store.kv_try_get(&key.like_status_key(prefix))?;
        let count = self
            .store
            .kv_try_get(&key.like_count_key(prefix))?
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);
        Ok(ReactionState {
            liked: status.as_deref() == Some("true"),
            count,
        })
    }

    /// Flip the like flag, moving the count by one in the same direction.
    pub fn toggle(&self, key: &ProjectKey) -> Result<ReactionState, String> {
        let prefix = &self.config.keys.prefix;
        let current = self.read_for_update(key)?;
        let next = if current.liked {
            ReactionState {
                liked: false,
                count: current.count.saturating_sub(1),
            }
        } else {
            ReactionState {
                liked: true,
                count: current.count.saturating_add(1),
            }
        };

        self.store.kv_set(
            &key.like_status_key(prefix),
            if next.liked { "true" } else { "false" },
        )?;
        self.store
            .kv_set(&key.like_count_key(prefix), &next.count.to_string())?;
        debug!("Like toggled on {}: {:?}", key, next);
        Ok(next)
    }
}
