use serde::Serialize;

use crate::config::SocialConfig;
use crate::models::comment::CommentRepository;
use crate::models::key::ProjectKey;
use crate::models::reaction::{ReactionRepository, ReactionState};
use crate::store::KvStore;

/// Persisted counters for one project card, restored when the page loads.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ProjectSocial {
    pub key: ProjectKey,
    pub comment_count: usize,
    pub reaction: ReactionState,
}

impl ProjectSocial {
    pub fn for_title(store: &dyn KvStore, config: &SocialConfig, title: &str) -> Self {
        let key = ProjectKey::derive(title);
        let comment_count = CommentRepository::new(store, config).count(&key);
        let reaction = ReactionRepository::new(store, config).read(&key);
        ProjectSocial {
            key,
            comment_count,
            reaction,
        }
    }

    /// Summaries for every card title on the page, in the given order.
    pub fn for_titles<'t>(
        store: &dyn KvStore,
        config: &SocialConfig,
        titles: impl IntoIterator<Item = &'t str>,
    ) -> Vec<Self> {
        titles
            .into_iter()
            .map(|t| Self::for_title(store, config, t))
            .collect()
    }
}
