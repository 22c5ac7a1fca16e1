//! Likes and comments for portfolio project cards, persisted in a
//! synchronous key/value store (in-memory, SQLite or MongoDB).
//!
//! Each project is addressed by a [`ProjectKey`] derived from its title.
//! [`CommentRepository`] keeps the ordered comment list, [`ReactionRepository`]
//! keeps the like flag and count.

pub mod config;
pub mod db;
pub mod models;
pub mod moderation;
pub mod store;


pub use config::SocialConfig;
pub use models::comment::{
    display_handle, relative_time, CommentRecord, CommentRepository, SubmitError,
};
pub use models::key::ProjectKey;
pub use models::project::ProjectSocial;
pub use models::reaction::{ReactionRepository, ReactionState};
pub use moderation::Rejection;
pub use store::KvStore;
