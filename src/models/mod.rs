pub mod comment;
pub mod key;
pub mod project;
pub mod reaction;
