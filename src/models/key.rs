use std::fmt;

use serde::Serialize;

/// Storage namespace for one project, derived from its display title by
/// keeping only ASCII letters and digits. Titles that strip to the same
/// form share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProjectKey(String);

impl ProjectKey {
    pub fn derive(title: &str) -> Self {
        ProjectKey(title.chars().filter(|c| c.is_ascii_alphanumeric()).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn comments_key(&self, prefix: &str) -> String {
        format!("{}_real_comments_{}", prefix, self.0)
    }

    pub fn like_status_key(&self, prefix: &str) -> String {
        format!("{}_like_status_{}", prefix, self.0)
    }

    pub fn like_count_key(&self, prefix: &str) -> String {
        format!("{}_like_count_{}", prefix, self.0)
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_everything_but_ascii_alphanumerics() {
        assert_eq!(ProjectKey::derive("E-Commerce App (v2)!").as_str(), "ECommerceAppv2");
        assert_eq!(ProjectKey::derive("Café Menü").as_str(), "CafMen");
        assert_eq!(ProjectKey::derive("  tabs\tand\nnewlines ").as_str(), "tabsandnewlines");
    }

    #[test]
    fn deterministic() {
        let a = ProjectKey::derive("Weather Dashboard");
        let b = ProjectKey::derive("Weather Dashboard");
        assert_eq!(a, b);
    }

    #[test]
    fn blank_title_gives_empty_key() {
        assert!(ProjectKey::derive("").is_empty());
        assert!(ProjectKey::derive("  --  ").is_empty());
        assert_eq!(
            ProjectKey::derive("").comments_key("portfolio"),
            "portfolio_real_comments_"
        );
    }

    #[test]
    fn colliding_titles_share_a_key() {
        assert_eq!(ProjectKey::derive("To-Do App"), ProjectKey::derive("ToDo App"));
    }

    #[test]
    fn storage_key_layout() {
        let k = ProjectKey::derive("Chat App");
        assert_eq!(k.comments_key("portfolio"), "portfolio_real_comments_ChatApp");
        assert_eq!(k.like_status_key("portfolio"), "portfolio_like_status_ChatApp");
        assert_eq!(k.like_count_key("portfolio"), "portfolio_like_count_ChatApp");
    }

    #[test]
    fn output_never_contains_non_alphanumerics() {
        let titles = ["a b", "ü/ß", "x_y-z", "🚀 Launch", "100%", ""];
        for t in titles {
            let k = ProjectKey::derive(t);
            assert!(k.as_str().chars().all(|c| c.is_ascii_alphanumeric()), "{}", t);
        }
    }
}
