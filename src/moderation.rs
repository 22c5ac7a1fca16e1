use std::fmt;

/// Why a comment submission was turned away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NameRequired,
    /// Blank body. The page drops these without showing a message.
    EmptyText,
    Disrespectful,
}

impl Rejection {
    /// Inline message for the comment form, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Rejection::NameRequired => Some("Please enter your name."),
            Rejection::EmptyText => None,
            Rejection::Disrespectful => Some("Please keep the language respectful."),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(m) => f.write_str(m),
            None => f.write_str("Comment text is empty"),
        }
    }
}

impl std::error::Error for Rejection {}

/// True if `s` contains any blocklisted word, ignoring case.
pub fn contains_blocked(s: &str, blocklist: &[String]) -> bool {
    let lower = s.to_lowercase();
    blocklist
        .iter()
        .filter(|w| !w.is_empty())
        .any(|w| lower.contains(&w.to_lowercase()))
}

/// Validate a name/body pair. Both are trimmed first. The name check runs
/// before anything else, so an empty name is rejected whatever the text says.
pub fn check_submission(name: &str, text: &str, blocklist: &[String]) -> Result<(), Rejection> {
    let name = name.trim();
    let text = text.trim();

    if name.is_empty() {
        return Err(Rejection::NameRequired);
    }
    if text.is_empty() {
        return Err(Rejection::EmptyText);
    }
    if contains_blocked(text, blocklist) || contains_blocked(name, blocklist) {
        return Err(Rejection::Disrespectful);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BLOCKLIST;

    fn blocklist() -> Vec<String> {
        DEFAULT_BLOCKLIST.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn clean_submission_passes() {
        assert_eq!(check_submission("Kevin", "Great work!", &blocklist()), Ok(()));
    }

    #[test]
    fn blocked_word_in_text() {
        assert_eq!(
            check_submission("Kevin", "you are stupid", &blocklist()),
            Err(Rejection::Disrespectful)
        );
    }

    #[test]
    fn blocked_word_in_name() {
        assert_eq!(
            check_submission("Idiot McGee", "nice", &blocklist()),
            Err(Rejection::Disrespectful)
        );
    }

    #[test]
    fn match_is_case_insensitive_substring() {
        assert!(contains_blocked("This SUCKS", &blocklist()));
        // Substring match also catches innocent words
        assert!(contains_blocked("Hello there", &blocklist()));
        assert!(!contains_blocked("Lovely design", &blocklist()));
    }

    #[test]
    fn empty_name_rejected_regardless_of_text() {
        assert_eq!(check_submission("", "hi", &blocklist()), Err(Rejection::NameRequired));
        assert_eq!(check_submission("   ", "", &blocklist()), Err(Rejection::NameRequired));
        assert_eq!(
            check_submission("", "you are stupid", &blocklist()),
            Err(Rejection::NameRequired)
        );
    }

    #[test]
    fn empty_text_rejected_without_message() {
        let r = check_submission("Kevin", "  \n ", &blocklist()).unwrap_err();
        assert_eq!(r, Rejection::EmptyText);
        assert!(r.message().is_none());
    }

    #[test]
    fn messages() {
        assert_eq!(Rejection::NameRequired.to_string(), "Please enter your name.");
        assert_eq!(
            Rejection::Disrespectful.to_string(),
            "Please keep the language respectful."
        );
    }

    #[test]
    fn empty_blocklist_entries_ignored() {
        let list = vec![String::new()];
        assert!(!contains_blocked("anything", &list));
    }
}
