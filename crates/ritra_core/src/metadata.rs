//! Structural book metadata derived from narrative text.

use serde::{Deserialize, Serialize};

/// Title and author extracted by the metadata unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    /// Book title
    pub title: Option<String>,
    /// Book author
    pub author: Option<String>,
}

impl BookMetadata {
    /// Parses a `title=<..>&author=<..>` answer.
    ///
    /// Underscores become spaces. Surrounding prose or code fences are tolerated
    /// as long as the pairs appear on one line. Returns `None` when neither field
    /// is present.
    ///
    /// # Examples
    ///
    /// ```
    /// use ritra_core::BookMetadata;
    ///
    /// let meta = BookMetadata::parse("title=The_Hobbit&author=J._R._R._Tolkien").unwrap();
    /// assert_eq!(meta.title.as_deref(), Some("The Hobbit"));
    /// assert_eq!(meta.author.as_deref(), Some("J. R. R. Tolkien"));
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let line = raw.lines().find(|line| line.contains("title=") || line.contains("author="))?;
        let mut meta = BookMetadata::default();
        for pair in line.trim().trim_matches('`').split('&') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let value = value.replace('_', " ").trim().to_string();
            if value.is_empty() {
                continue;
            }
            match name.trim() {
                "title" => meta.title = Some(value),
                "author" => meta.author = Some(value),
                _ => {}
            }
        }
        (meta.title.is_some() || meta.author.is_some()).then_some(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_surrounding_prose() {
        let meta = BookMetadata::parse("Sure!\ntitle=Dune&author=Frank_Herbert\n").unwrap();
        assert_eq!(meta.title.as_deref(), Some("Dune"));
        assert_eq!(meta.author.as_deref(), Some("Frank Herbert"));
    }

    #[test]
    fn test_parse_partial_pair() {
        let meta = BookMetadata::parse("title=Emma&author=").unwrap();
        assert_eq!(meta.title.as_deref(), Some("Emma"));
        assert!(meta.author.is_none());
    }

    #[test]
    fn test_parse_rejects_unrelated_text() {
        assert!(BookMetadata::parse("I could not determine the book.").is_none());
    }
}
