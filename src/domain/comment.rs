//! Comment Entity
//!
//! A free-text note attached to one character. Threads are append-only
//! and insertion-ordered; deletion by id is allowed, edits are not.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A comment on a character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique token
    pub id: String,
    /// Body text; never blank (validated at creation)
    pub text: String,
    /// Creation instant
    pub timestamp: DateTime<Utc>,
}

impl Comment {
    /// Build a comment with a fresh id and the current instant.
    ///
    /// Returns `None` when the text is empty after trimming; blank
    /// comments are rejected as a silent no-op, not an error.
    pub fn new(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_rejected() {
        assert!(Comment::new("").is_none());
        assert!(Comment::new("   ").is_none());
        assert!(Comment::new("\n\t").is_none());
    }

    #[test]
    fn test_text_kept_verbatim() {
        let comment = Comment::new("  hello  ").expect("non-blank");
        assert_eq!(comment.text, "  hello  ");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Comment::new("a").expect("non-blank");
        let b = Comment::new("a").expect("non-blank");
        assert_ne!(a.id, b.id);
    }
}
