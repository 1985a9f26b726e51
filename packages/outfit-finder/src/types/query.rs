//! The user's style request.

use crate::error::{FinderError, Result};

/// Longest request forwarded to the model, in characters.
pub const MAX_QUERY_CHARS: usize = 300;

/// A free-text style description, e.g. "smart casual for a summer wedding".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleQuery {
    text: String,
    key: String,
}

impl StyleQuery {
    /// Trim, collapse whitespace and cap length. Empty input is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            return Err(FinderError::EmptyQuery);
        }

        let text: String = collapsed.chars().take(MAX_QUERY_CHARS).collect();
        let key = text.to_lowercase();
        Ok(Self { text, key })
    }

    /// Text as the user wrote it (normalized whitespace).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lowercase form used for catalog lookup.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Display for StyleQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
