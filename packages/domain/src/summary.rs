//! Condensed article text handed to the script generator.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
    /// Length of the source article in characters.
    pub article_chars: usize,
}

impl Summary {
    pub fn new(text: impl Into<String>, article_chars: usize) -> Self {
        Self {
            text: text.into(),
            article_chars,
        }
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
