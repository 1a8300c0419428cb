//! One speaker's contiguous utterance.
use serde::{Deserialize, Serialize};

use crate::speaker::Speaker;

/// A validated turn inside a [`Script`](crate::Script).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    /// Position in the owning script.
    pub index: usize,
}

impl Turn {
    /// Whitespace-delimited word count.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Unvalidated turn as produced by a script generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl DraftTurn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}
