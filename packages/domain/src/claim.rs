//! Checkable statements extracted from a script.
use serde::{Deserialize, Serialize};

/// One sentence-level statement from a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub text: String,
    /// Index of the turn this claim was taken from.
    pub turn_index: usize,
    /// Position among all claims of the script.
    pub ordinal: usize,
}

impl Claim {
    pub fn new(text: impl Into<String>, turn_index: usize, ordinal: usize) -> Self {
        Self {
            text: text.into(),
            turn_index,
            ordinal,
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
