//! Source article with its evidence sentences.

use crate::segmenter::Segmenter;

/// Immutable article text, segmented once on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    text: String,
    sentences: Vec<String>,
}

impl Article {
    pub fn new(text: impl Into<String>, segmenter: &Segmenter) -> Self {
        let text = text.into();
        let sentences = segmenter
            .segment(&text)
            .into_iter()
            .map(String::from)
            .collect();
        Self { text, sentences }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// No evidence sentences to check claims against.
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}
