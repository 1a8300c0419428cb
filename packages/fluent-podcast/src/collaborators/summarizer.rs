//! Chunked article summarization on top of a chat model.

use std::sync::Arc;

use async_trait::async_trait;

use super::{ChatCompletion, ChatMessage, Summarizer};
use crate::error::CollaboratorError;
use crate::segmenter::Segmenter;

const SYSTEM_PROMPT: &str = "You summarize research articles for a science podcast. \
Keep every concrete finding, number and named entity exactly as stated. \
Do not add information that is not in the text.";

/// Map-reduce summarizer.
///
/// Long articles are split at sentence boundaries into chunks, each chunk is
/// summarized on its own, and the partial summaries are refined into one
/// when together they exceed the word budget.
pub struct LlmSummarizer {
    chat: Arc<dyn ChatCompletion>,
    segmenter: Segmenter,
    chunk_words: usize,
}

impl LlmSummarizer {
    pub fn new(chat: Arc<dyn ChatCompletion>, segmenter: Segmenter, chunk_words: usize) -> Self {
        Self {
            chat,
            segmenter,
            chunk_words: chunk_words.max(1),
        }
    }

    /// Sentence-aligned chunks of at most `chunk_words` words.
    ///
    /// A single sentence longer than the limit becomes its own chunk.
    pub fn chunks(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut words = 0;
        for sentence in self.segmenter.segment(text) {
            let n = sentence.split_whitespace().count();
            if !current.is_empty() && words + n > self.chunk_words {
                chunks.push(current.join(" "));
                current.clear();
                words = 0;
            }
            current.push(sentence);
            words += n;
        }
        if !current.is_empty() {
            chunks.push(current.join(" "));
        }
        chunks
    }

    async fn summarize_once(&self, text: &str, max_words: usize) -> Result<String, CollaboratorError> {
        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "Summarize the following text in at most {max_words} words.\n\n{text}"
            )),
        ];
        self.chat.complete(&messages).await
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, text: &str, max_words: usize) -> Result<String, CollaboratorError> {
        let chunks = self.chunks(text);
        match chunks.len() {
            0 => Err(CollaboratorError::Rejected("article is empty".to_string())),
            1 => self.summarize_once(&chunks[0], max_words).await,
            n => {
                let per_chunk = (max_words / n).min(max_words / 2).max(1);
                let mut partials = Vec::with_capacity(n);
                for (i, chunk) in chunks.iter().enumerate() {
                    tracing::debug!(chunk = i + 1, of = n, "summarizing chunk");
                    partials.push(self.summarize_once(chunk, per_chunk).await?);
                }
                let joined = partials.join("\n\n");
                if joined.split_whitespace().count() > max_words {
                    tracing::debug!(chunks = n, "refining joined summary");
                    self.summarize_once(&joined, max_words).await
                } else {
                    Ok(joined)
                }
            }
        }
    }
}
