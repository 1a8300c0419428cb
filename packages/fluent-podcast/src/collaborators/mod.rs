//! Remote services the pipeline depends on.
//!
//! The core only sees these traits. Concrete HTTP clients live in the
//! submodules and are wired up by the binary; tests substitute in-memory
//! fakes.

use async_trait::async_trait;
use fluent_podcast_domain::{AudioSegment, DraftTurn, HostNames, PacingFactor, VoiceId};

use crate::error::CollaboratorError;

pub mod composer;
pub mod elevenlabs;
pub mod openai;
pub mod retry;
pub mod summarizer;

pub use composer::LlmScriptGenerator;
pub use elevenlabs::ElevenLabsSynthesizer;
pub use openai::{ChatMessage, OpenAiChatClient};
pub use retry::RetryPolicy;
pub use summarizer::LlmSummarizer;

/// Condenses article text.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, max_words: usize) -> Result<String, CollaboratorError>;
}

/// Writes a two-host dialogue from a summary.
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    async fn compose(
        &self,
        summary: &str,
        hosts: &HostNames,
        target_words: usize,
    ) -> Result<Vec<DraftTurn>, CollaboratorError>;
}

/// Turns text into speech with a given voice.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceId,
        pacing: PacingFactor,
    ) -> Result<AudioSegment, CollaboratorError>;
}

/// Single-prompt text completion, shared by the LLM-backed collaborators.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CollaboratorError>;
}

/// Map a non-success HTTP status to a collaborator error.
pub(crate) fn status_error(status: reqwest::StatusCode, body: &str) -> CollaboratorError {
    let detail = format!("HTTP {status}: {}", body.trim());
    match status.as_u16() {
        401 | 403 => CollaboratorError::Authentication(detail),
        408 | 429 => CollaboratorError::Transient(detail),
        _ if status.is_server_error() => CollaboratorError::Transient(detail),
        _ => CollaboratorError::Rejected(detail),
    }
}
