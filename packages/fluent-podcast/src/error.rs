//! Error types for the podcast pipeline.
//!
//! Every failure that aborts a run is a [`PodcastError`] naming the pipeline
//! [`Stage`] it happened in plus the underlying cause, so callers can decide
//! whether to retry or alert without string matching.

use std::path::PathBuf;
use std::time::Duration;

use fluent_podcast_domain::{AudioError, ScriptError};
use thiserror::Error;

/// Pipeline stage, used to tag errors and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Stage {
    #[display("analysis")]
    Analysis,
    #[display("composition")]
    Composition,
    #[display("verification")]
    Verification,
    #[display("fitting")]
    Fitting,
    #[display("audio production")]
    AudioProduction,
}

/// Main error type for a pipeline run.
#[derive(Error, Debug)]
pub enum PodcastError {
    #[error("similarity scoring unavailable during {stage}: {cause}")]
    ScoringUnavailable { stage: Stage, cause: ScoringError },

    #[error("summarizer unavailable: {cause}")]
    SummarizationUnavailable { cause: CollaboratorError },

    #[error("script generator unavailable: {cause}")]
    GenerationUnavailable { cause: CollaboratorError },

    #[error("speech synthesizer unavailable: {cause}")]
    SynthesisUnavailable { cause: CollaboratorError },

    #[error("malformed script: {0}")]
    MalformedScript(#[from] ScriptError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("audio assembly failed: {0}")]
    Audio(String),
}

impl PodcastError {
    /// Stage the failure belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            PodcastError::ScoringUnavailable { stage, .. } => *stage,
            PodcastError::SummarizationUnavailable { .. } => Stage::Analysis,
            PodcastError::GenerationUnavailable { .. } | PodcastError::MalformedScript(_) => {
                Stage::Composition
            }
            PodcastError::SynthesisUnavailable { .. }
            | PodcastError::Io { .. }
            | PodcastError::Audio(_) => Stage::AudioProduction,
            PodcastError::Config(_) => Stage::Analysis,
        }
    }
}

impl From<AudioError> for PodcastError {
    fn from(err: AudioError) -> Self {
        PodcastError::Audio(err.to_string())
    }
}

/// Failure reported by a [`SimilarityScorer`](crate::scoring::SimilarityScorer).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("scorer unavailable: {0}")]
    Unavailable(String),

    #[error("scorer backend error: {0}")]
    Backend(String),

    #[error("scorer returned {got} scores for {expected} candidates")]
    Malformed { expected: usize, got: usize },
}

/// Failure reported by a remote collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    /// Network hiccup, rate limit or server error. Worth retrying.
    #[error("transient failure: {0}")]
    Transient(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The request itself was refused or the reply was unusable.
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

impl CollaboratorError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CollaboratorError::Transient(_) | CollaboratorError::Timeout(_)
        )
    }
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CollaboratorError::Transient(format!("request timed out: {err}"))
        } else if err.is_decode() {
            CollaboratorError::Rejected(format!("undecodable response: {err}"))
        } else {
            CollaboratorError::Transient(err.to_string())
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid exemption pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("missing credential {0}")]
    MissingCredential(&'static str),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = PodcastError> = std::result::Result<T, E>;
