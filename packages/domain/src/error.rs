//! Structural errors for scripts and assembled audio.
use thiserror::Error;

use crate::speaker::Speaker;

/// A script that cannot be fact-checked or fitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// No turns at all.
    #[error("script has no turns")]
    Empty,
    /// A turn with no spoken text.
    #[error("turn {index} is blank")]
    EmptyTurn { index: usize },
    /// Two adjacent turns by the same role.
    #[error("turn {index} repeats the {speaker} without a reply")]
    NotAlternating { index: usize, speaker: Speaker },
    /// One of the two roles never speaks.
    #[error("the {0} never speaks")]
    MissingSpeaker(Speaker),
}

/// Failure while joining synthesized audio.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("sample rate mismatch: expected {expected} Hz, got {found} Hz")]
    SampleRateMismatch { expected: u32, found: u32 },
}
