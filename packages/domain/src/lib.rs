//! # Fluent Podcast Domain
//!
//! Shared domain objects for the fluent-podcast pipeline.
//!
//! These are the value types that flow between the verification and
//! duration-fitting core, the collaborator clients and the CLI. Keeping them
//! here lets the collaborator traits depend on plain data without pulling in
//! the scorers or HTTP stack.

pub mod audio_segment;
pub mod claim;
pub mod duration;
pub mod error;
pub mod evidence;
pub mod fitting;
pub mod pacing;
pub mod script;
pub mod similarity;
pub mod speaker;
pub mod summary;
pub mod turn;
pub mod verification;
pub mod voice_id;

// Re-export core types
pub use audio_segment::AudioSegment;
pub use claim::Claim;
pub use duration::{DurationEstimate, DurationWindow};
pub use error::{AudioError, ScriptError};
pub use evidence::{EvidenceMatch, Verdict};
pub use fitting::{FitOutcome, FittingDecision, RegenerationReason};
pub use pacing::PacingFactor;
pub use script::{MIN_SCRIPT_TURNS, Script, draft_from_dialogue, merge_adjacent};
pub use similarity::SimilarityScore;
pub use speaker::{HostNames, Speaker};
pub use summary::Summary;
pub use turn::{DraftTurn, Turn};
pub use verification::VerificationReport;
pub use voice_id::{HostVoices, VoiceId};

/// Prelude module containing commonly used types.
pub mod prelude {
    pub use crate::{
        AudioSegment, Claim, DraftTurn, DurationEstimate, DurationWindow, EvidenceMatch,
        FitOutcome, FittingDecision, HostNames, HostVoices, PacingFactor, RegenerationReason,
        Script, ScriptError, SimilarityScore, Speaker, Summary, Turn, Verdict,
        VerificationReport, VoiceId,
    };
}
