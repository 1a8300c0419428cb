//! Decisions produced when fitting a script to its duration window.
use serde::Serialize;

use crate::duration::DurationEstimate;
use crate::pacing::PacingFactor;
use crate::script::Script;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum RegenerationReason {
    #[display("too long")]
    TooLong,
    #[display("too short")]
    TooShort,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, derive_more::Display)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum FittingDecision {
    #[display("accept")]
    Accept,
    #[display("truncate (kept {kept_turns}, dropped {dropped_turns})")]
    Truncate {
        kept_turns: usize,
        dropped_turns: usize,
    },
    #[display("accept with pacing {factor}")]
    AcceptWithPacing { factor: PacingFactor },
    #[display("request regeneration ({reason})")]
    RequestRegeneration { reason: RegenerationReason },
}

impl FittingDecision {
    pub fn needs_regeneration(&self) -> bool {
        matches!(self, FittingDecision::RequestRegeneration { .. })
    }
}

/// Script as fitted, with the estimate it was judged on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitOutcome {
    pub decision: FittingDecision,
    pub script: Script,
    /// Unpaced estimate of `script`.
    pub estimate: DurationEstimate,
    /// Neutral unless pacing was applied.
    pub pacing: PacingFactor,
}

impl FitOutcome {
    /// Estimated duration once pacing is applied.
    pub fn paced_seconds(&self) -> f64 {
        self.estimate.seconds * self.pacing.value()
    }
}
