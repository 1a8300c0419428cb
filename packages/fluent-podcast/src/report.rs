//! Run report written next to the podcast.

use std::path::{Path, PathBuf};

use fluent_podcast_domain::{
    EvidenceMatch, FitOutcome, FittingDecision, Script, Summary, Verdict, VerificationReport,
};
use serde::{Deserialize, Serialize};

use crate::error::PodcastError;

/// One claim that did not pass verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedClaim {
    pub claim: String,
    /// Turn of the script as composed. Filtering may drop or merge turns,
    /// so this need not be a valid index into the delivered script.
    pub source_turn_index: usize,
    pub evidence: Option<String>,
    pub score: Option<f32>,
    pub verdict: Verdict,
}

impl From<&EvidenceMatch> for FlaggedClaim {
    fn from(m: &EvidenceMatch) -> Self {
        Self {
            claim: m.claim.text.clone(),
            source_turn_index: m.claim.turn_index,
            evidence: m.evidence.clone(),
            score: m.score.map(|s| s.value()),
            verdict: m.verdict,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodcastReport {
    pub summary_length: usize,
    pub script_length: usize,
    pub script_turns: usize,
    pub script_words: usize,
    pub verification_percentage: f64,
    pub verified: bool,
    pub total_claims: usize,
    pub passed_claims: usize,
    pub timed_out_claims: usize,
    pub flagged_claims: Vec<FlaggedClaim>,
    pub fitting_decision: FittingDecision,
    pub pacing_factor: f64,
    pub estimated_duration_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_duration_seconds: Option<f64>,
    pub regeneration_attempts: usize,
    pub filtered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_file: Option<PathBuf>,
}

/// Everything a finished run knows, gathered for [`PodcastReport::build`].
pub struct ReportInputs<'a> {
    pub summary: &'a Summary,
    pub verification: &'a VerificationReport,
    pub min_verified_percentage: f64,
    pub outcome: &'a FitOutcome,
    pub audio_duration_seconds: Option<f64>,
    pub regeneration_attempts: usize,
    pub filtered: bool,
}

impl PodcastReport {
    pub fn build(inputs: ReportInputs<'_>) -> Self {
        let ReportInputs {
            summary,
            verification,
            min_verified_percentage,
            outcome,
            audio_duration_seconds,
            regeneration_attempts,
            filtered,
        } = inputs;
        let script: &Script = &outcome.script;

        Self {
            summary_length: summary.len(),
            script_length: script.turns().iter().map(|t| t.text.chars().count()).sum(),
            script_turns: script.len(),
            script_words: script.word_count(),
            verification_percentage: verification.percentage(),
            verified: verification.percentage() >= min_verified_percentage,
            total_claims: verification.total_claims(),
            passed_claims: verification.passed_claims(),
            timed_out_claims: verification.timed_out_claims(),
            flagged_claims: verification.flagged().map(FlaggedClaim::from).collect(),
            fitting_decision: outcome.decision,
            pacing_factor: outcome.pacing.value(),
            estimated_duration_seconds: outcome.paced_seconds(),
            audio_duration_seconds,
            regeneration_attempts,
            filtered,
            output_file: None,
            script_file: None,
        }
    }

    /// Whether the run ended on a fitted script rather than a regeneration request.
    pub fn is_fitted(&self) -> bool {
        !self.fitting_decision.needs_regeneration()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn save(&self, path: &Path) -> Result<(), PodcastError> {
        let io_err = |source: std::io::Error| PodcastError::Io {
            path: path.to_path_buf(),
            source,
        };
        let json = self
            .to_json()
            .map_err(|e| io_err(std::io::Error::other(e)))?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, json).map_err(io_err)
    }
}
