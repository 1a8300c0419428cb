//! Outcome of checking one claim against the source article.
use serde::{Deserialize, Serialize};

use crate::claim::Claim;
use crate::similarity::SimilarityScore;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Best evidence met the threshold.
    #[display("passed")]
    Passed,
    /// Best evidence fell short, or there was nothing to compare against.
    #[display("failed")]
    Failed,
    /// Conversational filler that is not fact-checked.
    #[display("exempt")]
    Exempt,
    /// Scoring did not finish within its time budget.
    #[display("timed out")]
    TimedOut,
}

impl Verdict {
    /// Whether the claim belongs in the verification total.
    pub fn is_scorable(self) -> bool {
        !matches!(self, Verdict::Exempt)
    }

    /// Whether the claim should be surfaced for review.
    pub fn is_flagged(self) -> bool {
        matches!(self, Verdict::Failed | Verdict::TimedOut)
    }
}

/// A claim paired with the best-scoring article sentence, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceMatch {
    pub claim: Claim,
    pub evidence: Option<String>,
    /// Index of `evidence` in the article's sentence list.
    pub evidence_index: Option<usize>,
    pub score: Option<SimilarityScore>,
    pub verdict: Verdict,
}

impl EvidenceMatch {
    pub fn exempt(claim: Claim) -> Self {
        Self {
            claim,
            evidence: None,
            evidence_index: None,
            score: None,
            verdict: Verdict::Exempt,
        }
    }

    pub fn timed_out(claim: Claim) -> Self {
        Self {
            claim,
            evidence: None,
            evidence_index: None,
            score: None,
            verdict: Verdict::TimedOut,
        }
    }

    /// No article sentences were available to compare against.
    pub fn unsupported(claim: Claim) -> Self {
        Self {
            claim,
            evidence: None,
            evidence_index: None,
            score: None,
            verdict: Verdict::Failed,
        }
    }

    /// Judge a scored claim against `threshold` (inclusive).
    pub fn scored(
        claim: Claim,
        evidence: String,
        evidence_index: usize,
        score: SimilarityScore,
        threshold: f32,
    ) -> Self {
        let verdict = if score.meets(threshold) {
            Verdict::Passed
        } else {
            Verdict::Failed
        };
        Self {
            claim,
            evidence: Some(evidence),
            evidence_index: Some(evidence_index),
            score: Some(score),
            verdict,
        }
    }
}
