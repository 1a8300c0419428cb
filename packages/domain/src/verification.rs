//! Aggregate result of fact-checking a script.

use serde::Serialize;

use crate::evidence::{EvidenceMatch, Verdict};

/// Immutable verification summary.
///
/// Exempt claims are reported in `matches` but excluded from the total.
/// Timed-out claims are included in the total and count as not passed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    threshold: f32,
    total_claims: usize,
    passed_claims: usize,
    exempt_claims: usize,
    timed_out_claims: usize,
    percentage: f64,
    matches: Vec<EvidenceMatch>,
}

impl VerificationReport {
    /// Aggregate per-claim matches. Matches are put back in script order.
    pub fn from_matches(mut matches: Vec<EvidenceMatch>, threshold: f32) -> Self {
        matches.sort_by_key(|m| m.claim.ordinal);

        let count = |verdict: Verdict| matches.iter().filter(|m| m.verdict == verdict).count();
        let passed_claims = count(Verdict::Passed);
        let exempt_claims = count(Verdict::Exempt);
        let timed_out_claims = count(Verdict::TimedOut);
        let total_claims = matches.len() - exempt_claims;

        let percentage = if total_claims == 0 {
            100.0
        } else {
            100.0 * passed_claims as f64 / total_claims as f64
        };

        Self {
            threshold,
            total_claims,
            passed_claims,
            exempt_claims,
            timed_out_claims,
            percentage,
            matches,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn total_claims(&self) -> usize {
        self.total_claims
    }

    pub fn passed_claims(&self) -> usize {
        self.passed_claims
    }

    pub fn exempt_claims(&self) -> usize {
        self.exempt_claims
    }

    pub fn timed_out_claims(&self) -> usize {
        self.timed_out_claims
    }

    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    pub fn matches(&self) -> &[EvidenceMatch] {
        &self.matches
    }

    /// Failed and timed-out claims, in script order.
    pub fn flagged(&self) -> impl Iterator<Item = &EvidenceMatch> {
        self.matches.iter().filter(|m| m.verdict.is_flagged())
    }

    /// True when every scorable claim received a score.
    pub fn is_complete(&self) -> bool {
        self.timed_out_claims == 0
    }
}
