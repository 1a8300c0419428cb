//! Semantic similarity between a claim and a piece of evidence.
//!
//! Scores are always inside `[0.0, 1.0]`. Scorers that produce cosine values
//! in `[-1.0, 1.0]` are clamped on construction, and a `NaN` from a degenerate
//! vector becomes `0.0` so that it can never pass a threshold.

use serde::{Deserialize, Serialize};

/// Similarity score between 0.0 and 1.0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityScore(f32);

impl SimilarityScore {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);

    /// Create a new score, clamping out-of-range values.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the score value.
    pub fn value(self) -> f32 {
        self.0
    }

    /// Inclusive threshold check.
    pub fn meets(self, threshold: f32) -> bool {
        self.0 >= threshold
    }
}

impl From<f32> for SimilarityScore {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}
