//! Duration stretch applied when synthesizing a script.
use serde::{Deserialize, Serialize};

/// Multiplicative stretch of spoken duration (1.0 = unchanged).
///
/// A factor of 1.15 asks for audio 15% longer than the estimate, which a
/// TTS engine expresses as a slower speech rate of `1 / 1.15`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PacingFactor(f64);

impl PacingFactor {
    pub const NEUTRAL: Self = Self(1.0);

    pub fn new(factor: f64) -> Self {
        Self(factor)
    }

    /// Round to hundredths, the granularity pacing is decided at.
    pub fn rounded(factor: f64) -> Self {
        Self((factor * 100.0).round() / 100.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Speed multiplier for a TTS engine.
    pub fn speech_rate(self) -> f64 {
        if self.0 > 0.0 { 1.0 / self.0 } else { 1.0 }
    }

    pub fn is_neutral(self) -> bool {
        self.0 == 1.0
    }
}

impl std::fmt::Display for PacingFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Default for PacingFactor {
    fn default() -> Self {
        Self::NEUTRAL
    }
}
