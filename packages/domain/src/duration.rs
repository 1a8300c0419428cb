//! Predicted spoken length of a script.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationEstimate {
    pub seconds: f64,
    pub words: usize,
    pub turns: usize,
}

/// Inclusive target range for the spoken length, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationWindow {
    pub min: f64,
    pub max: f64,
}

impl DurationWindow {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Window of `target ± tolerance * target`.
    pub fn around(target: f64, tolerance: f64) -> Self {
        Self {
            min: target * (1.0 - tolerance),
            max: target * (1.0 + tolerance),
        }
    }

    pub fn target(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, seconds: f64) -> bool {
        seconds >= self.min && seconds <= self.max
    }
}
