//! Spoken-length estimate for a script.

use fluent_podcast_domain::{DurationEstimate, Script, Turn};

use crate::config::DurationConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationEstimator {
    pub speaking_rate_wpm: f64,
    /// Silence between consecutive turns, in seconds.
    pub pause_allowance_seconds: f64,
}

impl Default for DurationEstimator {
    fn default() -> Self {
        Self::from_config(&DurationConfig::default())
    }
}

impl DurationEstimator {
    pub fn new(speaking_rate_wpm: f64, pause_allowance_seconds: f64) -> Self {
        Self {
            speaking_rate_wpm,
            pause_allowance_seconds,
        }
    }

    pub fn from_config(config: &DurationConfig) -> Self {
        Self::new(config.speaking_rate_wpm, config.pause_allowance_seconds)
    }

    pub fn estimate(&self, script: &Script) -> DurationEstimate {
        self.estimate_turns(script.turns())
    }

    /// Estimate of the first `turns` turns only.
    pub fn estimate_prefix(&self, script: &Script, turns: usize) -> DurationEstimate {
        let turns = turns.min(script.len());
        self.estimate_turns(&script.turns()[..turns])
    }

    /// Words that fit in `seconds` at this rate.
    pub fn words_for(&self, seconds: f64) -> usize {
        (seconds / 60.0 * self.speaking_rate_wpm).round() as usize
    }

    fn estimate_turns(&self, turns: &[Turn]) -> DurationEstimate {
        let words: usize = turns.iter().map(Turn::word_count).sum();
        let pauses = turns.len().saturating_sub(1) as f64;
        let seconds =
            words as f64 / self.speaking_rate_wpm * 60.0 + self.pause_allowance_seconds * pauses;
        DurationEstimate {
            seconds,
            words,
            turns: turns.len(),
        }
    }
}
