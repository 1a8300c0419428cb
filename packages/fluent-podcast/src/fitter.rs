//! Fits a verified script into its duration window.
//!
//! Decision order:
//!
//! 1. inside the window: accept as is;
//! 2. over the window: drop trailing turns down to the turn floor, then
//!    accept, pace up, or ask for a new script if still too long;
//! 3. under the window: stretch with a pacing factor when it stays inside
//!    the clamp, otherwise ask for a new script.

use fluent_podcast_domain::{
    DurationEstimate, DurationWindow, FitOutcome, FittingDecision, PacingFactor,
    RegenerationReason, Script,
};

use crate::config::{FittingConfig, PacingClamp};
use crate::duration::DurationEstimator;

#[derive(Debug, Clone)]
pub struct ScriptFitter {
    estimator: DurationEstimator,
    window: DurationWindow,
    pacing_clamp: PacingClamp,
    min_turn_floor: usize,
}

impl ScriptFitter {
    pub fn new(
        estimator: DurationEstimator,
        window: DurationWindow,
        pacing_clamp: PacingClamp,
        min_turn_floor: usize,
    ) -> Self {
        Self {
            estimator,
            window,
            pacing_clamp,
            min_turn_floor,
        }
    }

    pub fn from_config(estimator: DurationEstimator, config: &FittingConfig) -> Self {
        Self::new(
            estimator,
            config.window(),
            config.pacing_clamp,
            config.min_turn_floor,
        )
    }

    pub fn window(&self) -> DurationWindow {
        self.window
    }

    pub fn estimator(&self) -> &DurationEstimator {
        &self.estimator
    }

    pub fn fit(&self, script: &Script) -> FitOutcome {
        let estimate = self.estimator.estimate(script);
        let outcome = if self.window.contains(estimate.seconds) {
            outcome(FittingDecision::Accept, script.clone(), estimate, PacingFactor::NEUTRAL)
        } else if estimate.seconds > self.window.max {
            self.trim(script, estimate)
        } else {
            match self.pacing_for(&estimate) {
                Some(factor) => outcome(
                    FittingDecision::AcceptWithPacing { factor },
                    script.clone(),
                    estimate,
                    factor,
                ),
                None => regenerate(RegenerationReason::TooShort, script, estimate),
            }
        };

        tracing::info!(
            decision = %outcome.decision,
            estimated_seconds = outcome.estimate.seconds,
            turns = outcome.script.len(),
            pacing = outcome.pacing.value(),
            "script fitted"
        );
        outcome
    }

    fn trim(&self, script: &Script, estimate: DurationEstimate) -> FitOutcome {
        if script.len() <= self.min_turn_floor {
            return regenerate(RegenerationReason::TooLong, script, estimate);
        }

        let mut keep = script.len();
        let mut trimmed = estimate;
        while keep > self.min_turn_floor && trimmed.seconds > self.window.max {
            keep -= 1;
            trimmed = self.estimator.estimate_prefix(script, keep);
        }

        if trimmed.seconds > self.window.max {
            return regenerate(RegenerationReason::TooLong, script, estimate);
        }

        let decision = FittingDecision::Truncate {
            kept_turns: keep,
            dropped_turns: script.len() - keep,
        };
        let shortened = script.truncated(keep);
        if self.window.contains(trimmed.seconds) {
            return outcome(decision, shortened, trimmed, PacingFactor::NEUTRAL);
        }

        // Dropping the last turn overshot the lower bound.
        match self.pacing_for(&trimmed) {
            Some(factor) => outcome(decision, shortened, trimmed, factor),
            None => regenerate(RegenerationReason::TooShort, &shortened, trimmed),
        }
    }

    /// Stretch needed to reach the window target, if inside the clamp.
    fn pacing_for(&self, estimate: &DurationEstimate) -> Option<PacingFactor> {
        if estimate.seconds <= 0.0 {
            return None;
        }
        let factor = PacingFactor::rounded(self.window.target() / estimate.seconds);
        self.pacing_clamp
            .contains(factor.value())
            .then_some(factor)
    }
}

fn outcome(
    decision: FittingDecision,
    script: Script,
    estimate: DurationEstimate,
    pacing: PacingFactor,
) -> FitOutcome {
    FitOutcome {
        decision,
        script,
        estimate,
        pacing,
    }
}

fn regenerate(reason: RegenerationReason, script: &Script, estimate: DurationEstimate) -> FitOutcome {
    outcome(
        FittingDecision::RequestRegeneration { reason },
        script.clone(),
        estimate,
        PacingFactor::NEUTRAL,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluent_podcast_domain::{DraftTurn, Speaker};

    /// One word per second and no pauses, so word counts read as seconds.
    fn fitter(floor: usize) -> ScriptFitter {
        ScriptFitter::new(
            DurationEstimator::new(60.0, 0.0),
            DurationWindow::around(300.0, 0.1),
            PacingClamp::default(),
            floor,
        )
    }

    fn script_of(seconds: &[usize]) -> Script {
        let draft = seconds
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let speaker = if i % 2 == 0 { Speaker::Host } else { Speaker::CoHost };
                DraftTurn::new(speaker, vec!["w"; *n].join(" "))
            })
            .collect();
        Script::from_draft(draft).unwrap()
    }

    #[test]
    fn inside_window_is_accepted() {
        let outcome = fitter(4).fit(&script_of(&[150, 150]));
        assert_eq!(outcome.decision, FittingDecision::Accept);
        assert_eq!(outcome.pacing, PacingFactor::NEUTRAL);
    }

    #[test]
    fn overlong_script_is_truncated_into_window() {
        let outcome = fitter(4).fit(&script_of(&[40; 10]));
        assert_eq!(
            outcome.decision,
            FittingDecision::Truncate {
                kept_turns: 8,
                dropped_turns: 2
            }
        );
        assert_eq!(outcome.script.len(), 8);
        assert!((outcome.estimate.seconds - 320.0).abs() < 1e-9);
    }

    #[test]
    fn still_too_long_at_floor_regenerates() {
        let outcome = fitter(4).fit(&script_of(&[100; 10]));
        assert_eq!(
            outcome.decision,
            FittingDecision::RequestRegeneration {
                reason: RegenerationReason::TooLong
            }
        );
    }

    #[test]
    fn at_floor_and_over_goes_straight_to_regeneration() {
        let outcome = fitter(4).fit(&script_of(&[100, 100, 100, 100]));
        assert!(outcome.decision.needs_regeneration());
        assert_eq!(outcome.script.len(), 4);
    }

    #[test]
    fn truncation_undershoot_falls_back_to_pacing() {
        let outcome = fitter(2).fit(&script_of(&[100, 100, 60, 100]));
        assert_eq!(
            outcome.decision,
            FittingDecision::Truncate {
                kept_turns: 3,
                dropped_turns: 1
            }
        );
        assert_eq!(outcome.pacing.value(), 1.15);
    }

    #[test]
    fn truncation_undershoot_outside_clamp_regenerates() {
        let outcome = fitter(2).fit(&script_of(&[100, 100, 200]));
        assert_eq!(
            outcome.decision,
            FittingDecision::RequestRegeneration {
                reason: RegenerationReason::TooShort
            }
        );
    }

    #[test]
    fn short_scripts_are_paced_or_regenerated() {
        let cases = [
            (200, None),
            (240, None),
            (260, Some(1.15)),
            (290, None), // inside the window
        ];
        for (seconds, expected) in cases {
            let outcome = fitter(4).fit(&script_of(&[seconds / 2, seconds / 2]));
            match (seconds, expected) {
                (290, _) => assert_eq!(outcome.decision, FittingDecision::Accept),
                (_, Some(factor)) => {
                    assert_eq!(
                        outcome.decision,
                        FittingDecision::AcceptWithPacing {
                            factor: PacingFactor::new(factor)
                        }
                    );
                    assert_eq!(outcome.pacing.value(), factor);
                }
                (_, None) => assert_eq!(
                    outcome.decision,
                    FittingDecision::RequestRegeneration {
                        reason: RegenerationReason::TooShort
                    },
                    "{seconds}s should be too short"
                ),
            }
        }
    }

    #[test]
    fn fitting_is_deterministic() {
        let fitter = fitter(4);
        let cases: [&[usize]; 3] = [&[40; 10], &[130, 130], &[100; 6]];
        for seconds in cases {
            let script = script_of(seconds);
            assert_eq!(fitter.fit(&script), fitter.fit(&script));
        }
    }
}
