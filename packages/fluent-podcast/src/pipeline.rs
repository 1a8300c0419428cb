//! Pipeline coordinator: article in, verified and fitted podcast out.
//!
//! Stages run strictly in order. Only claim scoring inside the fact-checker
//! is concurrent. A run owns its article, script and report; collaborators
//! are shared read-only and may serve several runs at once.

use std::sync::Arc;

use fluent_podcast_domain::{
    AudioSegment, FitOutcome, FittingDecision, Script, ScriptError, Summary, VerificationReport,
};

use crate::article::Article;
use crate::audio::AudioProducer;
use crate::collaborators::{RetryPolicy, ScriptGenerator, SpeechSynthesizer, Summarizer};
use crate::config::PodcastConfig;
use crate::duration::DurationEstimator;
use crate::error::{ConfigError, PodcastError, Stage};
use crate::fact_checker::FactChecker;
use crate::filter::{filter_unverified, should_filter};
use crate::fitter::ScriptFitter;
use crate::report::{PodcastReport, ReportInputs};
use crate::scoring::SimilarityScorer;

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub report: PodcastReport,
    pub summary: Summary,
    /// The fitted script, or the last attempt when regeneration ran out.
    pub script: Script,
    /// `None` when synthesis is disabled or the script could not be fitted.
    pub audio: Option<AudioSegment>,
}

impl PipelineRun {
    pub fn is_fitted(&self) -> bool {
        self.report.is_fitted()
    }
}

pub struct PodcastPipeline {
    config: PodcastConfig,
    summarizer: Arc<dyn Summarizer>,
    generator: Arc<dyn ScriptGenerator>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    fact_checker: FactChecker,
    fitter: ScriptFitter,
    retry: RetryPolicy,
}

/// One composed, verified and fitted script.
struct Fitted {
    verification: VerificationReport,
    outcome: FitOutcome,
    filtered: bool,
}

enum Attempt {
    Fitted(Fitted),
    /// Filtering left a script that is no longer a valid dialogue.
    Unfilterable(ScriptError),
}

impl PodcastPipeline {
    /// Build a pipeline from a validated configuration. Audio is off until a
    /// synthesizer is attached with [`Self::with_synthesizer`].
    pub fn new(
        config: PodcastConfig,
        scorer: Arc<dyn SimilarityScorer>,
        summarizer: Arc<dyn Summarizer>,
        generator: Arc<dyn ScriptGenerator>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let fact_checker = FactChecker::from_config(scorer, &config.verification)?;
        let estimator = DurationEstimator::from_config(&config.duration);
        let fitter = ScriptFitter::from_config(estimator, &config.fitting);
        let retry = RetryPolicy::from_config(&config.retry);
        Ok(Self {
            config,
            summarizer,
            generator,
            synthesizer: None,
            fact_checker,
            fitter,
            retry,
        })
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &PodcastConfig {
        &self.config
    }

    pub async fn run(&self, article_text: &str) -> Result<PipelineRun, PodcastError> {
        let article = Article::new(article_text, self.fact_checker.segmenter());
        tracing::info!(
            stage = %Stage::Analysis,
            chars = article.char_len(),
            words = article.word_count(),
            sentences = article.sentences().len(),
            "article loaded"
        );

        let max_words = self.config.summarizer.max_words;
        let summary_text = self
            .retry
            .run("summarize", || self.summarizer.summarize(article.text(), max_words))
            .await
            .map_err(|cause| PodcastError::SummarizationUnavailable { cause })?;
        let summary = Summary::new(summary_text, article.char_len());
        tracing::info!(
            stage = %Stage::Analysis,
            summary_chars = summary.len(),
            "article summarized"
        );

        let window = self.fitter.window();
        let max_regenerations = self.config.fitting.max_regenerations;
        let mut target_words = self.fitter.estimator().words_for(window.target()).max(1);
        let mut regenerations = 0;

        let fitted = loop {
            let fitted = match self.attempt(&summary, &article, target_words, regenerations).await? {
                Attempt::Fitted(fitted) => fitted,
                Attempt::Unfilterable(error) if regenerations < max_regenerations => {
                    regenerations += 1;
                    tracing::warn!(
                        stage = %Stage::Verification,
                        %error,
                        target_words,
                        regeneration = regenerations,
                        "filtered script is malformed, regenerating"
                    );
                    continue;
                }
                Attempt::Unfilterable(error) => return Err(error.into()),
            };
            let estimate = fitted.outcome.estimate;
            match fitted.outcome.decision {
                FittingDecision::RequestRegeneration { reason }
                    if regenerations < max_regenerations =>
                {
                    let previous = target_words;
                    if estimate.seconds > 0.0 {
                        let scale = window.target() / estimate.seconds;
                        target_words = ((target_words as f64) * scale).round().max(1.0) as usize;
                    }
                    regenerations += 1;
                    tracing::warn!(
                        stage = %Stage::Fitting,
                        %reason,
                        estimated_seconds = estimate.seconds,
                        previous_target_words = previous,
                        target_words,
                        regeneration = regenerations,
                        "script does not fit, regenerating"
                    );
                }
                _ => break fitted,
            }
        };

        let Fitted {
            verification,
            outcome,
            filtered,
        } = fitted;

        let audio = match &self.synthesizer {
            Some(synthesizer) if !outcome.decision.needs_regeneration() => {
                let producer = AudioProducer::new(
                    Arc::clone(synthesizer),
                    self.config.hosts.voices.clone(),
                    self.config.duration.pause_allowance_seconds,
                    self.retry,
                );
                Some(producer.produce(&outcome.script, outcome.pacing).await?)
            }
            Some(_) => {
                tracing::warn!(
                    stage = %Stage::AudioProduction,
                    regenerations,
                    "regeneration attempts exhausted, skipping audio"
                );
                None
            }
            None => None,
        };

        let report = PodcastReport::build(ReportInputs {
            summary: &summary,
            verification: &verification,
            min_verified_percentage: self.config.verification.min_verified_percentage,
            outcome: &outcome,
            audio_duration_seconds: audio.as_ref().map(AudioSegment::duration_seconds),
            regeneration_attempts: regenerations,
            filtered,
        });
        tracing::info!(
            decision = %outcome.decision,
            verification_percentage = report.verification_percentage,
            flagged = report.flagged_claims.len(),
            estimated_seconds = report.estimated_duration_seconds,
            regenerations,
            "pipeline finished"
        );

        Ok(PipelineRun {
            report,
            summary,
            script: outcome.script,
            audio,
        })
    }

    async fn attempt(
        &self,
        summary: &Summary,
        article: &Article,
        target_words: usize,
        regeneration: usize,
    ) -> Result<Attempt, PodcastError> {
        let names = &self.config.hosts.names;
        let draft = self
            .retry
            .run("compose", || {
                self.generator.compose(&summary.text, names, target_words)
            })
            .await
            .map_err(|cause| PodcastError::GenerationUnavailable { cause })?;
        let script = Script::from_draft(draft)?;
        tracing::info!(
            stage = %Stage::Composition,
            regeneration,
            target_words,
            turns = script.len(),
            words = script.word_count(),
            "script composed"
        );

        let verification = self.fact_checker.verify(&script, article).await?;

        let filtered = should_filter(
            &verification,
            self.config.verification.min_verified_percentage,
            self.config.verification.filter_unverified,
        );
        let script = if filtered {
            match filter_unverified(&script, &verification) {
                Ok(script) => script,
                Err(error) => return Ok(Attempt::Unfilterable(error)),
            }
        } else {
            script
        };

        let outcome = self.fitter.fit(&script);
        Ok(Attempt::Fitted(Fitted {
            verification,
            outcome,
            filtered,
        }))
    }
}
