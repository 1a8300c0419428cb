//! Checks every claim of a script against the source article.

use std::sync::Arc;
use std::time::Duration;

use fluent_podcast_domain::{Claim, EvidenceMatch, Script, VerificationReport};
use futures::{StreamExt, TryStreamExt, stream};

use crate::article::Article;
use crate::config::VerificationConfig;
use crate::error::{ConfigError, PodcastError, ScoringError, Stage};
use crate::exemption::ExemptionRules;
use crate::scoring::SimilarityScorer;
use crate::segmenter::Segmenter;

pub struct FactChecker {
    scorer: Arc<dyn SimilarityScorer>,
    segmenter: Segmenter,
    exemptions: ExemptionRules,
    threshold: f32,
    timeout: Duration,
    concurrency: usize,
}

impl FactChecker {
    pub fn new(scorer: Arc<dyn SimilarityScorer>) -> Self {
        let defaults = VerificationConfig::default();
        Self {
            scorer,
            segmenter: Segmenter::default(),
            exemptions: ExemptionRules::default(),
            threshold: defaults.threshold,
            timeout: defaults.scoring_timeout(),
            concurrency: defaults.concurrency,
        }
    }

    pub fn from_config(
        scorer: Arc<dyn SimilarityScorer>,
        config: &VerificationConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            scorer,
            segmenter: Segmenter::new(&config.abbreviations),
            exemptions: ExemptionRules::from_config(&config.exemption)?,
            threshold: config.threshold,
            timeout: config.scoring_timeout(),
            concurrency: config.concurrency.max(1),
        })
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_exemptions(mut self, exemptions: ExemptionRules) -> Self {
        self.exemptions = exemptions;
        self
    }

    pub fn with_segmenter(mut self, segmenter: Segmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Score each non-exempt claim of `script` against the article.
    ///
    /// A claim whose scoring exceeds the timeout is reported as timed out
    /// and the run continues. Any scorer error aborts verification.
    pub async fn verify(
        &self,
        script: &Script,
        article: &Article,
    ) -> Result<VerificationReport, PodcastError> {
        let claims = self.segmenter.claims(script);
        let sentences = article.sentences();

        let mut matches = Vec::with_capacity(claims.len());
        let mut scorable = Vec::new();
        for claim in claims {
            if self.exemptions.is_exempt(&claim) {
                matches.push(EvidenceMatch::exempt(claim));
            } else if article.is_empty() {
                matches.push(EvidenceMatch::unsupported(claim));
            } else {
                scorable.push(claim);
            }
        }
        tracing::debug!(
            scorable = scorable.len(),
            exempt = matches.len(),
            sentences = sentences.len(),
            "claims extracted"
        );

        let scored: Vec<EvidenceMatch> = stream::iter(scorable)
            .map(|claim| self.check_claim(claim, sentences))
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await
            .map_err(|cause| PodcastError::ScoringUnavailable {
                stage: Stage::Verification,
                cause,
            })?;
        matches.extend(scored);

        let report = VerificationReport::from_matches(matches, self.threshold);
        tracing::info!(
            total = report.total_claims(),
            passed = report.passed_claims(),
            exempt = report.exempt_claims(),
            timed_out = report.timed_out_claims(),
            percentage = report.percentage(),
            "verification complete"
        );
        Ok(report)
    }

    async fn check_claim(
        &self,
        claim: Claim,
        sentences: &[String],
    ) -> Result<EvidenceMatch, ScoringError> {
        let scores = match tokio::time::timeout(
            self.timeout,
            self.scorer.score_many(&claim.text, sentences),
        )
        .await
        {
            Ok(scores) => scores?,
            Err(_) => {
                tracing::warn!(ordinal = claim.ordinal, timeout = ?self.timeout, "claim scoring timed out");
                return Ok(EvidenceMatch::timed_out(claim));
            }
        };
        if scores.len() != sentences.len() {
            return Err(ScoringError::Malformed {
                expected: sentences.len(),
                got: scores.len(),
            });
        }

        // Strict `>` keeps the earliest sentence on ties.
        let mut best = 0;
        for (index, score) in scores.iter().enumerate().skip(1) {
            if score.value() > scores[best].value() {
                best = index;
            }
        }

        let evidence = EvidenceMatch::scored(
            claim,
            sentences[best].clone(),
            best,
            scores[best],
            self.threshold,
        );
        tracing::debug!(
            ordinal = evidence.claim.ordinal,
            score = scores[best].value(),
            verdict = %evidence.verdict,
            "claim scored"
        );
        Ok(evidence)
    }
}
