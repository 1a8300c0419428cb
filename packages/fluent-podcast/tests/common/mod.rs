//! In-memory collaborators for driving the pipeline without network access.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fluent_podcast::collaborators::{RetryPolicy, ScriptGenerator, SpeechSynthesizer, Summarizer};
use fluent_podcast::config::PodcastConfig;
use fluent_podcast::domain::{AudioSegment, DraftTurn, HostNames, PacingFactor, Speaker, VoiceId};
use fluent_podcast::error::{CollaboratorError, ScoringError};
use fluent_podcast::scoring::{LexicalScorer, SimilarityScorer};
use fluent_podcast::{PodcastPipeline, domain::SimilarityScore};
use parking_lot::Mutex;

pub const ARTICLE: &str = "Wheat yields dropped 6% in 2023. Drought was the main cause. \
Farmers planted earlier to cope. Prices rose across the region. \
Researchers expect a partial recovery next year.";

/// 60 wpm and no pauses, so one word is one second; window 18 to 22 s.
pub fn config() -> PodcastConfig {
    let mut config = PodcastConfig::default();
    config.duration.speaking_rate_wpm = 60.0;
    config.duration.pause_allowance_seconds = 0.0;
    config.fitting.target_seconds = 20.0;
    config.fitting.tolerance = 0.1;
    config.fitting.min_turn_floor = 2;
    config
}

pub fn turn(speaker: Speaker, text: &str) -> DraftTurn {
    DraftTurn::new(speaker, text)
}

/// `n` filler words with no sentence punctuation, so one claim per turn.
pub fn words(n: usize) -> String {
    vec!["w"; n].join(" ")
}

pub fn no_retry() -> RetryPolicy {
    RetryPolicy::no_retry(Duration::from_secs(5))
}

pub fn pipeline(
    config: PodcastConfig,
    summarizer: Arc<dyn Summarizer>,
    generator: Arc<dyn ScriptGenerator>,
) -> PodcastPipeline {
    PodcastPipeline::new(config, Arc::new(LexicalScorer::new()), summarizer, generator)
        .unwrap()
        .with_retry(no_retry())
}

/// Returns the first `max_words` words of the input.
pub struct TruncatingSummarizer;

#[async_trait]
impl Summarizer for TruncatingSummarizer {
    async fn summarize(&self, text: &str, max_words: usize) -> Result<String, CollaboratorError> {
        Ok(text
            .split_whitespace()
            .take(max_words)
            .collect::<Vec<_>>()
            .join(" "))
    }
}

pub struct FailingSummarizer(pub CollaboratorError);

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize(&self, _text: &str, _max_words: usize) -> Result<String, CollaboratorError> {
        Err(self.0.clone())
    }
}

/// Plays back queued replies in order, repeating the last one, and records
/// the word target of every request.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<Vec<DraftTurn>, CollaboratorError>>>,
    last: Mutex<Option<Vec<DraftTurn>>>,
    pub targets: Mutex<Vec<usize>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<Vec<DraftTurn>, CollaboratorError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
            targets: Mutex::new(Vec::new()),
        })
    }

    pub fn drafts(drafts: Vec<Vec<DraftTurn>>) -> Arc<Self> {
        Self::new(drafts.into_iter().map(Ok).collect())
    }

    pub fn calls(&self) -> usize {
        self.targets.lock().len()
    }
}

#[async_trait]
impl ScriptGenerator for ScriptedGenerator {
    async fn compose(
        &self,
        _summary: &str,
        _hosts: &HostNames,
        target_words: usize,
    ) -> Result<Vec<DraftTurn>, CollaboratorError> {
        self.targets.lock().push(target_words);
        let next = self.replies.lock().pop_front();
        match next {
            Some(Ok(draft)) => {
                *self.last.lock() = Some(draft.clone());
                Ok(draft)
            }
            Some(Err(e)) => Err(e),
            None => self
                .last
                .lock()
                .clone()
                .ok_or_else(|| CollaboratorError::Rejected("no scripted reply".into())),
        }
    }
}

/// One sample per word at 10 Hz, so a segment lasts a tenth of a second per word.
pub struct BeepSynthesizer {
    pub voices: Mutex<Vec<VoiceId>>,
    pub pacing: Mutex<Vec<PacingFactor>>,
}

pub const BEEP_RATE: u32 = 10;

impl BeepSynthesizer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            voices: Mutex::new(Vec::new()),
            pacing: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for BeepSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceId,
        pacing: PacingFactor,
    ) -> Result<AudioSegment, CollaboratorError> {
        self.voices.lock().push(voice.clone());
        self.pacing.lock().push(pacing);
        let n = text.split_whitespace().count();
        Ok(AudioSegment::new(vec![i16::MAX / 2; n], BEEP_RATE))
    }
}

/// Any claim scoring fails.
pub struct UnavailableScorer;

#[async_trait]
impl SimilarityScorer for UnavailableScorer {
    async fn score(&self, _a: &str, _b: &str) -> Result<SimilarityScore, ScoringError> {
        Err(ScoringError::Unavailable("model offline".into()))
    }
}
