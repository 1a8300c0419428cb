//! # Fluent Podcast
//!
//! Turns a research article into a two-host audio podcast whose script has
//! been checked against the article and fitted to a target duration.
//!
//! ## Usage Pattern
//!
//! ```ignore
//! use std::sync::Arc;
//! use fluent_podcast::prelude::*;
//!
//! let chat = Arc::new(OpenAiChatClient::new(api_key, config.llm.clone()));
//! let pipeline = PodcastPipeline::new(
//!     config,
//!     Arc::new(LexicalScorer::new()),
//!     Arc::new(LlmSummarizer::new(chat.clone(), Segmenter::default(), 900)),
//!     Arc::new(LlmScriptGenerator::new(chat, 150.0)),
//! )?
//! .with_synthesizer(Arc::new(ElevenLabsSynthesizer::new(xi_key, TtsConfig::default())));
//!
//! let run = pipeline.run(&article_text).await?;
//! println!("{}% of claims verified", run.report.verification_percentage);
//! ```

/* ───── shared fundamentals ───── */
pub mod config;
pub mod error;

/* ───── verification core ───── */
pub mod article;
pub mod exemption;
pub mod fact_checker;
pub mod filter;
pub mod scoring;
pub mod segmenter;

/* ───── duration fitting ───── */
pub mod duration;
pub mod fitter;

/* ───── collaborators & output ───── */
pub mod audio;
pub mod collaborators;
pub mod pipeline;
pub mod report;

pub use fluent_podcast_domain as domain;

pub use article::Article;
pub use audio::{AudioProducer, write_wav};
pub use config::{Credentials, PodcastConfig};
pub use duration::DurationEstimator;
pub use error::{CollaboratorError, ConfigError, PodcastError, ScoringError, Stage};
pub use exemption::ExemptionRules;
pub use fact_checker::FactChecker;
pub use filter::{filter_unverified, should_filter};
pub use fitter::ScriptFitter;
pub use pipeline::{PipelineRun, PodcastPipeline};
pub use report::{FlaggedClaim, PodcastReport};
pub use segmenter::Segmenter;

/// Prelude with the types needed to wire up and run a pipeline.
pub mod prelude {
    pub use crate::collaborators::{
        ElevenLabsSynthesizer, LlmScriptGenerator, LlmSummarizer, OpenAiChatClient, RetryPolicy,
        ScriptGenerator, SpeechSynthesizer, Summarizer,
    };
    pub use crate::config::*;
    pub use crate::scoring::{LexicalScorer, SimilarityScorer};
    pub use crate::{
        Article, AudioProducer, FactChecker, PipelineRun, PodcastError, PodcastPipeline,
        PodcastReport, Segmenter, write_wav,
    };
    pub use fluent_podcast_domain::prelude::*;
}
