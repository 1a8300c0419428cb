use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fluent_podcast_domain::{DurationWindow, HostNames, HostVoices};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ------------ Verification -----------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Minimum similarity for a claim to pass (inclusive).
    pub threshold: f32,
    /// Share of claims that must pass for the script to count as verified.
    pub min_verified_percentage: f64,
    /// Drop unsupported sentences when verification falls short.
    pub filter_unverified: bool,
    pub scoring_timeout_ms: u64,
    /// Claims scored in parallel.
    pub concurrency: usize,
    pub exemption: ExemptionConfig,
    /// Tokens ending in `.` that never close a sentence.
    pub abbreviations: Vec<String>,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            min_verified_percentage: 90.0,
            filter_unverified: true,
            scoring_timeout_ms: 10_000,
            concurrency: 8,
            exemption: ExemptionConfig::default(),
            abbreviations: default_abbreviations(),
        }
    }
}

impl VerificationConfig {
    pub fn scoring_timeout(&self) -> Duration {
        Duration::from_millis(self.scoring_timeout_ms)
    }
}

pub fn default_abbreviations() -> Vec<String> {
    [
        "e.g", "i.e", "et al", "etc", "vs", "cf", "approx", "ca", "dr", "mr", "mrs", "ms",
        "prof", "st", "jr", "sr", "fig", "figs", "eq", "eqs", "no", "vol", "pp", "ref", "refs",
        "sec", "ch", "tab", "resp",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExemptionConfig {
    /// Case-insensitive regexes, each anchored to the whole claim.
    pub patterns: Vec<String>,
    /// Words that carry no content on their own.
    pub filler_words: Vec<String>,
    /// A claim of at most this many words, all drawn from `filler_words`,
    /// is filler.
    pub max_filler_words: usize,
}

impl Default for ExemptionConfig {
    fn default() -> Self {
        Self {
            patterns: [
                r"(hi|hello|hey)( there)?(,? (everyone|all|folks|listeners))?[.!]*",
                r"((hi|hello|hey),? )?(and )?welcome( back)?( to (the|our|this|today's|another)( [a-z'-]+){0,3} (show|episode|podcast|program|programme|hour|edition))?(,? (everyone|all|folks|listeners))?[.!]*",
                r"thanks?( you)?( so much)? for (having me|having us|joining us|joining me|listening|tuning in|being here)( today)?[.!]*",
                r"thank you( so much)?(,? (everyone|all))?[.!]*",
                r"(see you|until) next time(,? (everyone|all|folks))?[.!]*",
                r"(exactly|absolutely|right|indeed|definitely|totally|sure|yes|yeah|wow|great question|good point)[.!?]*",
                r"that'?s (right|true|fascinating|interesting|a great point)[.!?]*",
                r"(so,? )?what do you think( about (that|this|it))?\?",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            filler_words: [
                "oh", "ah", "um", "uh", "hmm", "mm", "wow", "well", "so", "okay", "ok", "yes",
                "yeah", "right", "sure", "really", "indeed", "exactly", "absolutely", "totally",
                "definitely", "agreed", "true", "great", "nice", "cool", "interesting",
                "fascinating", "huh",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            max_filler_words: 2,
        }
    }
}

// ------------ Duration ---------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationConfig {
    pub speaking_rate_wpm: f64,
    /// Silence between consecutive turns, in seconds.
    pub pause_allowance_seconds: f64,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            speaking_rate_wpm: 150.0,
            pause_allowance_seconds: 0.5,
        }
    }
}

// ------------ Fitting ---------------
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PacingClamp {
    pub min: f64,
    pub max: f64,
}

impl Default for PacingClamp {
    fn default() -> Self {
        Self {
            min: 0.85,
            max: 1.15,
        }
    }
}

impl PacingClamp {
    /// Inclusive on both bounds.
    pub fn contains(&self, factor: f64) -> bool {
        factor >= self.min && factor <= self.max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FittingConfig {
    pub target_seconds: f64,
    /// Fraction of `target_seconds` allowed on either side.
    pub tolerance: f64,
    pub pacing_clamp: PacingClamp,
    /// Truncation never goes below this many turns.
    pub min_turn_floor: usize,
    pub max_regenerations: usize,
}

impl Default for FittingConfig {
    fn default() -> Self {
        Self {
            target_seconds: 300.0,
            tolerance: 0.1,
            pacing_clamp: PacingClamp::default(),
            min_turn_floor: 4,
            max_regenerations: 2,
        }
    }
}

impl FittingConfig {
    pub fn window(&self) -> DurationWindow {
        DurationWindow::around(self.target_seconds, self.tolerance)
    }
}

// ------------ Hosts -----------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostsConfig {
    pub names: HostNames,
    pub voices: HostVoices,
}

// ------------ Collaborators ---------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub max_words: usize,
    /// Article chunk size for the map step.
    pub chunk_words: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            max_words: 700,
            chunk_words: 900,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 4000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    pub base_url: String,
    pub model_id: String,
    pub stability: f32,
    pub similarity_boost: f32,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".to_string(),
            model_id: "eleven_multilingual_v2".to_string(),
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub call_timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 5_000,
            max_delay_ms: 30_000,
            call_timeout_ms: 120_000,
        }
    }
}

// ------------ Output ---------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub default_output_dir: PathBuf,
    pub save_script: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_output_dir: PathBuf::from("./outputs"),
            save_script: true,
        }
    }
}

// ------------ PodcastConfig (root) -------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PodcastConfig {
    pub verification: VerificationConfig,
    pub duration: DurationConfig,
    pub fitting: FittingConfig,
    pub hosts: HostsConfig,
    pub summarizer: SummarizerConfig,
    pub llm: LlmConfig,
    pub tts: TtsConfig,
    pub retry: RetryConfig,
    pub output: OutputConfig,
}

impl PodcastConfig {
    /// Load a JSON config from disk and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: PodcastConfig =
            serde_json::from_str(&txt).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save to disk (pretty-printed).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.verification;
        if !(0.0..=1.0).contains(&v.threshold) {
            return Err(ConfigError::invalid(
                "verification.threshold",
                format!("{} is outside [0, 1]", v.threshold),
            ));
        }
        if !(0.0..=100.0).contains(&v.min_verified_percentage) {
            return Err(ConfigError::invalid(
                "verification.min_verified_percentage",
                format!("{} is outside [0, 100]", v.min_verified_percentage),
            ));
        }
        if v.concurrency == 0 {
            return Err(ConfigError::invalid(
                "verification.concurrency",
                "must be at least 1",
            ));
        }
        if v.scoring_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "verification.scoring_timeout_ms",
                "must be positive",
            ));
        }

        let d = &self.duration;
        if !(d.speaking_rate_wpm > 0.0) {
            return Err(ConfigError::invalid(
                "duration.speaking_rate_wpm",
                format!("{} is not positive", d.speaking_rate_wpm),
            ));
        }
        if !(d.pause_allowance_seconds >= 0.0) {
            return Err(ConfigError::invalid(
                "duration.pause_allowance_seconds",
                format!("{} is negative", d.pause_allowance_seconds),
            ));
        }

        let f = &self.fitting;
        if !(f.target_seconds > 0.0) {
            return Err(ConfigError::invalid(
                "fitting.target_seconds",
                format!("{} is not positive", f.target_seconds),
            ));
        }
        if !(0.0..1.0).contains(&f.tolerance) {
            return Err(ConfigError::invalid(
                "fitting.tolerance",
                format!("{} is outside [0, 1)", f.tolerance),
            ));
        }
        if !(f.pacing_clamp.min > 0.0) || f.pacing_clamp.min > f.pacing_clamp.max {
            return Err(ConfigError::invalid(
                "fitting.pacing_clamp",
                format!(
                    "min {} and max {} do not form a positive range",
                    f.pacing_clamp.min, f.pacing_clamp.max
                ),
            ));
        }
        if f.min_turn_floor < fluent_podcast_domain::MIN_SCRIPT_TURNS {
            return Err(ConfigError::invalid(
                "fitting.min_turn_floor",
                format!(
                    "{} leaves no room for both hosts (minimum {})",
                    f.min_turn_floor,
                    fluent_podcast_domain::MIN_SCRIPT_TURNS
                ),
            ));
        }

        if self.summarizer.max_words == 0 || self.summarizer.chunk_words == 0 {
            return Err(ConfigError::invalid(
                "summarizer",
                "max_words and chunk_words must be positive",
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::invalid(
                "retry.max_attempts",
                "must be at least 1",
            ));
        }
        if self.retry.initial_delay_ms > self.retry.max_delay_ms {
            return Err(ConfigError::invalid(
                "retry.initial_delay_ms",
                "exceeds retry.max_delay_ms",
            ));
        }
        Ok(())
    }
}

/// API keys, read once at startup and handed to the HTTP clients.
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub elevenlabs_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |key: &Option<String>| key.as_ref().map(|_| "***");
        f.debug_struct("Credentials")
            .field("openai_api_key", &mask(&self.openai_api_key))
            .field("elevenlabs_api_key", &mask(&self.elevenlabs_api_key))
            .finish()
    }
}

impl Credentials {
    pub const OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    pub const ELEVENLABS_API_KEY: &'static str = "ELEVENLABS_API_KEY";

    /// Read keys from the process environment. Empty values count as absent.
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            openai_api_key: read(Self::OPENAI_API_KEY),
            elevenlabs_api_key: read(Self::ELEVENLABS_API_KEY),
        }
    }

    pub fn openai(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or(ConfigError::MissingCredential(Self::OPENAI_API_KEY))
    }

    pub fn elevenlabs(&self) -> Result<&str, ConfigError> {
        self.elevenlabs_api_key
            .as_deref()
            .ok_or(ConfigError::MissingCredential(Self::ELEVENLABS_API_KEY))
    }
}
