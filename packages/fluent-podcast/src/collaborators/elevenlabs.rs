//! ElevenLabs text-to-speech over HTTPS.

use async_trait::async_trait;
use fluent_podcast_domain::{AudioSegment, PacingFactor, VoiceId};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;

use super::{SpeechSynthesizer, status_error};
use crate::config::TtsConfig;
use crate::error::CollaboratorError;

const XI_API_KEY_HEADER: &str = "xi-api-key";
const APPLICATION_JSON: &str = "application/json";
/// Raw little-endian PCM16 at this rate.
const OUTPUT_FORMAT: &str = "pcm_24000";
pub const SAMPLE_RATE: u32 = 24_000;

/// Speed range accepted by the API.
const MIN_SPEED: f64 = 0.7;
const MAX_SPEED: f64 = 1.2;

#[derive(Serialize)]
struct TtsBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    speed: f64,
}

#[derive(Clone)]
pub struct ElevenLabsSynthesizer {
    inner: reqwest::Client,
    api_key: String,
    config: TtsConfig,
}

impl ElevenLabsSynthesizer {
    pub fn new(api_key: impl Into<String>, config: TtsConfig) -> Self {
        Self {
            inner: reqwest::Client::new(),
            api_key: api_key.into(),
            config,
        }
    }

    fn url(&self, voice: &VoiceId) -> String {
        format!(
            "{}/v1/text-to-speech/{}?output_format={OUTPUT_FORMAT}",
            self.config.base_url.trim_end_matches('/'),
            voice.id()
        )
    }

    /// TTS speed for a pacing factor, clamped to what the API accepts.
    pub fn speed(pacing: PacingFactor) -> f64 {
        pacing.speech_rate().clamp(MIN_SPEED, MAX_SPEED)
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceId,
        pacing: PacingFactor,
    ) -> Result<AudioSegment, CollaboratorError> {
        let body = TtsBody {
            text,
            model_id: &self.config.model_id,
            voice_settings: VoiceSettings {
                stability: self.config.stability,
                similarity_boost: self.config.similarity_boost,
                speed: Self::speed(pacing),
            },
        };
        let resp = self
            .inner
            .post(self.url(voice))
            .header(XI_API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(ACCEPT, "audio/pcm")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Err(CollaboratorError::Rejected(
                "synthesis returned no audio".to_string(),
            ));
        }
        let segment = AudioSegment::from_le_bytes(&bytes, SAMPLE_RATE);
        tracing::debug!(
            voice = %voice,
            seconds = segment.duration_seconds(),
            "speech synthesized"
        );
        Ok(segment)
    }
}
