//! Speech synthesis of a fitted script and WAV output.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use fluent_podcast_domain::{AudioSegment, HostVoices, PacingFactor, Script};

use crate::collaborators::{RetryPolicy, SpeechSynthesizer};
use crate::error::PodcastError;

/// Pause between synthesis calls to stay clear of rate limits.
pub const DEFAULT_CALL_DELAY: Duration = Duration::from_millis(100);

pub struct AudioProducer {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    voices: HostVoices,
    pause_seconds: f64,
    call_delay: Duration,
    retry: RetryPolicy,
}

impl AudioProducer {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        voices: HostVoices,
        pause_seconds: f64,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            synthesizer,
            voices,
            pause_seconds,
            call_delay: DEFAULT_CALL_DELAY,
            retry,
        }
    }

    pub fn with_call_delay(mut self, call_delay: Duration) -> Self {
        self.call_delay = call_delay;
        self
    }

    /// Synthesize every turn in order, separated by silence.
    ///
    /// Pauses are stretched by the same factor as speech so the output
    /// tracks the paced estimate.
    pub async fn produce(
        &self,
        script: &Script,
        pacing: PacingFactor,
    ) -> Result<AudioSegment, PodcastError> {
        let mut audio: Option<AudioSegment> = None;
        let pause = self.pause_seconds * pacing.value();

        for (i, turn) in script.turns().iter().enumerate() {
            if i > 0 && !self.call_delay.is_zero() {
                tokio::time::sleep(self.call_delay).await;
            }
            let voice = self.voices.voice(turn.speaker);
            let segment = self
                .retry
                .run("synthesize", || {
                    self.synthesizer.synthesize(&turn.text, voice, pacing)
                })
                .await
                .map_err(|cause| PodcastError::SynthesisUnavailable { cause })?;
            tracing::debug!(
                turn = turn.index,
                speaker = %turn.speaker,
                seconds = segment.duration_seconds(),
                "turn synthesized"
            );

            match audio.as_mut() {
                None => audio = Some(segment),
                Some(track) => {
                    track.append(&AudioSegment::silence(pause, track.sample_rate))?;
                    track.append(&segment)?;
                }
            }
        }

        let audio = audio.ok_or_else(|| PodcastError::Audio("script has no turns".to_string()))?;
        tracing::info!(
            turns = script.len(),
            seconds = audio.duration_seconds(),
            "audio produced"
        );
        Ok(audio)
    }
}

/// Write 16-bit mono WAV.
pub fn write_wav(path: &Path, audio: &AudioSegment) -> Result<(), PodcastError> {
    let io_err = |source: std::io::Error| PodcastError::Io {
        path: path.to_path_buf(),
        source,
    };
    let hound_err = |e: hound::Error| match e {
        hound::Error::IoError(source) => io_err(source),
        other => PodcastError::Audio(other.to_string()),
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).map_err(hound_err)?;
    for sample in &audio.samples {
        writer.write_sample(*sample).map_err(hound_err)?;
    }
    writer.finalize().map_err(hound_err)?;
    tracing::info!(path = %path.display(), seconds = audio.duration_seconds(), "wav written");
    Ok(())
}
