mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::*;
use fluent_podcast::collaborators::{
    ChatCompletion, ChatMessage, LlmScriptGenerator, LlmSummarizer, RetryPolicy,
};
use fluent_podcast::domain::{
    FittingDecision, HostVoices, PacingFactor, RegenerationReason, ScriptError, Speaker, Verdict,
};
use fluent_podcast::error::{CollaboratorError, PodcastError, ScoringError, Stage};
use fluent_podcast::{PodcastPipeline, Segmenter, write_wav};

/// 21 words: one greeting, two supported claims, two unsupported ones.
fn mixed_script() -> Vec<fluent_podcast::domain::DraftTurn> {
    vec![
        turn(
            Speaker::Host,
            "Welcome to the show! Wheat yields dropped 6% in 2023. Pigs can fly.",
        ),
        turn(Speaker::CoHost, "Drought was the main cause. Cows sing loudly."),
    ]
}

fn unfiltered() -> fluent_podcast::PodcastConfig {
    let mut config = config();
    config.verification.filter_unverified = false;
    config
}

#[tokio::test]
async fn flagged_claims_follow_script_order() {
    let generator = ScriptedGenerator::drafts(vec![mixed_script()]);
    let run = pipeline(unfiltered(), Arc::new(TruncatingSummarizer), generator)
        .run(ARTICLE)
        .await
        .unwrap();

    let report = &run.report;
    assert_eq!(report.total_claims, 4);
    assert_eq!(report.passed_claims, 2);
    assert_eq!(report.verification_percentage, 50.0);
    assert!(!report.verified);
    assert!(!report.filtered);

    let flagged: Vec<(&str, usize)> = report
        .flagged_claims
        .iter()
        .map(|f| (f.claim.as_str(), f.source_turn_index))
        .collect();
    assert_eq!(flagged, vec![("Pigs can fly.", 0), ("Cows sing loudly.", 1)]);
    assert!(report.flagged_claims.iter().all(|f| f.verdict == Verdict::Failed));
    assert!(report.flagged_claims.iter().all(|f| f.evidence.is_some()));

    assert_eq!(report.fitting_decision, FittingDecision::Accept);
    assert_eq!(report.script_words, 21);
    assert!((report.estimated_duration_seconds - 21.0).abs() < 1e-9);
    assert!(run.audio.is_none());
    assert!(run.is_fitted());
}

/// 80% verified; filtering leaves 21 words.
fn mostly_supported() -> Vec<fluent_podcast::domain::DraftTurn> {
    vec![
        turn(
            Speaker::Host,
            "Wheat yields dropped 6% in 2023. Drought was the main cause.",
        ),
        turn(Speaker::CoHost, "Farmers planted earlier to cope. Pigs can fly."),
        turn(Speaker::Host, "Prices rose across the region."),
    ]
}

/// Every co-host sentence is unsupported, so filtering removes the co-host.
fn co_host_unsupported() -> Vec<fluent_podcast::domain::DraftTurn> {
    vec![
        turn(
            Speaker::Host,
            "Wheat yields dropped 6% in 2023. Drought was the main cause.",
        ),
        turn(Speaker::CoHost, "Pigs can fly. Cows sing loudly."),
    ]
}

#[tokio::test]
async fn low_verification_filters_unsupported_sentences() {
    let generator = ScriptedGenerator::drafts(vec![mostly_supported()]);
    let run = pipeline(config(), Arc::new(TruncatingSummarizer), generator)
        .run(ARTICLE)
        .await
        .unwrap();

    assert!(run.report.filtered);
    // The report describes the script as composed, before filtering.
    assert_eq!(run.report.verification_percentage, 80.0);
    assert_eq!(run.report.flagged_claims[0].claim, "Pigs can fly.");
    assert_eq!(run.report.flagged_claims[0].source_turn_index, 1);

    assert_eq!(run.script.len(), 3);
    assert!(run.script.turns().iter().all(|t| !t.text.contains("Pigs")));
    assert_eq!(run.script.turns()[1].text, "Farmers planted earlier to cope.");
    assert_eq!(run.report.fitting_decision, FittingDecision::Accept);
    assert_eq!(run.report.script_words, 21);
}

#[tokio::test]
async fn filtering_away_a_host_triggers_regeneration() {
    let generator = ScriptedGenerator::drafts(vec![co_host_unsupported(), mostly_supported()]);
    let run = pipeline(config(), Arc::new(TruncatingSummarizer), generator.clone())
        .run(ARTICLE)
        .await
        .unwrap();

    assert_eq!(*generator.targets.lock(), vec![20, 20]);
    assert_eq!(run.report.regeneration_attempts, 1);
    assert!(run.report.filtered);
    assert_eq!(run.report.verification_percentage, 80.0);
    assert_eq!(run.report.fitting_decision, FittingDecision::Accept);
}

#[tokio::test]
async fn filtering_away_a_host_fails_once_regenerations_run_out() {
    let generator = ScriptedGenerator::drafts(vec![co_host_unsupported()]);
    let err = pipeline(config(), Arc::new(TruncatingSummarizer), generator.clone())
        .run(ARTICLE)
        .await
        .unwrap_err();

    assert_eq!(generator.calls(), 3);
    assert!(matches!(
        err,
        PodcastError::MalformedScript(ScriptError::MissingSpeaker(Speaker::CoHost))
    ));
}

#[tokio::test]
async fn overlong_script_is_regenerated_with_a_smaller_target() {
    let generator = ScriptedGenerator::drafts(vec![
        vec![turn(Speaker::Host, &words(20)), turn(Speaker::CoHost, &words(20))],
        vec![turn(Speaker::Host, &words(10)), turn(Speaker::CoHost, &words(10))],
    ]);
    let run = pipeline(unfiltered(), Arc::new(TruncatingSummarizer), generator.clone())
        .run(ARTICLE)
        .await
        .unwrap();

    assert_eq!(*generator.targets.lock(), vec![20, 10]);
    assert_eq!(run.report.regeneration_attempts, 1);
    assert_eq!(run.report.fitting_decision, FittingDecision::Accept);
    assert_eq!(run.script.word_count(), 20);
}

#[tokio::test]
async fn exhausted_regeneration_keeps_script_but_skips_audio() {
    let generator = ScriptedGenerator::drafts(vec![vec![
        turn(Speaker::Host, &words(20)),
        turn(Speaker::CoHost, &words(20)),
    ]]);
    let synthesizer = BeepSynthesizer::new();
    let run = pipeline(unfiltered(), Arc::new(TruncatingSummarizer), generator.clone())
        .with_synthesizer(synthesizer.clone())
        .run(ARTICLE)
        .await
        .unwrap();

    assert_eq!(generator.calls(), 3);
    assert_eq!(run.report.regeneration_attempts, 2);
    assert_eq!(
        run.report.fitting_decision,
        FittingDecision::RequestRegeneration {
            reason: RegenerationReason::TooLong
        }
    );
    assert!(!run.is_fitted());
    assert!(run.audio.is_none());
    assert!(synthesizer.voices.lock().is_empty());
    assert_eq!(run.script.word_count(), 40);
}

#[tokio::test]
async fn short_script_is_paced_and_synthesized_with_that_pacing() {
    let mut config = unfiltered();
    config.fitting.target_seconds = 100.0;
    config.fitting.tolerance = 0.05;
    let generator = ScriptedGenerator::drafts(vec![vec![
        turn(Speaker::Host, &words(45)),
        turn(Speaker::CoHost, &words(45)),
    ]]);
    let synthesizer = BeepSynthesizer::new();
    let run = pipeline(config, Arc::new(TruncatingSummarizer), generator)
        .with_synthesizer(synthesizer.clone())
        .run(ARTICLE)
        .await
        .unwrap();

    let factor = PacingFactor::new(1.11);
    assert_eq!(
        run.report.fitting_decision,
        FittingDecision::AcceptWithPacing { factor }
    );
    assert_eq!(run.report.pacing_factor, 1.11);
    assert!((run.report.estimated_duration_seconds - 99.9).abs() < 1e-9);
    assert_eq!(*synthesizer.pacing.lock(), vec![factor, factor]);
}

#[tokio::test]
async fn audio_alternates_voices_and_round_trips_through_wav() {
    let synthesizer = BeepSynthesizer::new();
    let generator = ScriptedGenerator::drafts(vec![mixed_script()]);
    let run = pipeline(unfiltered(), Arc::new(TruncatingSummarizer), generator)
        .with_synthesizer(synthesizer.clone())
        .run(ARTICLE)
        .await
        .unwrap();

    let voices = HostVoices::default();
    assert_eq!(*synthesizer.voices.lock(), vec![voices.host, voices.co_host]);

    let audio = run.audio.expect("fitted script should be synthesized");
    assert_eq!(audio.samples.len(), 21);
    assert_eq!(run.report.audio_duration_seconds, Some(2.1));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("podcast.wav");
    write_wav(&path, &audio).unwrap();
    let mut reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().sample_rate, BEEP_RATE);
    let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
    assert_eq!(samples, audio.samples);
}

#[tokio::test(start_paused = true)]
async fn transient_generator_failure_is_retried() {
    let generator = ScriptedGenerator::new(vec![
        Err(CollaboratorError::Transient("HTTP 503".into())),
        Ok(mixed_script()),
    ]);
    let run = PodcastPipeline::new(
        unfiltered(),
        Arc::new(fluent_podcast::scoring::LexicalScorer::new()),
        Arc::new(TruncatingSummarizer),
        generator.clone(),
    )
    .unwrap()
    .with_retry(RetryPolicy::default())
    .run(ARTICLE)
    .await
    .unwrap();

    assert_eq!(generator.calls(), 2);
    assert_eq!(run.report.fitting_decision, FittingDecision::Accept);
}

#[tokio::test]
async fn summarizer_failure_aborts_before_composition() {
    let generator = ScriptedGenerator::drafts(vec![mixed_script()]);
    let err = pipeline(
        config(),
        Arc::new(FailingSummarizer(CollaboratorError::Authentication(
            "HTTP 401".into(),
        ))),
        generator.clone(),
    )
    .run(ARTICLE)
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        PodcastError::SummarizationUnavailable {
            cause: CollaboratorError::Authentication(_)
        }
    ));
    assert_eq!(err.stage(), Stage::Analysis);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn malformed_script_aborts_before_verification() {
    let generator = ScriptedGenerator::drafts(vec![vec![turn(
        Speaker::Host,
        "Wheat yields dropped 6% in 2023.",
    )]]);
    // Scoring would fail, so reaching verification would surface a different error.
    let err = PodcastPipeline::new(
        config(),
        Arc::new(UnavailableScorer),
        Arc::new(TruncatingSummarizer),
        generator,
    )
    .unwrap()
    .with_retry(no_retry())
    .run(ARTICLE)
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        PodcastError::MalformedScript(ScriptError::MissingSpeaker(Speaker::CoHost))
    ));
}

#[tokio::test]
async fn scorer_outage_aborts_in_verification() {
    let generator = ScriptedGenerator::drafts(vec![mixed_script()]);
    let err = PodcastPipeline::new(
        config(),
        Arc::new(UnavailableScorer),
        Arc::new(TruncatingSummarizer),
        generator,
    )
    .unwrap()
    .with_retry(no_retry())
    .run(ARTICLE)
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        PodcastError::ScoringUnavailable {
            stage: Stage::Verification,
            cause: ScoringError::Unavailable(_)
        }
    ));
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let mut config = config();
    config.verification.threshold = 1.5;
    let result = PodcastPipeline::new(
        config,
        Arc::new(UnavailableScorer),
        Arc::new(TruncatingSummarizer),
        ScriptedGenerator::drafts(Vec::new()),
    );
    assert!(result.is_err());
}

/// Answers every request with the same two-host dialogue.
struct DialogueChat;

const DIALOGUE: &str = "**Alex:** Welcome to the show! Wheat yields dropped 6% in 2023.
Sam: Drought was the main cause.
(music fades)
Alex: Farmers planted earlier to cope.";

#[async_trait]
impl ChatCompletion for DialogueChat {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, CollaboratorError> {
        Ok(DIALOGUE.to_string())
    }
}

#[tokio::test]
async fn chat_backed_collaborators_produce_a_verified_script() {
    let config = config();
    let chat: Arc<dyn ChatCompletion> = Arc::new(DialogueChat);
    let summarizer = LlmSummarizer::new(chat.clone(), Segmenter::default(), 900);
    let generator = LlmScriptGenerator::new(chat, config.duration.speaking_rate_wpm);
    let names = config.hosts.names.clone();

    let run = pipeline(config, Arc::new(summarizer), Arc::new(generator))
        .run(ARTICLE)
        .await
        .unwrap();

    assert_eq!(run.report.verification_percentage, 100.0);
    assert!(run.report.verified);
    assert!(run.report.flagged_claims.is_empty());
    assert_eq!(run.report.fitting_decision, FittingDecision::Accept);
    assert_eq!(
        run.script.render(&names),
        "Alex: Welcome to the show! Wheat yields dropped 6% in 2023.\n\
         Sam: Drought was the main cause.\n\
         Alex: Farmers planted earlier to cope.\n"
    );
}
