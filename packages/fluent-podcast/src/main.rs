// src/main.rs
// ─────────────────────────────────────────────────────────────────────────────
// fluent-podcast CLI
//
//  ❯ fluent-podcast paper.txt
//  ❯ fluent-podcast paper.txt -o out/episode.wav --target-seconds 240
//  ❯ fluent-podcast paper.txt --skip-audio --scorer embedding -v
// ─────────────────────────────────────────────────────────────────────────────

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use fluent_podcast::{
    Credentials, PodcastConfig, PodcastPipeline, Segmenter,
    collaborators::{ElevenLabsSynthesizer, LlmScriptGenerator, LlmSummarizer, OpenAiChatClient},
    scoring::{LexicalScorer, SimilarityScorer},
    write_wav,
};

/// Exit code when no script fit the target duration within the allowed regenerations.
const EXIT_UNFITTED: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScorerKind {
    /// Term-frequency cosine, no model download.
    Lexical,
    /// Sentence-transformer embeddings (needs the `embeddings` feature).
    Embedding,
}

/// CLI switches.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Article text file.
    input: PathBuf,

    /// Output WAV file (default `<output_dir>/podcast.wav`).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the script next to the audio.
    #[arg(long, overrides_with = "no_save_script")]
    save_script: bool,

    /// Do not write the script.
    #[arg(long)]
    no_save_script: bool,

    /// Script output path (default `<output>` with `_script.txt`).
    #[arg(long)]
    script_file: Option<PathBuf>,

    /// Report output path (default `<output>` with `_report.json`).
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dotenv file with API keys.
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Stop after fitting; no speech synthesis.
    #[arg(long)]
    skip_audio: bool,

    /// Similarity threshold a claim must reach.
    #[arg(long)]
    threshold: Option<f32>,

    /// Target podcast length in seconds.
    #[arg(long)]
    target_seconds: Option<f64>,

    #[arg(long, value_enum, default_value_t = ScorerKind::Lexical)]
    scorer: ScorerKind,

    /// Debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = configure_logging(args.verbose) {
        eprintln!("failed to initialize logging: {e:#}");
    }

    match async_main(args).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn configure_logging(verbose: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let directive = if verbose {
        "fluent_podcast=debug"
    } else {
        "fluent_podcast=info"
    };
    // Only fails if a subscriber is already installed.
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .context("failed to parse tracing directive")?,
            ),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
    Ok(())
}

async fn async_main(args: Args) -> Result<ExitCode> {
    // ───────────── configuration & credentials ─────────────────────────────
    match &args.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("failed to load env file {}", path.display()))?;
        }
        None => {
            // A missing `.env` is normal.
            let _ = dotenvy::dotenv();
        }
    }

    let mut config = match &args.config {
        Some(path) => PodcastConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PodcastConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.verification.threshold = threshold;
    }
    if let Some(target) = args.target_seconds {
        config.fitting.target_seconds = target;
    }
    if args.save_script {
        config.output.save_script = true;
    } else if args.no_save_script {
        config.output.save_script = false;
    }
    config.validate().context("invalid configuration")?;

    let credentials = Credentials::from_env();
    tracing::debug!(?credentials, "credentials loaded");

    let article = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("failed to read article {}", args.input.display()))?;

    // ───────────── collaborators ──────────────────────────────────────────
    let chat = Arc::new(OpenAiChatClient::new(
        credentials.openai()?,
        config.llm.clone(),
    ));
    let summarizer = Arc::new(LlmSummarizer::new(
        chat.clone(),
        Segmenter::new(&config.verification.abbreviations),
        config.summarizer.chunk_words,
    ));
    let generator = Arc::new(LlmScriptGenerator::new(
        chat,
        config.duration.speaking_rate_wpm,
    ));
    let scorer = build_scorer(args.scorer).await?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.output.default_output_dir.join("podcast.wav"));
    let script_path = args
        .script_file
        .clone()
        .unwrap_or_else(|| sibling(&output, "_script.txt"));
    let report_path = args
        .report
        .clone()
        .unwrap_or_else(|| sibling(&output, "_report.json"));
    let save_script = config.output.save_script;
    let names = config.hosts.names.clone();

    let mut pipeline = PodcastPipeline::new(config, scorer, summarizer, generator)
        .context("invalid configuration")?;
    if !args.skip_audio {
        let synthesizer =
            ElevenLabsSynthesizer::new(credentials.elevenlabs()?, pipeline.config().tts.clone());
        pipeline = pipeline.with_synthesizer(Arc::new(synthesizer));
    }

    // ───────────── run ────────────────────────────────────────────────────
    let run = pipeline.run(&article).await?;
    let mut report = run.report.clone();

    if save_script {
        write_file(&script_path, &run.script.render(&names)).await?;
        report.script_file = Some(script_path.clone());
        tracing::info!(path = %script_path.display(), "script written");
    }

    if let Some(audio) = &run.audio {
        write_wav(&output, audio)
            .with_context(|| format!("failed to write audio {}", output.display()))?;
        report.output_file = Some(output.clone());
    }

    report
        .save(&report_path)
        .with_context(|| format!("failed to write report {}", report_path.display()))?;
    tracing::info!(path = %report_path.display(), "report written");

    if !run.is_fitted() {
        tracing::error!(
            attempts = report.regeneration_attempts,
            estimated_seconds = report.estimated_duration_seconds,
            "no script fit the target duration"
        );
        return Ok(ExitCode::from(EXIT_UNFITTED));
    }
    Ok(ExitCode::SUCCESS)
}

async fn build_scorer(kind: ScorerKind) -> Result<Arc<dyn SimilarityScorer>> {
    match kind {
        ScorerKind::Lexical => Ok(Arc::new(LexicalScorer::new())),
        #[cfg(feature = "embeddings")]
        ScorerKind::Embedding => {
            use fluent_podcast::scoring::{DEFAULT_EMBEDDING_MODEL, EmbeddingScorer};
            let scorer = EmbeddingScorer::load(DEFAULT_EMBEDDING_MODEL)
                .await
                .context("failed to load embedding model")?;
            Ok(Arc::new(scorer))
        }
        #[cfg(not(feature = "embeddings"))]
        ScorerKind::Embedding => {
            anyhow::bail!("the embedding scorer needs a build with `--features embeddings`")
        }
    }
}

/// `dir/podcast.wav` + `_report.json` → `dir/podcast_report.json`.
fn sibling(output: &Path, suffix: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "podcast".to_string());
    output.with_file_name(format!("{stem}{suffix}"))
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}
