//! Sentence-transformer similarity on candle.
//!
//! Mean-pooled BERT embeddings compared by cosine similarity. Embeddings are
//! cached per text, so each article sentence is embedded once per scorer no
//! matter how many claims it is compared against.

use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config, DTYPE};
use fluent_podcast_domain::SimilarityScore;
use hashbrown::HashMap;
use hf_hub::api::tokio::Api;
use parking_lot::Mutex;
use tokenizers::{Encoding, PaddingParams, Tokenizer, TruncationParams};

use super::SimilarityScorer;
use crate::error::ScoringError;

pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

type Embedding = Arc<Vec<f32>>;

#[derive(Clone)]
pub struct EmbeddingScorer {
    inner: Arc<Inner>,
}

struct Inner {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    cache: Mutex<HashMap<String, Embedding>>,
}

fn backend(err: impl std::fmt::Display) -> ScoringError {
    ScoringError::Backend(err.to_string())
}

fn device_helper() -> Device {
    #[cfg(feature = "metal")]
    {
        if let Ok(device) = Device::new_metal(0) {
            return device;
        }
    }
    #[cfg(feature = "cuda")]
    {
        if let Ok(device) = Device::new_cuda(0) {
            return device;
        }
    }
    Device::Cpu
}

impl EmbeddingScorer {
    /// Download (or reuse the hub cache for) `model_id` and load it.
    pub async fn load(model_id: &str) -> Result<Self, ScoringError> {
        let api = Api::new().map_err(|e| ScoringError::Unavailable(e.to_string()))?;
        let repo = api.model(model_id.to_string());
        let fetch = |name: &'static str| {
            let repo = &repo;
            async move {
                repo.get(name)
                    .await
                    .map_err(|e| ScoringError::Unavailable(format!("{model_id}/{name}: {e}")))
            }
        };
        let config_path = fetch("config.json").await?;
        let tokenizer_path = fetch("tokenizer.json").await?;
        let weights_path = fetch("model.safetensors").await?;

        let inner = tokio::task::spawn_blocking(move || -> Result<Inner, ScoringError> {
            let device = device_helper();
            let config: Config =
                serde_json::from_str(&std::fs::read_to_string(config_path).map_err(backend)?)
                    .map_err(backend)?;

            let mut tokenizer = Tokenizer::from_file(tokenizer_path).map_err(backend)?;
            tokenizer.with_padding(Some(PaddingParams::default()));
            tokenizer
                .with_truncation(Some(TruncationParams {
                    max_length: 256,
                    ..Default::default()
                }))
                .map_err(backend)?;

            let vb = unsafe {
                VarBuilder::from_mmaped_safetensors(&[weights_path], DTYPE, &device)
                    .map_err(backend)?
            };
            let model = BertModel::load(vb, &config).map_err(backend)?;
            Ok(Inner {
                model,
                tokenizer,
                device,
                cache: Mutex::new(HashMap::new()),
            })
        })
        .await
        .map_err(backend)??;

        tracing::info!(model = model_id, "embedding model loaded");
        Ok(Self {
            inner: Arc::new(inner),
        })
    }
}

impl Inner {
    /// Embeddings for `texts`, in order, computing only cache misses.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>, ScoringError> {
        let missing: Vec<String> = {
            let cache = self.cache.lock();
            let mut seen = hashbrown::HashSet::new();
            texts
                .iter()
                .filter(|t| !cache.contains_key(**t) && seen.insert(**t))
                .map(|t| t.to_string())
                .collect()
        };

        if !missing.is_empty() {
            let vectors = self.forward(&missing)?;
            let mut cache = self.cache.lock();
            for (text, vector) in missing.into_iter().zip(vectors) {
                cache.insert(text, Arc::new(vector));
            }
        }

        let cache = self.cache.lock();
        texts
            .iter()
            .map(|t| {
                cache
                    .get(*t)
                    .cloned()
                    .ok_or_else(|| backend(format!("embedding for {t:?} missing after encode")))
            })
            .collect()
    }

    fn forward(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ScoringError> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(backend)?;

        let ids = stack_rows(&encodings, &self.device, Encoding::get_ids)?;
        let type_ids = stack_rows(&encodings, &self.device, Encoding::get_type_ids)?;
        let mask = stack_rows(&encodings, &self.device, Encoding::get_attention_mask)?;

        let hidden = self
            .model
            .forward(&ids, &type_ids, Some(&mask))
            .map_err(backend)?;

        // Mean over real tokens only.
        let mask = mask
            .to_dtype(DType::F32)
            .and_then(|m| m.unsqueeze(2))
            .map_err(backend)?;
        let summed = hidden
            .to_dtype(DType::F32)
            .and_then(|h| h.broadcast_mul(&mask))
            .and_then(|h| h.sum(1))
            .map_err(backend)?;
        let counts = mask.sum(1).map_err(backend)?;
        let pooled = summed.broadcast_div(&counts).map_err(backend)?;

        let vectors = pooled.to_vec2::<f32>().map_err(backend)?;
        if vectors.len() != texts.len() {
            return Err(ScoringError::Malformed {
                expected: texts.len(),
                got: vectors.len(),
            });
        }
        Ok(vectors)
    }
}

/// One row per encoding, from the given per-token field.
fn stack_rows(
    encodings: &[Encoding],
    device: &Device,
    field: fn(&Encoding) -> &[u32],
) -> Result<Tensor, ScoringError> {
    let rows = encodings
        .iter()
        .map(|e| Tensor::new(field(e), device))
        .collect::<candle_core::Result<Vec<_>>>()
        .map_err(backend)?;
    Tensor::stack(&rows, 0).map_err(backend)
}

fn cosine(a: &[f32], b: &[f32]) -> SimilarityScore {
    let (mut dot, mut na, mut nb) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return SimilarityScore::ZERO;
    }
    SimilarityScore::new(dot / (na.sqrt() * nb.sqrt()))
}

#[async_trait]
impl SimilarityScorer for EmbeddingScorer {
    async fn score(&self, a: &str, b: &str) -> Result<SimilarityScore, ScoringError> {
        let scores = self.score_many(a, &[b.to_string()]).await?;
        scores.into_iter().next().ok_or(ScoringError::Malformed {
            expected: 1,
            got: 0,
        })
    }

    async fn score_many(
        &self,
        claim: &str,
        candidates: &[String],
    ) -> Result<Vec<SimilarityScore>, ScoringError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let inner = Arc::clone(&self.inner);
        let claim = claim.to_string();
        let candidates = candidates.to_vec();

        tokio::task::spawn_blocking(move || {
            let mut texts: Vec<&str> = Vec::with_capacity(candidates.len() + 1);
            texts.push(&claim);
            texts.extend(candidates.iter().map(String::as_str));
            let embeddings = inner.embed(&texts)?;
            let (query, rest) = embeddings
                .split_first()
                .ok_or(ScoringError::Malformed {
                    expected: texts.len(),
                    got: 0,
                })?;
            Ok(rest.iter().map(|e| cosine(query, e)).collect())
        })
        .await
        .map_err(backend)?
    }
}
