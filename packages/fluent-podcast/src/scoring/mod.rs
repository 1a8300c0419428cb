//! Semantic similarity between claims and evidence.

use async_trait::async_trait;
use fluent_podcast_domain::SimilarityScore;

use crate::error::ScoringError;

#[cfg(feature = "embeddings")]
pub mod embedding;
pub mod lexical;

#[cfg(feature = "embeddings")]
pub use embedding::{EmbeddingScorer, DEFAULT_EMBEDDING_MODEL};
pub use lexical::LexicalScorer;

/// Scores how well one text supports another.
///
/// Implementations must be deterministic for a given pair of inputs and
/// return scores already clamped to `[0, 1]`.
#[async_trait]
pub trait SimilarityScorer: Send + Sync {
    async fn score(&self, a: &str, b: &str) -> Result<SimilarityScore, ScoringError>;

    /// Score `claim` against every candidate, preserving candidate order.
    ///
    /// Backends that can batch should override this.
    async fn score_many(
        &self,
        claim: &str,
        candidates: &[String],
    ) -> Result<Vec<SimilarityScore>, ScoringError> {
        let mut scores = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            scores.push(self.score(claim, candidate).await?);
        }
        Ok(scores)
    }
}
