//! Bag-of-words cosine similarity.
//!
//! Deterministic and model-free, which makes it the default
//! for offline runs and tests. It rewards shared vocabulary, so paraphrases
//! score lower than they would under an embedding model.

use async_trait::async_trait;
use fluent_podcast_domain::SimilarityScore;
use hashbrown::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

use super::SimilarityScorer;
use crate::error::ScoringError;

const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have", "he",
    "her", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "me", "more", "most",
    "my", "of", "on", "or", "our", "really", "she", "so", "some", "such", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "those", "to", "very", "was",
    "we", "were", "what", "when", "which", "while", "who", "will", "with", "would", "you",
    "your",
];

#[derive(Debug, Clone)]
pub struct LexicalScorer {
    stopwords: HashSet<&'static str>,
}

impl Default for LexicalScorer {
    fn default() -> Self {
        Self {
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }
}

impl LexicalScorer {
    pub fn new() -> Self {
        Self::default()
    }

    fn term_frequencies(&self, text: &str) -> HashMap<String, f32> {
        let mut tf = HashMap::new();
        for token in text
            .unicode_words()
            .map(str::to_lowercase)
            .filter(|t| !self.stopwords.contains(t.as_str()))
        {
            *tf.entry(token).or_insert(0.0) += 1.0;
        }
        tf
    }

    /// Synchronous scoring, shared by the trait methods.
    pub fn similarity(&self, a: &str, b: &str) -> SimilarityScore {
        let (ta, tb) = (self.term_frequencies(a), self.term_frequencies(b));
        if ta.is_empty() || tb.is_empty() {
            return SimilarityScore::ZERO;
        }
        let dot: f32 = ta
            .iter()
            .filter_map(|(term, x)| tb.get(term).map(|y| x * y))
            .sum();
        let norm = |tf: &HashMap<String, f32>| tf.values().map(|v| v * v).sum::<f32>().sqrt();
        SimilarityScore::new(dot / (norm(&ta) * norm(&tb)))
    }
}

#[async_trait]
impl SimilarityScorer for LexicalScorer {
    async fn score(&self, a: &str, b: &str) -> Result<SimilarityScore, ScoringError> {
        Ok(self.similarity(a, b))
    }

    async fn score_many(
        &self,
        claim: &str,
        candidates: &[String],
    ) -> Result<Vec<SimilarityScore>, ScoringError> {
        Ok(candidates
            .iter()
            .map(|candidate| self.similarity(claim, candidate))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_scores_one() {
        let scorer = LexicalScorer::new();
        let s = scorer.similarity("Wheat yields dropped 6%.", "wheat yields dropped 6");
        assert!((s.value() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn words_follow_unicode_boundaries() {
        let scorer = LexicalScorer::new();
        let s = scorer.similarity("Yields didn't recover in Zürich.", "zürich yields didn't recover");
        assert!((s.value() - 1.0).abs() < 1e-6);
        let split = scorer.similarity("didn't", "didn t");
        assert_eq!(split.value(), 0.0);
    }

    #[test]
    fn disjoint_or_empty_text_scores_zero() {
        let scorer = LexicalScorer::new();
        assert_eq!(scorer.similarity("Pigs can fly.", "Wheat yields dropped.").value(), 0.0);
        assert_eq!(scorer.similarity("the and of", "Wheat yields.").value(), 0.0);
        assert_eq!(scorer.similarity("", "").value(), 0.0);
    }

    #[test]
    fn symmetric_and_bounded() {
        let scorer = LexicalScorer::new();
        let pairs = [
            ("Drought cut wheat yields by 6%.", "Wheat yields dropped 6% after drought."),
            ("Rain returned in spring.", "Spring rain helped the recovery of yields."),
        ];
        for (a, b) in pairs {
            let ab = scorer.similarity(a, b).value();
            let ba = scorer.similarity(b, a).value();
            assert!((ab - ba).abs() < 1e-6);
            assert!((0.0..=1.0).contains(&ab));
            assert!(ab > 0.0);
        }
    }

    #[tokio::test]
    async fn score_many_preserves_candidate_order() {
        let scorer = LexicalScorer::new();
        let candidates = vec!["pigs".to_string(), "wheat yields".to_string()];
        let scores = scorer.score_many("wheat yields", &candidates).await.unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].value(), 0.0);
        assert!((scores[1].value() - 1.0).abs() < 1e-6);
    }
}
