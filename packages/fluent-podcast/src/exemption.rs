//! Conversational filler that is not fact-checked.

use fluent_podcast_domain::Claim;
use hashbrown::HashSet;
use regex::{Regex, RegexBuilder};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::ExemptionConfig;
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct ExemptionRules {
    patterns: Vec<Regex>,
    filler_words: HashSet<String>,
    max_filler_words: usize,
}

impl Default for ExemptionRules {
    /// The default filler lexicon without any patterns.
    fn default() -> Self {
        let config = ExemptionConfig::default();
        Self {
            patterns: Vec::new(),
            filler_words: lexicon(&config.filler_words),
            max_filler_words: config.max_filler_words,
        }
    }
}

impl ExemptionRules {
    /// Compile the configured patterns. Each must match the whole claim.
    pub fn from_config(config: &ExemptionConfig) -> Result<Self, ConfigError> {
        let patterns = config
            .patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(&format!("^(?:{pattern})$"))
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ConfigError::Pattern {
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            patterns,
            filler_words: lexicon(&config.filler_words),
            max_filler_words: config.max_filler_words,
        })
    }

    /// No patterns and no filler: every claim is checked.
    pub fn none() -> Self {
        Self {
            patterns: Vec::new(),
            filler_words: HashSet::new(),
            max_filler_words: 0,
        }
    }

    pub fn is_exempt(&self, claim: &Claim) -> bool {
        let text = claim.text.trim();
        self.is_filler(text) || self.patterns.iter().any(|re| re.is_match(text))
    }

    /// Short claims made only of filler words, such as "Oh, really?".
    fn is_filler(&self, text: &str) -> bool {
        let words: Vec<String> = text.unicode_words().map(str::to_lowercase).collect();
        !words.is_empty()
            && words.len() <= self.max_filler_words
            && words.iter().all(|w| self.filler_words.contains(w))
    }
}

fn lexicon(words: &[String]) -> HashSet<String> {
    words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}
