//! Sentence segmentation for article text and script turns.
//!
//! The same segmenter produces both the article's evidence sentences and the
//! script's claims, so a sentence copied verbatim from the article into a
//! turn lines up exactly with its source.

use fluent_podcast_domain::{Claim, Script};
use hashbrown::HashSet;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::default_abbreviations;

const TERMINALS: [char; 6] = ['.', '!', '?', '\u{3002}', '\u{FF01}', '\u{FF1F}'];
const CLOSERS: [char; 9] = ['"', '\'', '\u{201D}', '\u{2019}', ')', ']', '}', '\u{BB}', '*'];
const OPENERS: [char; 7] = ['"', '\'', '\u{201C}', '\u{2018}', '(', '[', '\u{AB}'];

/// Splits text into trimmed sentence spans.
#[derive(Debug, Clone)]
pub struct Segmenter {
    /// Lowercased, without the trailing dot.
    abbreviations: HashSet<String>,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(default_abbreviations())
    }
}

impl Segmenter {
    pub fn new<I, S>(abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let abbreviations = abbreviations
            .into_iter()
            .map(|a| a.as_ref().trim().trim_end_matches('.').to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();
        Self { abbreviations }
    }

    /// Ordered, non-empty, trimmed sentence spans of `text`.
    pub fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut spans = Vec::new();
        for paragraph in paragraphs(text) {
            self.segment_paragraph(paragraph, &mut spans);
        }
        spans
    }

    /// Every sentence of every turn, tagged with its turn and ordinal.
    pub fn claims(&self, script: &Script) -> Vec<Claim> {
        let mut claims = Vec::new();
        for turn in script.turns() {
            for sentence in self.segment(&turn.text) {
                let ordinal = claims.len();
                claims.push(Claim::new(sentence, turn.index, ordinal));
            }
        }
        claims
    }

    /// Merge the UAX #29 sentence bounds of `paragraph` into spans.
    fn segment_paragraph<'a>(&self, paragraph: &'a str, spans: &mut Vec<&'a str>) {
        let bounds: Vec<(usize, &str)> = paragraph.split_sentence_bound_indices().collect();
        let mut start = None;
        for (i, &(offset, piece)) in bounds.iter().enumerate() {
            let begin = *start.get_or_insert(offset);
            let span = &paragraph[begin..offset + piece.len()];
            if let Some(&(_, next)) = bounds.get(i + 1)
                && self.joins_next(span, next)
            {
                continue;
            }
            push_span(span, spans);
            start = None;
        }
    }

    /// Whether the bound after `span` falls inside a sentence.
    fn joins_next(&self, span: &str, next: &str) -> bool {
        let span = span.trim_end();
        let unclosed = span.trim_end_matches(CLOSERS);
        // A line feed without terminal punctuation.
        if !unclosed.ends_with(TERMINALS) {
            return true;
        }
        // Only a lone, unquoted `.` can close an abbreviation or initial.
        let Some(body) = span.strip_suffix('.') else {
            return false;
        };
        if body.ends_with(TERMINALS) {
            return false;
        }

        let mut words = body.split_whitespace().rev().map(|w| w.trim_start_matches(OPENERS));
        let Some(word) = words.next().filter(|w| !w.is_empty()) else {
            return false;
        };
        let lowered = word.to_lowercase();
        if self.abbreviations.contains(&lowered) {
            return true;
        }

        let previous = words.next();
        // Two-word forms such as "et al."
        if let Some(previous) = previous
            && self
                .abbreviations
                .contains(&format!("{} {lowered}", previous.to_lowercase()))
        {
            return true;
        }

        // "J. Smith" or "Dr. J. Smith", but not "vitamin C. Yields".
        is_initial(word)
            && previous.is_none_or(starts_uppercase)
            && starts_uppercase(next.trim_start().trim_start_matches(OPENERS))
    }
}

fn is_initial(word: &str) -> bool {
    let mut letters = word.chars();
    matches!((letters.next(), letters.next()), (Some(c), None) if c.is_uppercase())
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

fn push_span<'a>(span: &'a str, spans: &mut Vec<&'a str>) {
    let span = span.trim();
    if !span.is_empty() {
        spans.push(span);
    }
}

/// Split on blank lines.
fn paragraphs(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            if offset > start {
                out.push(&text[start..offset]);
            }
            start = offset + line.len();
        }
        offset += line.len();
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluent_podcast_domain::{DraftTurn, Speaker};

    #[test]
    fn splits_on_terminal_punctuation() {
        let seg = Segmenter::default();
        assert_eq!(
            seg.segment("Yields fell. Why? Drought! \"It was severe.\" Next."),
            vec!["Yields fell.", "Why?", "Drought!", "\"It was severe.\"", "Next."]
        );
    }

    #[test]
    fn protects_abbreviations_initials_and_decimals() {
        let seg = Segmenter::default();
        let text = "Warming of 3.5°C was observed, e.g. in Kansas. Dr. J. Smith et al. agree. \
                    Compare Fig. 2 vs. Fig. 3.";
        assert_eq!(
            seg.segment(text),
            vec![
                "Warming of 3.5°C was observed, e.g. in Kansas.",
                "Dr. J. Smith et al. agree.",
                "Compare Fig. 2 vs. Fig. 3."
            ]
        );
    }

    #[test]
    fn lone_capitals_end_sentences_unless_they_start_a_name() {
        let seg = Segmenter::default();
        assert_eq!(
            seg.segment("Researchers added vitamin C. Yields rose 6%."),
            vec!["Researchers added vitamin C.", "Yields rose 6%."]
        );
        assert_eq!(
            seg.segment("Growth was strongest in the U.S. Prices fell in Europe."),
            vec!["Growth was strongest in the U.S.", "Prices fell in Europe."]
        );
        assert_eq!(
            seg.segment("Work by Prof. J. R. Tolkien appeared later."),
            vec!["Work by Prof. J. R. Tolkien appeared later."]
        );
        assert_eq!(
            seg.segment("the U.S. economy grew."),
            vec!["the U.S. economy grew."]
        );
    }

    #[test]
    fn wrapped_lines_stay_in_one_sentence() {
        let seg = Segmenter::default();
        assert_eq!(
            seg.segment("Yields dropped\nsharply in 2023. Rain returned."),
            vec!["Yields dropped\nsharply in 2023.", "Rain returned."]
        );
    }

    #[test]
    fn non_latin_scripts() {
        let seg = Segmenter::default();
        assert_eq!(
            seg.segment("Hello world.  Καλημέρα κόσμε!  你好。再见。"),
            vec!["Hello world.", "Καλημέρα κόσμε!", "你好。", "再见。"]
        );
    }

    #[test]
    fn blank_lines_end_headings() {
        let seg = Segmenter::default();
        assert_eq!(
            seg.segment("Results\n\nYields dropped 6%.\nThey recovered."),
            vec!["Results", "Yields dropped 6%.", "They recovered."]
        );
    }

    #[test]
    fn degenerate_inputs() {
        let seg = Segmenter::default();
        assert!(seg.segment("").is_empty());
        assert!(seg.segment("  \n\t ").is_empty());
        assert_eq!(seg.segment("no terminal punctuation"), vec!["no terminal punctuation"]);
    }

    #[test]
    fn single_sentence_is_a_fixed_point() {
        let seg = Segmenter::default();
        for sentence in ["Wheat yields dropped 6%.", "Is it e.g. common?", "Pigs can fly"] {
            assert_eq!(seg.segment(sentence), vec![sentence]);
            let again = seg.segment(seg.segment(sentence)[0]);
            assert_eq!(again, vec![sentence]);
        }
    }

    #[test]
    fn custom_abbreviation_list() {
        let seg = Segmenter::new(["Approx."]);
        assert_eq!(seg.segment("It took approx. ten days."), vec!["It took approx. ten days."]);
        assert_eq!(seg.segment("See Dr. Who."), vec!["See Dr.", "Who."]);
    }

    #[test]
    fn claims_keep_turn_linkage() {
        let script = Script::from_draft(vec![
            DraftTurn::new(Speaker::Host, "Welcome! Today: wheat."),
            DraftTurn::new(Speaker::CoHost, "Yields dropped 6%."),
        ])
        .unwrap();
        let claims = Segmenter::default().claims(&script);
        let linked: Vec<(usize, usize, &str)> = claims
            .iter()
            .map(|c| (c.ordinal, c.turn_index, c.text.as_str()))
            .collect();
        assert_eq!(
            linked,
            vec![
                (0, 0, "Welcome!"),
                (1, 0, "Today: wheat."),
                (2, 1, "Yields dropped 6%.")
            ]
        );
    }
}
