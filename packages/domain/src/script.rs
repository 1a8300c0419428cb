//! Validated two-host dialogue.

use serde::Serialize;

use crate::error::ScriptError;
use crate::speaker::{HostNames, Speaker};
use crate::turn::{DraftTurn, Turn};

/// Smallest script that still lets both roles speak.
pub const MIN_SCRIPT_TURNS: usize = 2;

/// Ordered, non-empty sequence of alternating turns in which both roles speak.
///
/// The only way to obtain a `Script` is through [`Script::from_draft`] (or
/// [`Script::parse_dialogue`], which drafts and then validates), so every
/// instance upholds the invariants checked there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Script {
    turns: Vec<Turn>,
}

impl Script {
    /// Validate generator output.
    ///
    /// Turn text is trimmed. Blank turns, empty scripts, adjacent turns by
    /// the same role and scripts missing a role are rejected.
    pub fn from_draft(draft: Vec<DraftTurn>) -> Result<Self, ScriptError> {
        if draft.is_empty() {
            return Err(ScriptError::Empty);
        }

        let mut turns: Vec<Turn> = Vec::with_capacity(draft.len());
        for (index, DraftTurn { speaker, text }) in draft.into_iter().enumerate() {
            let text = text.trim();
            if text.is_empty() {
                return Err(ScriptError::EmptyTurn { index });
            }
            if let Some(previous) = turns.last()
                && previous.speaker == speaker
            {
                return Err(ScriptError::NotAlternating { index, speaker });
            }
            turns.push(Turn {
                speaker,
                text: text.to_string(),
                index,
            });
        }

        for speaker in Speaker::ALL {
            if !turns.iter().any(|turn| turn.speaker == speaker) {
                return Err(ScriptError::MissingSpeaker(speaker));
            }
        }

        Ok(Self { turns })
    }

    /// Parse `Name: text` dialogue and validate it.
    pub fn parse_dialogue(text: &str, names: &HostNames) -> Result<Self, ScriptError> {
        Self::from_draft(draft_from_dialogue(text, names))
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false; kept for the `len`/`is_empty` pairing.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Total spoken words across all turns.
    pub fn word_count(&self) -> usize {
        self.turns.iter().map(Turn::word_count).sum()
    }

    /// Keep the first `keep` turns.
    ///
    /// Never goes below [`MIN_SCRIPT_TURNS`], so the result still satisfies
    /// the alternation invariants.
    pub fn truncated(&self, keep: usize) -> Self {
        let keep = keep.clamp(MIN_SCRIPT_TURNS.min(self.len()), self.len());
        Self {
            turns: self.turns[..keep].to_vec(),
        }
    }

    /// Render back to `Name: text` lines.
    pub fn render(&self, names: &HostNames) -> String {
        let mut out = String::new();
        for turn in &self.turns {
            out.push_str(names.name(turn.speaker));
            out.push_str(": ");
            out.push_str(&turn.text);
            out.push('\n');
        }
        out
    }
}

/// Turn raw `Name: text` dialogue into draft turns.
///
/// Lines without a known speaker label are stage directions and are skipped.
/// Consecutive lines from the same speaker are one turn split across lines,
/// so they are merged.
pub fn draft_from_dialogue(text: &str, names: &HostNames) -> Vec<DraftTurn> {
    let mut draft: Vec<DraftTurn> = Vec::new();
    for line in text.lines() {
        let Some((label, rest)) = line.trim().split_once(':') else {
            continue;
        };
        let Some(speaker) = names.resolve(label) else {
            continue;
        };
        let rest = rest.trim().trim_start_matches(['*', '_']).trim();

        match draft.last_mut() {
            Some(previous) if previous.speaker == speaker => {
                if !rest.is_empty() {
                    if !previous.text.is_empty() {
                        previous.text.push(' ');
                    }
                    previous.text.push_str(rest);
                }
            }
            _ => draft.push(DraftTurn::new(speaker, rest)),
        }
    }
    draft
}

/// Merge adjacent same-speaker drafts, used after turns have been removed.
pub fn merge_adjacent(draft: Vec<DraftTurn>) -> Vec<DraftTurn> {
    let mut merged: Vec<DraftTurn> = Vec::with_capacity(draft.len());
    for turn in draft {
        match merged.last_mut() {
            Some(previous) if previous.speaker == turn.speaker => {
                previous.text.push(' ');
                previous.text.push_str(turn.text.trim());
            }
            _ => merged.push(turn),
        }
    }
    merged
}
