//! Removal of unsupported sentences from a script.

use fluent_podcast_domain::{DraftTurn, Script, ScriptError, Verdict, VerificationReport, merge_adjacent};

/// Rebuild `script` from its passed and exempt claims only.
///
/// Turns left without any claim are dropped and neighbouring turns by the
/// same host are merged. Fails when the result no longer has both hosts.
pub fn filter_unverified(
    script: &Script,
    report: &VerificationReport,
) -> Result<Script, ScriptError> {
    let mut kept: Vec<Vec<&str>> = vec![Vec::new(); script.len()];
    for m in report.matches() {
        if matches!(m.verdict, Verdict::Passed | Verdict::Exempt)
            && let Some(sentences) = kept.get_mut(m.claim.turn_index)
        {
            sentences.push(&m.claim.text);
        }
    }

    let draft: Vec<DraftTurn> = script
        .turns()
        .iter()
        .zip(kept)
        .filter(|(_, sentences)| !sentences.is_empty())
        .map(|(turn, sentences)| DraftTurn::new(turn.speaker, sentences.join(" ")))
        .collect();

    let dropped = report.flagged().count();
    let filtered = Script::from_draft(merge_adjacent(draft))?;
    tracing::info!(
        dropped_claims = dropped,
        turns_before = script.len(),
        turns_after = filtered.len(),
        "filtered unverified claims"
    );
    Ok(filtered)
}

/// Whether the filter should run for this report.
pub fn should_filter(report: &VerificationReport, min_verified_percentage: f64, enabled: bool) -> bool {
    enabled && report.percentage() < min_verified_percentage
}
