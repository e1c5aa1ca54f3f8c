//! Programmatic invariant enforcement between stages.
//!
//! Prompts ask the model to honor these rules, but the pipeline does not
//! trust it to: similarity is clamped and thresholded here, change IDs are
//! synthesized here, previews are truncated here. Structural oddities that
//! don't invalidate the report (overlapping outline sections, malformed
//! line ranges) are logged as warnings and kept.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use super::types::{AlignmentSet, ChangeSet, Outline};

/// Alignment pairs claiming a match on both sides must be at least this
/// similar; weaker pairs are dropped so the diff stage treats the sections
/// as orphans.
pub const MIN_PAIR_SIMILARITY: f64 = 0.35;

/// Hard cap on `diff_preview` length, in characters.
pub const MAX_DIFF_PREVIEW_CHARS: usize = 240;

fn line_range_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^L\d+-L?\d+$").unwrap_or_else(|_| unreachable!()))
}

/// Sanity-check an outline, logging warnings for structural oddities.
/// Never rejects: a lopsided outline still supports a useful report.
pub fn check_outline(outline: &Outline) {
    if outline.sections.is_empty() {
        tracing::warn!(bill_id = %outline.bill_id, "Outline has no sections");
        return;
    }

    let mut seen_ids = HashSet::new();
    let mut prev_end: u32 = 0;
    for section in &outline.sections {
        if !seen_ids.insert(section.section_id.as_str()) {
            tracing::warn!(
                bill_id = %outline.bill_id,
                section_id = %section.section_id,
                "Duplicate section_id in outline"
            );
        }
        if section.line_end < section.line_start {
            tracing::warn!(
                bill_id = %outline.bill_id,
                section_id = %section.section_id,
                line_start = section.line_start,
                line_end = section.line_end,
                "Inverted line range"
            );
        }
        if section.line_start <= prev_end && prev_end > 0 {
            tracing::warn!(
                bill_id = %outline.bill_id,
                section_id = %section.section_id,
                "Section overlaps or precedes the previous one"
            );
        }
        prev_end = section.line_end.max(prev_end);
    }
}

/// Clamp similarities into [0, 1] and drop two-sided pairs below the
/// similarity floor. One-sided pairs (additions/removals) always survive.
pub fn enforce_pair_invariants(mut set: AlignmentSet) -> AlignmentSet {
    for pair in &mut set.pairs {
        if !pair.similarity.is_finite() {
            tracing::warn!(
                a = ?pair.a_section_id,
                b = ?pair.b_section_id,
                "Non-finite similarity, treating as 0"
            );
            pair.similarity = 0.0;
        }
        pair.similarity = pair.similarity.clamp(0.0, 1.0);
    }

    let before = set.pairs.len();
    set.pairs.retain(|pair| {
        let two_sided = pair.a_section_id.is_some() && pair.b_section_id.is_some();
        !two_sided || pair.similarity >= MIN_PAIR_SIMILARITY
    });
    let dropped = before - set.pairs.len();
    if dropped > 0 {
        tracing::info!(dropped, "Dropped weak alignment pairs");
    }

    set
}

/// Assign `chg_NNN` IDs where the model omitted them, cap preview length,
/// and warn on malformed evidence line ranges.
pub fn finalize_changes(mut set: ChangeSet) -> ChangeSet {
    let taken: HashSet<String> = set
        .changes
        .iter()
        .filter(|c| !c.id.is_empty())
        .map(|c| c.id.clone())
        .collect();

    let mut next_id = 1usize;
    for change in &mut set.changes {
        if change.id.is_empty() {
            let mut candidate = format!("chg_{next_id:03}");
            while taken.contains(&candidate) {
                next_id += 1;
                candidate = format!("chg_{next_id:03}");
            }
            change.id = candidate;
            next_id += 1;
        }

        change.diff_preview = truncate_chars(&change.diff_preview, MAX_DIFF_PREVIEW_CHARS);

        for evidence in &change.evidence {
            if !evidence.line_range.is_empty() && !line_range_pattern().is_match(&evidence.line_range)
            {
                tracing::warn!(
                    change_id = %change.id,
                    line_range = %evidence.line_range,
                    "Evidence line_range is not in Lstart-Lend form"
                );
            }
        }
    }

    set
}

/// Truncate to at most `max` characters, on a char boundary.
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
