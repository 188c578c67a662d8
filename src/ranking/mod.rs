//! Final ordering of matched candidates.
//!
//! The final score of an entry is its match score plus a flat bonus when it
//! was run in the current directory and a recency bonus that decays by one
//! point every [`RECENCY_STEP`] positions in the candidate set. Ties keep
//! candidate (recency) order.

use crate::matcher::{MatchMode, find_matches};
use crate::models::{HistoryEntry, Match, ScoredEntry};

pub const DEFAULT_CWD_BONUS: i64 = 50;
pub const DEFAULT_RECENCY_BASE: i64 = 10;
/// Candidate positions per point of recency decay.
pub const RECENCY_STEP: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringOptions {
    /// Working directory used for the directory bonus. Empty disables it.
    pub cwd: String,
    pub cwd_bonus: i64,
    pub recency_base: i64,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            cwd: String::new(),
            cwd_bonus: DEFAULT_CWD_BONUS,
            recency_base: DEFAULT_RECENCY_BASE,
        }
    }
}

pub fn recency_bonus(index: usize, recency_base: i64) -> i64 {
    let decay = i64::try_from(index / RECENCY_STEP).unwrap_or(i64::MAX);
    recency_base.saturating_sub(decay).max(0)
}

/// Score every match and sort by final score, descending. Ties keep
/// candidate order, whatever order the matcher produced.
///
/// Matches whose index falls outside `entries` are skipped.
pub fn score_and_sort(
    entries: &[HistoryEntry],
    matches: Vec<Match>,
    opts: &ScoringOptions,
) -> Vec<ScoredEntry> {
    let mut scored: Vec<ScoredEntry> = matches
        .into_iter()
        .filter_map(|m| {
            let entry = entries.get(m.index)?;
            let mut final_score = m.score + recency_bonus(m.index, opts.recency_base);
            if !opts.cwd.is_empty() && entry.directory == opts.cwd {
                final_score += opts.cwd_bonus;
            }
            Some(ScoredEntry { entry: entry.clone(), match_info: m, final_score })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.final_score.cmp(&a.final_score).then(a.match_info.index.cmp(&b.match_info.index))
    });
    scored
}

/// One zero-score match per candidate, in candidate order.
pub fn identity_matches(count: usize) -> Vec<Match> {
    (0..count).map(Match::identity).collect()
}

/// Match `query` against `candidates` in `mode` and rank the result.
///
/// An empty query ranks every entry through identity matches instead of
/// calling a matcher.
pub fn rank(
    entries: &[HistoryEntry],
    candidates: &[String],
    query: &str,
    mode: MatchMode,
    opts: &ScoringOptions,
) -> Vec<ScoredEntry> {
    let matches = if query.is_empty() {
        identity_matches(entries.len())
    } else {
        find_matches(mode, query, candidates)
    };
    score_and_sort(entries, matches, opts)
}
