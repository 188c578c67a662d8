use serde::{Deserialize, Serialize};

use super::history::HistoryEntry;

/// Half-open character interval `[start, end)` inside a command string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRange {
    pub start: usize,
    pub end: usize,
}

impl MatchRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Result of running a matcher against one candidate.
///
/// `index` refers to the position in the candidate set, `ranges` are in the
/// coordinate space of the original command text and are ascending and
/// non-overlapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub index: usize,
    pub score: i64,
    pub ranges: Vec<MatchRange>,
}

impl Match {
    /// Unscored match used for the empty-query listing.
    pub fn identity(index: usize) -> Self {
        Self { index, score: 0, ranges: Vec::new() }
    }
}

/// A candidate together with its match and final ranking score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredEntry {
    pub entry: HistoryEntry,
    pub match_info: Match,
    pub final_score: i64,
}
