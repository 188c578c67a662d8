//! History persistence.
//!
//! [`SqliteStore`] is the only real backend. The interactive picker talks to
//! storage through [`HistoryStore`] so tests can substitute an in-memory or
//! failing store.

pub mod sqlite;

use anyhow::Result;

pub use sqlite::{HistoryStats, SqliteStore};

use crate::models::HistoryEntry;

/// Candidate limit used when a caller passes zero.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 10_000;

pub trait HistoryStore {
    /// Entries ordered most recent first.
    ///
    /// `only_failures` keeps non-zero exit codes. `dedupe` keeps only the
    /// most recent occurrence of each exact command text. `limit` is applied
    /// after both filters; zero means [`DEFAULT_CANDIDATE_LIMIT`].
    fn fetch_candidates(
        &self,
        limit: usize,
        dedupe: bool,
        only_failures: bool,
    ) -> Result<Vec<HistoryEntry>>;
}

impl<T: HistoryStore + ?Sized> HistoryStore for &T {
    fn fetch_candidates(
        &self,
        limit: usize,
        dedupe: bool,
        only_failures: bool,
    ) -> Result<Vec<HistoryEntry>> {
        (**self).fetch_candidates(limit, dedupe, only_failures)
    }
}
