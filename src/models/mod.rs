//! Data models shared by the store, the matcher and the picker.
//!
//! - [`HistoryEntry`] - One recorded shell command with its metadata
//! - [`Match`] / [`MatchRange`] - Matcher output in original-text coordinates
//! - [`ScoredEntry`] - Ranked row as displayed by the picker

pub mod history;
pub mod search;

pub use history::HistoryEntry;
pub use search::{Match, MatchRange, ScoredEntry};
