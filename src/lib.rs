//! histsearch - interactive search over recorded shell history
//!
//! Shell hooks (see [`shell`]) record every finished command into a SQLite
//! database ([`storage`]), subject to the recording rules in [`filters`].
//! `histsearch search` opens a picker ([`tui`]) that matches the query with
//! one of three engines ([`matcher`]), reorders by recency and directory
//! ([`ranking`]) and prints the chosen command for the shell to edit or run.
//!
//! # Example
//!
//! ```
//! use histsearch::HistoryEntry;
//! use histsearch::matcher::MatchMode;
//! use histsearch::ranking::{ScoringOptions, rank};
//!
//! let entries = vec![HistoryEntry::new("git status"), HistoryEntry::new("ls -la")];
//! let commands: Vec<String> = entries.iter().map(|e| e.command.clone()).collect();
//! let ranked = rank(&entries, &commands, "gst", MatchMode::Fuzzy, &ScoringOptions::default());
//! assert_eq!(ranked[0].entry.command, "git status");
//! ```

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod filters;
pub mod logging;
pub mod matcher;
pub mod models;
pub mod ranking;
pub mod shell;
pub mod storage;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use models::{HistoryEntry, Match, MatchRange};
pub use storage::{HistoryStore, SqliteStore};
