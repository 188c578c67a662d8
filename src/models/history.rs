use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One executed shell command as stored by the history database.
///
/// Entries are created by `record` and read back in bulk by the picker. The
/// interactive core never mutates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub timestamp_ms: i64,
    pub duration_ms: i64,
    pub exit_code: i32,
    pub command: String,
    pub directory: String,
    pub session_id: String,
    pub hostname: String,
}

impl HistoryEntry {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), ..Self::default() }
    }

    pub fn is_failure(&self) -> bool {
        self.exit_code != 0
    }

    pub fn is_multiline(&self) -> bool {
        self.command.contains('\n')
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }
}
