use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, Row, params};
use serde::Serialize;
use tracing::{debug, info};

use super::{DEFAULT_CANDIDATE_LIMIT, HistoryStore};
use crate::models::HistoryEntry;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS history (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    ts_ms       INTEGER NOT NULL,
    duration    INTEGER NOT NULL DEFAULT 0,
    exit_code   INTEGER NOT NULL DEFAULT 0,
    command     TEXT    NOT NULL,
    directory   TEXT    NOT NULL DEFAULT '',
    session_id  TEXT    NOT NULL DEFAULT '',
    hostname    TEXT    NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS idx_history_ts_ms      ON history(ts_ms);
CREATE INDEX IF NOT EXISTS idx_history_directory  ON history(directory);
CREATE INDEX IF NOT EXISTS idx_history_session_id ON history(session_id);
CREATE INDEX IF NOT EXISTS idx_history_command    ON history(command);
";

const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA busy_timeout = 2000;
";

const SELECT_COLUMNS: &str =
    "SELECT id, ts_ms, duration, exit_code, command, directory, session_id, hostname FROM history";

/// Aggregate numbers for the `stats` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    pub total: usize,
    pub failures: usize,
    pub distinct_commands: usize,
    pub oldest_ms: Option<i64>,
    pub newest_ms: Option<i64>,
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        ensure_private_file(path)?;

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch(PRAGMAS).context("Failed to apply database pragmas")?;
        let store = Self::init(conn)?;
        info!(path = %path.display(), "opened history database");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).context("Failed to apply database schema")?;
        Ok(Self { conn })
    }

    /// Insert an entry, returning its new id. `entry.id` is ignored.
    pub fn insert(&self, entry: &HistoryEntry) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO history (ts_ms, duration, exit_code, command, directory, session_id, hostname)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    entry.timestamp_ms,
                    entry.duration_ms,
                    entry.exit_code,
                    entry.command,
                    entry.directory,
                    entry.session_id,
                    entry.hostname,
                ],
            )
            .context("Failed to insert history entry")?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM history WHERE id = ?1", params![id])
            .with_context(|| format!("Failed to delete history entry {}", id))?;
        Ok(())
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        self.query(&format!("{} ORDER BY ts_ms DESC, id DESC LIMIT ?1", SELECT_COLUMNS), params![limit as i64])
    }

    pub fn recent_in_dir(&self, dir: &str, limit: usize) -> Result<Vec<HistoryEntry>> {
        self.query(
            &format!("{} WHERE directory = ?1 ORDER BY ts_ms DESC, id DESC LIMIT ?2", SELECT_COLUMNS),
            params![dir, limit as i64],
        )
    }

    pub fn stats(&self) -> Result<HistoryStats> {
        self.conn
            .query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(CASE WHEN exit_code != 0 THEN 1 ELSE 0 END), 0),
                        COUNT(DISTINCT command),
                        MIN(ts_ms),
                        MAX(ts_ms)
                 FROM history",
                [],
                |row| {
                    Ok(HistoryStats {
                        total: row.get::<_, i64>(0)? as usize,
                        failures: row.get::<_, i64>(1)? as usize,
                        distinct_commands: row.get::<_, i64>(2)? as usize,
                        oldest_ms: row.get(3)?,
                        newest_ms: row.get(4)?,
                    })
                },
            )
            .context("Failed to compute history stats")
    }

    fn query(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(sql).context("Failed to prepare history query")?;
        let rows = stmt.query_map(params, row_to_entry)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().context("Failed to read history rows")
    }
}

impl HistoryStore for SqliteStore {
    fn fetch_candidates(
        &self,
        limit: usize,
        dedupe: bool,
        only_failures: bool,
    ) -> Result<Vec<HistoryEntry>> {
        let limit = if limit == 0 { DEFAULT_CANDIDATE_LIMIT } else { limit };
        let filter = if only_failures { " WHERE exit_code != 0" } else { "" };
        let sql = format!("{}{} ORDER BY ts_ms DESC, id DESC", SELECT_COLUMNS, filter);

        let mut stmt = self.conn.prepare(&sql).context("Failed to prepare candidate query")?;
        let mut rows = stmt.query([])?;
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        // Dedupe before limiting so `limit` counts distinct commands.
        while entries.len() < limit
            && let Some(row) = rows.next()?
        {
            let entry = row_to_entry(row)?;
            if dedupe && !seen.insert(entry.command.clone()) {
                continue;
            }
            entries.push(entry);
        }

        debug!(count = entries.len(), dedupe, only_failures, "fetched candidates");
        Ok(entries)
    }
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        timestamp_ms: row.get(1)?,
        duration_ms: row.get(2)?,
        exit_code: row.get(3)?,
        command: row.get(4)?,
        directory: row.get(5)?,
        session_id: row.get(6)?,
        hostname: row.get(7)?,
    })
}

/// Create the database file as 0600, or tighten an existing one.
#[cfg(unix)]
fn ensure_private_file(path: &Path) -> Result<()> {
    use std::fs::{OpenOptions, Permissions};
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    if path.exists() {
        std::fs::set_permissions(path, Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
    } else {
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .mode(0o600)
            .open(path)
            .with_context(|| format!("Failed to create database file: {}", path.display()))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_private_file(_path: &Path) -> Result<()> {
    Ok(())
}
