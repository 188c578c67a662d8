//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use histsearch::{HistoryEntry, SqliteStore};
use tempfile::TempDir;

/// Base timestamp for generated entries (2023-11-14).
pub const BASE_TS_MS: i64 = 1_700_000_000_000;

/// Builder for a sandboxed home with config and data directories
pub struct TestEnv {
    temp_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn home(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.home().join("config").join("histsearch").join("config.toml")
    }

    pub fn db_path(&self) -> PathBuf {
        self.home().join("data").join("histsearch").join("history.db")
    }

    /// Write a config file with the given TOML content
    pub fn with_config(self, content: &str) -> Self {
        let path = self.config_path();
        std::fs::create_dir_all(path.parent().expect("config has a parent"))
            .expect("Failed to create config dir");
        std::fs::write(&path, content).expect("Failed to write config");
        self
    }

    /// Insert entries straight into the database
    pub fn with_entries(self, entries: &[HistoryEntry]) -> Self {
        let store = SqliteStore::open(&self.db_path()).expect("Failed to open store");
        for entry in entries {
            store.insert(entry).expect("Failed to insert entry");
        }
        self
    }

    pub fn store(&self) -> SqliteStore {
        SqliteStore::open(&self.db_path()).expect("Failed to open store")
    }

    /// The binary with HOME and XDG directories pointed into the sandbox
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_histsearch"));
        cmd.env("HOME", self.home())
            .env("XDG_CONFIG_HOME", self.home().join("config"))
            .env("XDG_DATA_HOME", self.home().join("data"))
            .env_remove("HISTSEARCH_CONFIG")
            .env_remove("HISTSEARCH_SESSION")
            .env_remove("HISTSEARCH_LOG");
        cmd
    }
}

/// Builder for a single history entry
pub struct EntryBuilder {
    entry: HistoryEntry,
}

impl EntryBuilder {
    pub fn new(command: &str) -> Self {
        Self {
            entry: HistoryEntry {
                timestamp_ms: BASE_TS_MS,
                directory: "/work".to_string(),
                session_id: "test-session".to_string(),
                ..HistoryEntry::new(command)
            },
        }
    }

    /// Seconds after [`BASE_TS_MS`]
    pub fn at(mut self, offset_secs: i64) -> Self {
        self.entry.timestamp_ms = BASE_TS_MS + offset_secs * 1000;
        self
    }

    pub fn dir(mut self, dir: &str) -> Self {
        self.entry.directory = dir.to_string();
        self
    }

    pub fn exit(mut self, code: i32) -> Self {
        self.entry.exit_code = code;
        self
    }

    pub fn build(self) -> HistoryEntry {
        self.entry
    }
}
