//! User configuration.
//!
//! The config lives in a TOML file (see [`crate::utils::config_file`]). Every
//! section falls back to its defaults, so a partial file is valid. A missing
//! file is created with the defaults on first load.

pub mod display;
pub mod keys;
pub mod theme;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub use display::{DisplayConfig, DurationFormat, MultilineMode, Scope, TimeFormat};
pub use keys::KeyConfig;
pub use theme::ThemeConfig;

use crate::matcher::MatchMode;
use crate::utils::{database_file, expand_tilde};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least one match mode must be enabled")]
    NoModeEnabled,
    #[error("default_mode \"{0}\" is not enabled")]
    DefaultModeDisabled(MatchMode),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Database location; `~` is expanded. Empty uses the data directory.
    pub path: String,
}

/// Rules deciding which commands are not recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Skip commands typed with a leading space.
    pub ignore_space: bool,
    pub exit_code: Vec<i32>,
    pub command_glob: Vec<String>,
    pub command_regex: Vec<String>,
    pub directory_glob: Vec<String>,
    pub directory_regex: Vec<String>,
    /// Zero disables the limit.
    pub max_command_length: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            ignore_space: true,
            exit_code: vec![130],
            command_glob: Vec::new(),
            command_regex: Vec::new(),
            directory_glob: Vec::new(),
            directory_regex: Vec::new(),
            max_command_length: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub db: DbConfig,
    pub filters: FilterConfig,
    pub theme: ThemeConfig,
    pub display: DisplayConfig,
    pub keys: KeyConfig,
}

impl Config {
    /// Load from the default location, writing the defaults if it is missing.
    pub fn load() -> Result<Self> {
        let path = crate::utils::config_file()?;
        Self::load_or_create(&path)
    }

    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            info!(path = %path.display(), "wrote default config");
            return Ok(config);
        }
        Self::load_from(path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.enabled_modes().is_empty() {
            return Err(ConfigError::NoModeEnabled);
        }
        if !self.display.is_enabled(self.display.default_mode) {
            return Err(ConfigError::DefaultModeDisabled(self.display.default_mode));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }
        Ok(())
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        if self.db.path.is_empty() {
            database_file()
        } else {
            Ok(PathBuf::from(expand_tilde(&self.db.path)))
        }
    }
}
