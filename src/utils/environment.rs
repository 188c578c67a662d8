use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::paths::expand_tilde;

pub const APP_NAME: &str = "histsearch";
/// Overrides the config file location.
pub const CONFIG_ENV: &str = "HISTSEARCH_CONFIG";

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .filter(|home| !home.as_os_str().is_empty())
        .context("Could not determine home directory")
}

fn xdg_dir(var: &str) -> Option<PathBuf> {
    env::var_os(var).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// `$XDG_CONFIG_HOME/histsearch`, falling back to `~/.config/histsearch`
pub fn config_dir() -> Result<PathBuf> {
    match xdg_dir("XDG_CONFIG_HOME") {
        Some(dir) => Ok(dir.join(APP_NAME)),
        None => Ok(home_dir()?.join(".config").join(APP_NAME)),
    }
}

/// `$XDG_DATA_HOME/histsearch`, falling back to `~/.local/share/histsearch`
pub fn data_dir() -> Result<PathBuf> {
    match xdg_dir("XDG_DATA_HOME") {
        Some(dir) => Ok(dir.join(APP_NAME)),
        None => Ok(home_dir()?.join(".local").join("share").join(APP_NAME)),
    }
}

pub fn config_file() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        return Ok(PathBuf::from(expand_tilde(&path)));
    }
    Ok(config_dir()?.join("config.toml"))
}

pub fn database_file() -> Result<PathBuf> {
    Ok(data_dir()?.join("history.db"))
}

pub fn log_file() -> Result<PathBuf> {
    Ok(data_dir()?.join(format!("{}.log", APP_NAME)))
}

/// Create the config and data directories (mode 0700 on unix).
pub fn ensure_dirs() -> Result<()> {
    for dir in [config_dir()?, data_dir()?] {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&dir, fs::Permissions::from_mode(0o700))
                .with_context(|| format!("Failed to set permissions on {}", dir.display()))?;
        }
    }
    Ok(())
}
