use serde::{Deserialize, Serialize};

use crate::matcher::MatchMode;
use crate::ranking::{DEFAULT_CWD_BONUS, DEFAULT_RECENCY_BASE};
use crate::tui::transform::DEFAULT_COLLAPSE_SYMBOL;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    #[default]
    Relative,
    Absolute,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationFormat {
    #[default]
    Auto,
    Ms,
    S,
}

/// Which candidates the picker starts with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    #[default]
    Normal,
    Cwd,
}

/// How multiline commands are presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultilineMode {
    /// Collapsed rows, full command in a popup on demand
    #[default]
    Popup,
    /// Collapsed rows plus a fixed pane showing the selected command
    PreviewPane,
    /// The selected command spans several rows
    Expand,
    Collapsed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub time_format: TimeFormat,
    pub duration_format: DurationFormat,
    pub show_hints: bool,
    pub show_directory: bool,
    pub instant_execute: bool,
    pub enable_fuzzy: bool,
    pub enable_regex: bool,
    pub enable_glob: bool,
    pub cwd_boost: i64,
    pub recency_base: i64,
    pub default_scope: Scope,
    pub default_mode: MatchMode,
    pub hide_multiline: bool,
    pub multiline_mode: MultilineMode,
    pub multiline_collapse: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time_format: TimeFormat::Relative,
            duration_format: DurationFormat::Auto,
            show_hints: true,
            show_directory: false,
            instant_execute: false,
            enable_fuzzy: true,
            enable_regex: true,
            enable_glob: true,
            cwd_boost: DEFAULT_CWD_BONUS,
            recency_base: DEFAULT_RECENCY_BASE,
            default_scope: Scope::Normal,
            default_mode: MatchMode::Fuzzy,
            hide_multiline: false,
            multiline_mode: MultilineMode::Popup,
            multiline_collapse: DEFAULT_COLLAPSE_SYMBOL.to_string(),
        }
    }
}

impl DisplayConfig {
    /// Enabled modes in cycling order.
    pub fn enabled_modes(&self) -> Vec<MatchMode> {
        MatchMode::ALL.into_iter().filter(|mode| self.is_enabled(*mode)).collect()
    }

    pub fn is_enabled(&self, mode: MatchMode) -> bool {
        match mode {
            MatchMode::Fuzzy => self.enable_fuzzy,
            MatchMode::Regex => self.enable_regex,
            MatchMode::Glob => self.enable_glob,
        }
    }

    /// The configured default mode, or the first enabled one if it is off.
    pub fn initial_mode(&self) -> MatchMode {
        if self.is_enabled(self.default_mode) {
            return self.default_mode;
        }
        self.enabled_modes().first().copied().unwrap_or_default()
    }
}
