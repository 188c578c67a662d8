use serde::{Deserialize, Serialize};

/// Key specs for every bindable action.
///
/// A spec is compared verbatim against the canonical name of a key press,
/// e.g. `ctrl+s`, `alt+f`, `enter`, `pgdown` or `?`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub mode_next: String,
    pub mode_fuzzy: String,
    pub mode_regex: String,
    pub mode_glob: String,
    pub toggle_cwd: String,
    pub toggle_dedupe: String,
    pub toggle_fails: String,
    pub accept: String,
    pub cancel: String,
    pub up: String,
    pub down: String,
    pub page_up: String,
    pub page_down: String,
    pub top: String,
    pub bottom: String,
    pub help: String,
    pub preview_command: String,
    pub copy: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            mode_next: "ctrl+s".into(),
            mode_fuzzy: "alt+f".into(),
            mode_regex: "alt+r".into(),
            mode_glob: "alt+g".into(),
            toggle_cwd: "ctrl+g".into(),
            toggle_dedupe: "ctrl+d".into(),
            toggle_fails: "ctrl+f".into(),
            accept: "enter".into(),
            cancel: "esc".into(),
            up: "up".into(),
            down: "down".into(),
            page_up: "pgup".into(),
            page_down: "pgdown".into(),
            top: "home".into(),
            bottom: "end".into(),
            help: "?".into(),
            preview_command: "alt+p".into(),
            copy: "ctrl+y".into(),
        }
    }
}
