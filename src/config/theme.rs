use serde::{Deserialize, Serialize};

/// Colours are anything ratatui parses: names (`cyan`), ANSI indexes (`24`)
/// or hex (`#ff8800`). An empty string means "terminal default".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub prompt: String,
    pub prompt_color: String,
    pub match_color: String,
    pub selected_bg: String,
    pub selected_fg: String,
    pub mode_color: String,
    pub border_color: String,
    pub match_bold: bool,
    pub match_underline: bool,
    pub match_bg: String,
    pub selection_bar_show: bool,
    pub selection_bar_char: String,
    pub selection_bar_color: String,
    pub selection_full_line: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".into(),
            prompt_color: "cyan".into(),
            match_color: "yellow".into(),
            selected_bg: "24".into(),
            selected_fg: String::new(),
            mode_color: "240".into(),
            border_color: String::new(),
            match_bold: true,
            match_underline: true,
            match_bg: String::new(),
            selection_bar_show: true,
            selection_bar_char: "▌ ".into(),
            selection_bar_color: "14".into(),
            selection_full_line: true,
        }
    }
}
