use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};

use super::layout::IndicatorKind;
use crate::config::ThemeConfig;
use crate::matcher::MatchMode;

const META: Color = Color::Indexed(245);
const EXIT_OK: Color = Color::Indexed(10);
const EXIT_FAIL: Color = Color::Indexed(9);
const COLUMN_HEADER: Color = Color::Indexed(244);
const SELECTED_CMD: Color = Color::Indexed(15);
const CMD: Color = Color::Indexed(250);
const DIMMED: Color = Color::Indexed(240);
const HELP_KEY: Color = Color::Indexed(12);
const TITLE_BG: Color = Color::Indexed(236);
const INDICATOR_FG: Color = Color::Indexed(245);
const INDICATOR_BG: Color = Color::Indexed(237);
const INDICATOR_ACTIVE_FG: Color = Color::Indexed(0);
const DEFAULT_BORDER: Color = Color::Indexed(240);

/// Parse a theme colour. Empty or unparsable values mean "no colour".
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Color::from_str(value).ok()
}

fn fg(color: Option<Color>) -> Style {
    match color {
        Some(color) => Style::default().fg(color),
        None => Style::default(),
    }
}

/// Every style the renderer uses, resolved once from the theme.
#[derive(Debug, Clone)]
pub struct Styles {
    pub prompt: Style,
    pub matched: Style,
    pub meta: Style,
    pub exit_ok: Style,
    pub exit_fail: Style,
    pub column_header: Style,
    pub selection_bar: Style,
    pub selected_cmd: Style,
    pub cmd: Style,
    pub dimmed: Style,
    pub help_key: Style,
    pub help_desc: Style,
    pub title: Style,
    pub border: Style,
    /// Background of the selected row, if any.
    pub selected_bg: Option<Color>,
    pub full_line: bool,
}

impl Styles {
    pub fn new(theme: &ThemeConfig) -> Self {
        let prompt_color = parse_color(&theme.prompt_color);

        let mut matched = fg(parse_color(&theme.match_color));
        if theme.match_bold {
            matched = matched.add_modifier(Modifier::BOLD);
        }
        if theme.match_underline {
            matched = matched.add_modifier(Modifier::UNDERLINED);
        }
        if let Some(bg) = parse_color(&theme.match_bg) {
            matched = matched.bg(bg);
        }

        let selected_fg = parse_color(&theme.selected_fg).unwrap_or(SELECTED_CMD);
        let border = parse_color(&theme.border_color)
            .or_else(|| parse_color(&theme.mode_color))
            .unwrap_or(DEFAULT_BORDER);

        Self {
            prompt: fg(prompt_color).add_modifier(Modifier::BOLD),
            matched,
            meta: Style::default().fg(META),
            exit_ok: Style::default().fg(EXIT_OK).add_modifier(Modifier::BOLD),
            exit_fail: Style::default().fg(EXIT_FAIL).add_modifier(Modifier::BOLD),
            column_header: Style::default().fg(COLUMN_HEADER).add_modifier(Modifier::BOLD),
            selection_bar: fg(parse_color(&theme.selection_bar_color)).add_modifier(Modifier::BOLD),
            selected_cmd: Style::default().fg(selected_fg).add_modifier(Modifier::BOLD),
            cmd: Style::default().fg(CMD),
            dimmed: Style::default().fg(DIMMED),
            help_key: Style::default().fg(HELP_KEY).add_modifier(Modifier::BOLD),
            help_desc: Style::default().fg(META),
            title: fg(prompt_color).bg(TITLE_BG).add_modifier(Modifier::BOLD),
            border: Style::default().fg(border),
            selected_bg: parse_color(&theme.selected_bg),
            full_line: theme.selection_full_line,
        }
    }

    /// Apply the selected-row background to `style` when the row is
    /// selected and the theme asks for full-line highlighting.
    pub fn on_row(&self, style: Style, selected: bool) -> Style {
        match self.selected_bg {
            Some(bg) if selected && self.full_line => style.bg(bg),
            _ => style,
        }
    }

    /// Highlight style for a matched run. On a full-line selection the row
    /// background wins unless the theme set its own match background.
    pub fn matched_on_row(&self, selected: bool) -> Style {
        if self.matched.bg.is_some() {
            return self.matched;
        }
        self.on_row(self.matched, selected)
    }

    pub fn indicator(&self, kind: IndicatorKind, active: bool) -> Style {
        if !active {
            return Style::default().fg(INDICATOR_FG).bg(INDICATOR_BG);
        }
        let bg = match kind {
            IndicatorKind::Mode(MatchMode::Fuzzy) => Color::Indexed(39),
            IndicatorKind::Mode(MatchMode::Regex) => Color::Indexed(208),
            IndicatorKind::Mode(MatchMode::Glob) => Color::Indexed(207),
            IndicatorKind::Cwd => Color::Indexed(10),
            IndicatorKind::Fails => Color::Indexed(9),
            IndicatorKind::Dedup => Color::Indexed(11),
        };
        Style::default().fg(INDICATOR_ACTIVE_FG).bg(bg).add_modifier(Modifier::BOLD)
    }
}

impl Default for Styles {
    fn default() -> Self {
        Self::new(&ThemeConfig::default())
    }
}
