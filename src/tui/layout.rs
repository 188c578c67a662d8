use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::config::TimeFormat;
use crate::matcher::MatchMode;

/// Border rows/columns around the panel (top + bottom, left + right).
pub const PANEL_BORDER: u16 = 2;
pub const PANEL_PADDING_X: u16 = 1;
pub const RESULTS_HEADER_ROWS: usize = 1;
/// Narrowest query field that still shares a line with the indicators.
pub const MIN_INPUT_WIDTH: usize = 20;
pub const PREVIEW_PANE_HEIGHT: usize = 4;
pub const EXIT_WIDTH: usize = 4;
pub const DURATION_WIDTH: usize = 8;
pub const COLUMN_SEP: &str = "  ";
const INDICATOR_GAP: usize = 2;
const MIN_CMD_WIDTH: usize = 10;

/// Usable columns inside the panel for a terminal `term_width` wide.
pub fn inner_width(term_width: u16) -> usize {
    usize::from(term_width.saturating_sub(PANEL_BORDER + PANEL_PADDING_X * 2)).max(1)
}

pub fn time_column_width(format: TimeFormat) -> usize {
    match format {
        TimeFormat::Absolute => 16,
        TimeFormat::Relative => 8,
    }
}

pub fn dir_column_width(width: usize) -> usize {
    (width / 5).clamp(12, 30)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
    Mode(MatchMode),
    Cwd,
    Fails,
    Dedup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub kind: IndicatorKind,
    pub active: bool,
}

impl Indicator {
    pub fn label(&self) -> &'static str {
        match self.kind {
            IndicatorKind::Mode(mode) => mode.as_str(),
            IndicatorKind::Cwd => "cwd",
            IndicatorKind::Fails => "fails",
            IndicatorKind::Dedup => "dedup",
        }
    }

    /// Label plus one column of padding on each side.
    pub fn width(&self) -> usize {
        self.label().len() + 2
    }
}

/// Enabled modes followed by the three toggles.
pub fn build_indicators(
    enabled: &[MatchMode],
    mode: MatchMode,
    cwd: bool,
    fails: bool,
    dedup: bool,
) -> Vec<Indicator> {
    let mut indicators: Vec<Indicator> = enabled
        .iter()
        .map(|m| Indicator { kind: IndicatorKind::Mode(*m), active: *m == mode })
        .collect();
    indicators.push(Indicator { kind: IndicatorKind::Cwd, active: cwd });
    indicators.push(Indicator { kind: IndicatorKind::Fails, active: fails });
    indicators.push(Indicator { kind: IndicatorKind::Dedup, active: dedup });
    indicators
}

/// Total width when rendered with single-space separators.
pub fn indicators_width(indicators: &[Indicator]) -> usize {
    let labels: usize = indicators.iter().map(Indicator::width).sum();
    labels + indicators.len().saturating_sub(1)
}

/// Drop indicators from the right until the rest fit in `width`.
pub fn fit_indicators(mut indicators: Vec<Indicator>, width: usize) -> Vec<Indicator> {
    while indicators_width(&indicators) > width {
        indicators.pop();
    }
    indicators
}

/// Whether prompt, query and indicators share one line.
pub fn input_merged(width: usize, prompt_width: usize, indicators_width: usize) -> bool {
    width >= prompt_width + indicators_width + INDICATOR_GAP + MIN_INPUT_WIDTH
}

/// Rows taken by everything except the results list.
pub fn chrome_height(merged: bool, preview_pane: bool, show_hints: bool) -> usize {
    let input = if merged { 1 } else { 2 };
    let pane = if preview_pane { PREVIEW_PANE_HEIGHT } else { 0 };
    input + pane + usize::from(show_hints)
}

/// Column widths of a result row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultLayout {
    pub width: usize,
    pub prefix_width: usize,
    pub time_width: usize,
    pub dir_width: usize,
    pub cmd_width: usize,
    pub show_dir: bool,
}

impl ResultLayout {
    /// Fixed columns first; the command column takes the rest, or the whole
    /// row when fewer than ten columns would remain.
    pub fn new(width: usize, bar_char: &str, time_format: TimeFormat, show_dir: bool) -> Self {
        let prefix_width = bar_char.chars().count();
        let time_width = time_column_width(time_format);
        let dir_width = if show_dir { dir_column_width(width) } else { 0 };

        let mut columns = prefix_width + EXIT_WIDTH + DURATION_WIDTH + time_width + COLUMN_SEP.len() * 3;
        if show_dir {
            columns += dir_width + COLUMN_SEP.len();
        }

        let cmd_width = match width.checked_sub(columns) {
            Some(rest) if rest >= MIN_CMD_WIDTH => rest,
            _ => width,
        };

        Self { width, prefix_width, time_width, dir_width, cmd_width, show_dir }
    }

    /// Width of everything left of the command column, excluding the prefix.
    pub fn meta_width(&self) -> usize {
        EXIT_WIDTH + DURATION_WIDTH + self.time_width + COLUMN_SEP.len() * 3
    }
}

/// Areas inside the panel border
pub struct PanelLayout {
    pub header: Option<Rect>,
    pub input: Rect,
    pub results: Rect,
    pub preview: Option<Rect>,
    pub footer: Option<Rect>,
}

impl PanelLayout {
    /// Split the panel interior, top to bottom:
    /// - indicator header (only when not merged with the input)
    /// - input line
    /// - results (the remaining rows)
    /// - preview pane (optional)
    /// - footer hints (optional)
    pub fn new(area: Rect, merged: bool, preview_pane: bool, show_hints: bool) -> Self {
        let mut constraints = Vec::with_capacity(5);
        if !merged {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Min(1));
        if preview_pane {
            constraints.push(Constraint::Length(PREVIEW_PANE_HEIGHT as u16));
        }
        if show_hints {
            constraints.push(Constraint::Length(1));
        }

        let chunks = Layout::default().direction(Direction::Vertical).constraints(constraints).split(area);
        let mut iter = chunks.iter().copied();
        let header = if merged { None } else { iter.next() };
        let input = iter.next().unwrap_or_default();
        let results = iter.next().unwrap_or_default();
        let preview = if preview_pane { iter.next() } else { None };
        let footer = if show_hints { iter.next() } else { None };

        Self { header, input, results, preview, footer }
    }
}
