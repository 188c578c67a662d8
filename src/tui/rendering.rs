use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use super::app::{App, MessageType};
use super::layout::{
    COLUMN_SEP, DURATION_WIDTH, EXIT_WIDTH, PANEL_PADDING_X, PREVIEW_PANE_HEIGHT, PanelLayout,
    ResultLayout,
};
use super::timestamps::{fit_right, format_duration, format_when, now_ms};
use super::transform::{DisplayText, prepare_display, prepare_line};
use crate::config::MultilineMode;
use crate::models::ScoredEntry;
use crate::utils::{preview_lines, shorten_directory};

pub const DEFAULT_SELECTION_CHAR: &str = "▌ ";
const CONTINUATION_GUTTER: char = '│';
const OVERLAY_BORDER: Color = Color::Indexed(240);
const PREVIEW_HEADER: Color = Color::Indexed(245);
const DISMISS_HINT: &str = "  Press any key to dismiss";

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.show_preview {
        render_preview_popup(frame, area, app);
        return;
    }
    if app.show_help {
        render_help(frame, area, app);
        return;
    }

    let height = u16::try_from(app.panel_height()).unwrap_or(u16::MAX).min(area.height);
    let panel = Rect { height, ..area };
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(app.styles.border)
        .padding(Padding::horizontal(PANEL_PADDING_X));
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let merged = app.is_merged();
    let layout = PanelLayout::new(inner, merged, app.preview_pane(), app.shows_footer());

    if let Some(header) = layout.header {
        frame.render_widget(Paragraph::new(Line::from(indicator_spans(app))), header);
    }

    let (input, cursor_x) = input_line(app, merged, usize::from(layout.input.width));
    frame.render_widget(Paragraph::new(input), layout.input);

    frame.render_widget(Paragraph::new(result_lines(app)), layout.results);

    if let Some(preview) = layout.preview {
        frame.render_widget(Paragraph::new(preview_pane_lines(app, usize::from(preview.width))), preview);
    }
    if let Some(footer) = layout.footer {
        frame.render_widget(Paragraph::new(footer_line(app, usize::from(footer.width))), footer);
    }

    let x = layout.input.x.saturating_add(u16::try_from(cursor_x).unwrap_or(u16::MAX));
    if x < layout.input.right() {
        frame.set_cursor_position(Position::new(x, layout.input.y));
    }
}

fn indicator_spans(app: &App) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, indicator) in app.indicators().iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            format!(" {} ", indicator.label()),
            app.styles.indicator(indicator.kind, indicator.active),
        ));
    }
    spans
}

/// Prompt and query, with the indicators right-aligned when merged.
/// Also returns the cursor column.
fn input_line(app: &App, merged: bool, width: usize) -> (Line<'static>, usize) {
    let prompt = app.config.theme.prompt.clone();
    let prompt_width = app.prompt_width();
    let indicators = if merged { indicator_spans(app) } else { Vec::new() };
    let indicators_width: usize = indicators.iter().map(Span::width).sum();

    let reserved = if merged { indicators_width + 2 } else { 0 };
    let room = width.saturating_sub(prompt_width + reserved).saturating_sub(1);

    // keep the end of a long query in view
    let query_len = app.query.chars().count();
    let query: String = app.query.chars().skip(query_len.saturating_sub(room)).collect();
    let query_width = query.width();

    let mut spans = vec![Span::styled(prompt, app.styles.prompt), Span::raw(query)];
    if merged {
        let fill = width.saturating_sub(prompt_width + query_width + indicators_width);
        spans.push(Span::raw(" ".repeat(fill)));
        spans.extend(indicators);
    }

    (Line::from(spans), prompt_width + query_width)
}

fn selection_char(app: &App) -> &str {
    let configured = app.config.theme.selection_bar_char.as_str();
    if configured.is_empty() { DEFAULT_SELECTION_CHAR } else { configured }
}

fn result_layout(app: &App) -> ResultLayout {
    ResultLayout::new(
        app.width,
        selection_char(app),
        app.config.display.time_format,
        app.config.display.show_directory,
    )
}

fn result_lines(app: &App) -> Vec<Line<'static>> {
    let layout = result_layout(app);
    let mut lines = Vec::with_capacity(app.height);
    if app.height > 1 {
        lines.push(column_header(app, &layout));
    }

    let visible = app.visible_range();
    if visible.is_empty() {
        lines.push(empty_state(app));
        return lines;
    }

    let expand = app.config.display.multiline_mode == MultilineMode::Expand;
    let now = now_ms();
    for idx in visible {
        let Some(scored) = app.display_entries.get(idx) else {
            break;
        };
        let selected = idx == app.cursor;
        if expand && selected && scored.entry.is_multiline() {
            lines.extend(expanded_lines(app, &layout, scored, now));
        } else {
            let display = prepare_display(
                &scored.entry.command,
                &scored.match_info.ranges,
                &app.query,
                &app.config.display.multiline_collapse,
                layout.cmd_width,
            );
            lines.push(result_line(app, &layout, scored, &display, selected, now));
        }
    }

    lines
}

fn column_header(app: &App, layout: &ResultLayout) -> Line<'static> {
    let style = app.styles.column_header;
    let mut text = " ".repeat(layout.prefix_width);
    text.push_str(&fit_right("exit", EXIT_WIDTH));
    text.push_str(COLUMN_SEP);
    text.push_str(&fit_right("time", DURATION_WIDTH));
    text.push_str(COLUMN_SEP);
    text.push_str(&fit_right("when", layout.time_width));
    text.push_str(COLUMN_SEP);
    text.push_str(&format!("{:<width$}", "command", width = layout.cmd_width));
    if layout.show_dir {
        text.push_str(COLUMN_SEP);
        text.push_str(&fit_right("dir", layout.dir_width));
    }
    Line::from(Span::styled(text, style))
}

fn empty_state(app: &App) -> Line<'static> {
    let styles = &app.styles;
    let span = match (&app.store_error, app.query.is_empty()) {
        (Some(err), _) => Span::styled(format!("  Error: {}", err), styles.exit_fail),
        (None, true) => Span::styled("  No history entries found", styles.dimmed),
        (None, false) => Span::styled("  No matches found", styles.dimmed),
    };
    Line::from(span)
}

/// Command text as styled runs, padded to the column width.
fn command_spans(app: &App, display: &DisplayText, width: usize, selected: bool) -> Vec<Span<'static>> {
    let styles = &app.styles;
    let base = styles.on_row(if selected { styles.selected_cmd } else { styles.cmd }, selected);
    let matched = styles.matched_on_row(selected);

    let mut spans: Vec<Span<'static>> = display
        .runs()
        .into_iter()
        .map(|run| Span::styled(run.text, if run.matched { matched } else { base }))
        .collect();

    let used = display.text.width();
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), styles.on_row(Style::default(), selected)));
    }
    spans
}

fn result_line(
    app: &App,
    layout: &ResultLayout,
    scored: &ScoredEntry,
    display: &DisplayText,
    selected: bool,
    now: i64,
) -> Line<'static> {
    let styles = &app.styles;
    let display_cfg = &app.config.display;
    let entry = &scored.entry;
    let row = |style: Style| styles.on_row(style, selected);
    let sep = || Span::styled(COLUMN_SEP, row(Style::default()));

    let mut spans = Vec::with_capacity(16);
    if !selected {
        spans.push(Span::raw(" ".repeat(layout.prefix_width)));
    } else if app.config.theme.selection_bar_show {
        spans.push(Span::styled(selection_char(app).to_string(), row(styles.selection_bar)));
    } else {
        spans.push(Span::styled(" ".repeat(layout.prefix_width), row(Style::default())));
    }

    let exit_style = if entry.is_failure() { styles.exit_fail } else { styles.exit_ok };
    spans.push(Span::styled(fit_right(&entry.exit_code.to_string(), EXIT_WIDTH), row(exit_style)));
    spans.push(sep());
    spans.push(Span::styled(
        fit_right(&format_duration(entry.duration_ms, display_cfg.duration_format), DURATION_WIDTH),
        row(styles.meta),
    ));
    spans.push(sep());
    spans.push(Span::styled(
        fit_right(&format_when(entry.timestamp_ms, display_cfg.time_format, now), layout.time_width),
        row(styles.meta),
    ));
    spans.push(sep());
    spans.extend(command_spans(app, display, layout.cmd_width, selected));

    if layout.show_dir {
        spans.push(sep());
        spans.push(Span::styled(
            fit_right(&shorten_directory(&entry.directory, layout.dir_width, &app.home), layout.dir_width),
            row(styles.meta),
        ));
    }

    pad_row(app, &mut spans, layout.width, selected);
    Line::from(spans)
}

/// Fill the rest of a selected row with the selection background.
fn pad_row(app: &App, spans: &mut Vec<Span<'static>>, width: usize, selected: bool) {
    if !selected {
        return;
    }
    let used: usize = spans.iter().map(Span::width).sum();
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), app.styles.on_row(Style::default(), true)));
    }
}

/// The selected multiline entry over several rows: metadata on the first,
/// a gutter on the rest.
fn expanded_lines(app: &App, layout: &ResultLayout, scored: &ScoredEntry, now: i64) -> Vec<Line<'static>> {
    let styles = &app.styles;
    let ranges = &scored.match_info.ranges;
    let mut lines = Vec::new();
    let mut line_start = 0;

    for (i, text) in scored.entry.command.split('\n').enumerate() {
        let display = prepare_line(text, line_start, ranges, &app.query, layout.cmd_width);
        line_start += text.chars().count() + 1;

        if i == 0 {
            lines.push(result_line(app, layout, scored, &display, true, now));
            continue;
        }

        let mut gutter = String::with_capacity(layout.prefix_width + 2);
        if app.config.theme.selection_bar_show && layout.prefix_width > 0 {
            gutter.push(CONTINUATION_GUTTER);
            gutter.push_str(&" ".repeat(layout.prefix_width - 1));
        } else {
            gutter.push_str(&" ".repeat(layout.prefix_width));
        }

        let mut spans = vec![
            Span::styled(gutter, styles.on_row(styles.selection_bar, true)),
            Span::styled(" ".repeat(layout.meta_width()), styles.on_row(Style::default(), true)),
        ];
        spans.extend(command_spans(app, &display, layout.cmd_width, true));
        pad_row(app, &mut spans, layout.width, true);
        lines.push(Line::from(spans));
    }

    lines
}

fn preview_pane_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let Some(scored) = app.selected_entry() else {
        return Vec::new();
    };

    let title = "─ Preview ─";
    let fill = "─".repeat(width.saturating_sub(title.chars().count()));
    let mut lines = vec![Line::from(vec![
        Span::styled(title, Style::default().fg(PREVIEW_HEADER).add_modifier(Modifier::BOLD)),
        Span::raw(fill),
    ])];

    for text in preview_lines(&scored.entry.command, 0).into_iter().take(PREVIEW_PANE_HEIGHT - 1) {
        let cut: String = text.chars().take(width).collect();
        lines.push(Line::from(Span::styled(cut, app.styles.dimmed)));
    }
    lines
}

/// Columns of padding between the footer's halves, or `None` when only the
/// right half fits.
pub fn footer_gap(left_width: usize, right_width: usize, width: usize) -> Option<usize> {
    let needed = left_width + right_width + 1;
    (needed <= width).then(|| width - left_width - right_width)
}

pub fn match_count_label(count: usize) -> String {
    format!("matches: {}", count)
}

fn hint_spans(app: &App) -> Vec<Span<'static>> {
    let keys = &app.config.keys;
    let mut hints: Vec<(String, &str)> = vec![
        ("↑↓".to_string(), "nav"),
        (keys.accept.clone(), "select"),
        (keys.cancel.clone(), "cancel"),
        (keys.mode_next.clone(), "mode"),
        (keys.toggle_cwd.clone(), "cwd"),
        (keys.toggle_dedupe.clone(), "dedup"),
        (keys.help.clone(), "help"),
    ];
    if app.config.display.multiline_mode == MultilineMode::Popup && app.selected_is_multiline() {
        hints.push((keys.preview_command.clone(), "preview"));
    }

    let mut spans = Vec::with_capacity(hints.len() * 4);
    for (i, (key, desc)) in hints.into_iter().filter(|(key, _)| !key.is_empty()).enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(key, app.styles.help_key));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(desc.to_string(), app.styles.help_desc));
    }
    spans
}

fn footer_line(app: &App, width: usize) -> Line<'static> {
    let left = match &app.status_message {
        Some(msg) => {
            let style = match msg.message_type {
                MessageType::Success => app.styles.exit_ok,
                MessageType::Error => app.styles.exit_fail,
            };
            vec![Span::styled(msg.text.clone(), style)]
        }
        None if app.config.display.show_hints => hint_spans(app),
        None => Vec::new(),
    };
    let right = match_count_label(app.display_entries.len());
    let left_width: usize = left.iter().map(Span::width).sum();
    let right_width = right.width();

    let mut spans = Vec::with_capacity(left.len() + 2);
    match footer_gap(left_width, right_width, width) {
        Some(gap) => {
            spans.extend(left);
            spans.push(Span::raw(" ".repeat(gap)));
        }
        None => spans.push(Span::raw(" ".repeat(width.saturating_sub(right_width)))),
    }
    spans.push(Span::styled(right, app.styles.help_desc));
    Line::from(spans)
}

/// Bordered overlay box at the top of `area`, sized to its content.
fn overlay_area(area: Rect, content_rows: usize) -> Rect {
    let width = if area.width > 14 { area.width - 4 } else { area.width };
    // border + vertical padding
    let height = u16::try_from(content_rows + 4).unwrap_or(u16::MAX).min(area.height);
    Rect { width, height, ..area }
}

fn render_overlay(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let target = overlay_area(area, lines.len());
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(OVERLAY_BORDER))
        .padding(Padding::new(2, 2, 1, 1));
    frame.render_widget(Clear, target);
    frame.render_widget(Paragraph::new(lines).block(block), target);
}

fn overlay_lines(app: &App, title: &str, body: Vec<Line<'static>>) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(body.len() + 4);
    lines.push(Line::from(Span::styled(format!("  {}  ", title), app.styles.title)));
    lines.push(Line::default());
    lines.extend(body);
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(DISMISS_HINT, app.styles.dimmed)));
    lines
}

fn help_bindings(app: &App) -> Vec<(String, &'static str)> {
    let keys = &app.config.keys;
    vec![
        (format!("{}/{}", keys.up, keys.down), "Move up/down"),
        (format!("{}/{}", keys.page_up, keys.page_down), "Page up/down"),
        (format!("{}/{}", keys.top, keys.bottom), "Jump to top/bottom"),
        (keys.accept.clone(), "Accept selection"),
        (keys.cancel.clone(), "Cancel / quit"),
        (keys.mode_next.clone(), "Cycle match mode (fuzzy/regex/glob)"),
        (keys.mode_fuzzy.clone(), "Fuzzy match mode"),
        (keys.mode_regex.clone(), "Regex match mode"),
        (keys.mode_glob.clone(), "Glob match mode"),
        (keys.toggle_cwd.clone(), "Filter to current directory"),
        (keys.toggle_dedupe.clone(), "Toggle command deduplication"),
        (keys.toggle_fails.clone(), "Show only failed commands"),
        (keys.preview_command.clone(), "Preview multiline command"),
        (keys.copy.clone(), "Copy command to clipboard"),
        (keys.help.clone(), "Show/hide this help"),
    ]
}

fn render_help(frame: &mut Frame, area: Rect, app: &App) {
    let body = help_bindings(app)
        .into_iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{:<16}", key), app.styles.help_key),
                Span::raw("  "),
                Span::styled(desc, app.styles.help_desc),
            ])
        })
        .collect();
    render_overlay(frame, area, overlay_lines(app, "Keybindings", body));
}

fn render_preview_popup(frame: &mut Frame, area: Rect, app: &App) {
    let mut content_width = app.width.saturating_sub(8);
    if content_width < 20 {
        content_width = app.width.saturating_sub(4);
    }
    let body = preview_lines(&app.preview_command, content_width.max(1)).into_iter().map(Line::from).collect();
    render_overlay(frame, area, overlay_lines(app, "Command Preview", body));
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::config::{Config, DisplayConfig, ThemeConfig};
    use crate::models::HistoryEntry;
    use crate::tui::app::SearchOptions;
    use crate::tui::events::{KeyPress, Message};

    fn entry(command: &str, exit_code: i32) -> HistoryEntry {
        HistoryEntry {
            command: command.to_string(),
            exit_code,
            directory: "/home/alice/src".to_string(),
            ..HistoryEntry::default()
        }
    }

    fn sample() -> Vec<HistoryEntry> {
        vec![
            entry("git status", 0),
            entry("cargo build", 101),
            entry("echo one\necho two", 0),
            entry("ls -la", 0),
        ]
    }

    fn make_app(config: Config, width: u16, height: u16) -> App {
        let options = SearchOptions {
            max_height: 15,
            cwd: "/work".into(),
            home: "/home/alice".into(),
            ..SearchOptions::default()
        };
        let mut app = App::new(config, options);
        app.apply_reload(Ok(sample()));
        app.update(Message::Resize { width, height });
        app
    }

    fn press(app: &mut App, spec: &str) {
        app.update(Message::Key(KeyPress::from_spec(spec)));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, &c.to_string());
        }
    }

    fn draw(app: &App, width: u16, height: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render_ui(f, app)).unwrap();
        terminal
    }

    fn screen(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| (0..buffer.area.width).map(|x| buffer[(x, y)].symbol()).collect::<String>())
            .collect()
    }

    /// Screen position of the first occurrence of `needle`.
    fn find(lines: &[String], needle: &str) -> Option<(u16, u16)> {
        let needle: Vec<char> = needle.chars().collect();
        lines.iter().enumerate().find_map(|(y, line)| {
            let chars: Vec<char> = line.chars().collect();
            chars
                .windows(needle.len())
                .position(|w| w == needle.as_slice())
                .map(|x| (x as u16, y as u16))
        })
    }

    fn contains(lines: &[String], needle: &str) -> bool {
        lines.iter().any(|l| l.contains(needle))
    }

    #[test]
    fn test_render_results_and_chrome() {
        let app = make_app(Config::default(), 100, 20);
        let lines = screen(&draw(&app, 100, 20));

        assert!(lines[0].starts_with('╭'));
        assert!(contains(&lines, "> "));
        assert!(contains(&lines, " fuzzy "));
        assert!(contains(&lines, " dedup "));
        assert!(contains(&lines, "exit"));
        assert!(contains(&lines, "command"));
        assert!(contains(&lines, "git status"));
        assert!(contains(&lines, "n/a"));
        assert!(contains(&lines, "matches: 4"));
        assert!(contains(&lines, "cancel"));
    }

    #[test]
    fn test_panel_height_follows_rows() {
        let app = make_app(Config::default(), 100, 40);
        let lines = screen(&draw(&app, 100, 40));
        let bottom = app.panel_height() - 1;
        assert!(lines[bottom].starts_with('╰'));
        assert!(lines[bottom + 1].trim().is_empty());
    }

    #[test]
    fn test_selected_row_has_bar_and_background() {
        let app = make_app(Config::default(), 100, 20);
        let terminal = draw(&app, 100, 20);
        let lines = screen(&terminal);

        let (x, y) = find(&lines, "▌").unwrap();
        let (_, git_row) = find(&lines, "git status").unwrap();
        assert_eq!(y, git_row);

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(x, y)].fg, Color::Indexed(14));
        assert_eq!(buffer[(x + 10, y)].bg, Color::Indexed(24));
        let (_, other) = find(&lines, "ls -la").unwrap();
        assert_ne!(buffer[(x + 10, other)].bg, Color::Indexed(24));
    }

    #[test]
    fn test_exit_codes_coloured() {
        let app = make_app(Config::default(), 100, 20);
        let terminal = draw(&app, 100, 20);
        let lines = screen(&terminal);
        let (x, y) = find(&lines, " 101").unwrap();
        assert_eq!(terminal.backend().buffer()[(x + 1, y)].fg, Color::Indexed(9));
    }

    #[test]
    fn test_matches_are_highlighted() {
        let mut app = make_app(Config::default(), 100, 20);
        press(&mut app, "alt+r");
        type_text(&mut app, "stat");
        let terminal = draw(&app, 100, 20);
        let lines = screen(&terminal);

        let (x, y) = find(&lines, "git status").unwrap();
        let buffer = terminal.backend().buffer();
        let hit = &buffer[(x + 4, y)];
        assert_eq!(hit.fg, Color::Yellow);
        assert!(hit.modifier.contains(Modifier::BOLD | Modifier::UNDERLINED));
        assert_ne!(buffer[(x, y)].fg, Color::Yellow);
    }

    #[test]
    fn test_empty_query_never_highlights() {
        let app = make_app(Config::default(), 100, 20);
        let terminal = draw(&app, 100, 20);
        let buffer = terminal.backend().buffer();
        let any_yellow = buffer.content().iter().any(|cell| cell.fg == Color::Yellow);
        assert!(!any_yellow);
    }

    #[test]
    fn test_multiline_collapsed_in_rows() {
        let app = make_app(Config::default(), 100, 20);
        let lines = screen(&draw(&app, 100, 20));
        assert!(contains(&lines, "echo one echo two"));
    }

    #[test]
    fn test_collapse_symbol_is_configurable() {
        let config = Config {
            display: DisplayConfig { multiline_collapse: " ; ".into(), ..DisplayConfig::default() },
            ..Config::default()
        };
        let app = make_app(config, 100, 20);
        let lines = screen(&draw(&app, 100, 20));
        assert!(contains(&lines, "echo one ; echo two"));
    }

    #[test]
    fn test_empty_states() {
        let mut app = make_app(Config::default(), 100, 20);
        app.apply_reload(Ok(Vec::new()));
        assert!(contains(&screen(&draw(&app, 100, 20)), "No history entries found"));

        let mut app = make_app(Config::default(), 100, 20);
        type_text(&mut app, "zzzqqq");
        let lines = screen(&draw(&app, 100, 20));
        assert!(contains(&lines, "No matches found"));
        assert!(contains(&lines, "matches: 0"));

        let mut app = make_app(Config::default(), 100, 20);
        app.apply_reload(Err(anyhow!("boom")));
        assert!(contains(&screen(&draw(&app, 100, 20)), "Error: boom"));
    }

    #[test]
    fn test_narrow_terminal_splits_header() {
        let app = make_app(Config::default(), 40, 20);
        let lines = screen(&draw(&app, 40, 20));
        let (_, indicators) = find(&lines, "fuzzy").unwrap();
        let (_, prompt) = find(&lines, "> ").unwrap();
        assert_eq!(indicators + 1, prompt);
    }

    #[test]
    fn test_help_overlay() {
        let mut app = make_app(Config::default(), 100, 30);
        press(&mut app, "?");
        let lines = screen(&draw(&app, 100, 30));
        assert!(contains(&lines, "Keybindings"));
        assert!(contains(&lines, "ctrl+s"));
        assert!(contains(&lines, "Cycle match mode"));
        assert!(contains(&lines, "Press any key to dismiss"));
        assert!(!contains(&lines, "git status"));
    }

    #[test]
    fn test_preview_popup() {
        let mut app = make_app(Config::default(), 120, 20);
        type_text(&mut app, "echo");
        let lines = screen(&draw(&app, 120, 20));
        assert!(contains(&lines, "alt+p preview"));

        press(&mut app, "alt+p");
        let lines = screen(&draw(&app, 120, 20));
        assert!(contains(&lines, "Command Preview"));
        let (_, first) = find(&lines, "echo one").unwrap();
        let (_, second) = find(&lines, "echo two").unwrap();
        assert_eq!(first + 1, second);
    }

    #[test]
    fn test_expand_mode_spans_rows() {
        let config = Config {
            display: DisplayConfig { multiline_mode: MultilineMode::Expand, ..DisplayConfig::default() },
            ..Config::default()
        };
        let mut app = make_app(config, 100, 20);
        type_text(&mut app, "echo");
        let lines = screen(&draw(&app, 100, 20));

        let (x, first) = find(&lines, "echo one").unwrap();
        assert_eq!(find(&lines, "echo two"), Some((x, first + 1)));
        // gutter sits just inside the border and padding
        assert_eq!(lines[first as usize + 1].chars().nth(2), Some('│'));
        assert!(!contains(&lines, "echo one echo two"));
    }

    #[test]
    fn test_expand_mode_without_bar_has_blank_gutter() {
        let config = Config {
            display: DisplayConfig { multiline_mode: MultilineMode::Expand, ..DisplayConfig::default() },
            theme: ThemeConfig { selection_bar_show: false, ..ThemeConfig::default() },
            ..Config::default()
        };
        let mut app = make_app(config, 100, 20);
        type_text(&mut app, "echo");
        let lines = screen(&draw(&app, 100, 20));
        let (_, second) = find(&lines, "echo two").unwrap();
        assert_eq!(lines[second as usize].chars().nth(2), Some(' '));
        assert!(!contains(&lines, "▌"));
    }

    #[test]
    fn test_preview_pane() {
        let config = Config {
            display: DisplayConfig { multiline_mode: MultilineMode::PreviewPane, ..DisplayConfig::default() },
            ..Config::default()
        };
        let mut app = make_app(config, 100, 30);
        type_text(&mut app, "echo");
        let lines = screen(&draw(&app, 100, 30));
        let (_, header) = find(&lines, "─ Preview ─").unwrap();
        assert!(lines[header as usize + 1].contains("echo one"));
        assert!(lines[header as usize + 2].contains("echo two"));
    }

    #[test]
    fn test_directory_column() {
        let config = Config {
            display: DisplayConfig { show_directory: true, ..DisplayConfig::default() },
            ..Config::default()
        };
        let app = make_app(config, 100, 20);
        let lines = screen(&draw(&app, 100, 20));
        assert!(contains(&lines, "dir"));
        assert!(contains(&lines, "~/src"));
    }

    #[test]
    fn test_wide_commands_keep_columns_aligned() {
        let config = Config {
            display: DisplayConfig { show_directory: true, ..DisplayConfig::default() },
            ..Config::default()
        };
        let mut app = make_app(config, 100, 20);
        app.apply_reload(Ok(vec![entry("日本語 echo", 0), entry("git status", 0)]));
        let lines = screen(&draw(&app, 100, 20));

        let dir_columns: Vec<usize> = lines
            .iter()
            .filter(|l| l.contains("echo") || l.contains("git status"))
            .filter_map(|l| l.find("~/src").map(|b| l[..b].chars().count()))
            .collect();
        assert_eq!(dir_columns.len(), 2);
        assert_eq!(dir_columns[0], dir_columns[1]);
    }

    #[test]
    fn test_hints_hidden() {
        let config = Config {
            display: DisplayConfig { show_hints: false, ..DisplayConfig::default() },
            ..Config::default()
        };
        let app = make_app(config, 100, 20);
        let lines = screen(&draw(&app, 100, 20));
        assert!(!contains(&lines, "matches:"));
        assert!(!contains(&lines, "select"));
    }

    #[test]
    fn test_status_message_in_footer() {
        let mut app = make_app(Config::default(), 100, 20);
        app.copy_finished(Ok(()));
        let lines = screen(&draw(&app, 100, 20));
        assert!(contains(&lines, "Copied to clipboard"));
        assert!(contains(&lines, "matches: 4"));
    }

    #[test]
    fn test_footer_gap() {
        assert_eq!(footer_gap(4, 5, 12), Some(3));
        assert_eq!(footer_gap(9, 5, 7), None);
        assert_eq!(footer_gap(4, 5, 9), None);
    }

    #[test]
    fn test_footer_falls_back_to_match_count() {
        let app = make_app(Config::default(), 16, 20);
        let lines = screen(&draw(&app, 16, 20));
        assert!(contains(&lines, "matches: 4"));
        assert!(!contains(&lines, "nav"));
    }

    #[test]
    fn test_match_count_label() {
        assert_eq!(match_count_label(0), "matches: 0");
        assert_eq!(match_count_label(2), "matches: 2");
    }

    #[test]
    fn test_long_query_keeps_tail_visible() {
        let mut app = make_app(Config::default(), 40, 20);
        type_text(&mut app, &format!("{}END", "x".repeat(60)));
        let lines = screen(&draw(&app, 40, 20));
        assert!(contains(&lines, "xEND"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let app = make_app(Config::default(), 5, 3);
        draw(&app, 5, 3);
        let app = make_app(Config::default(), 1, 1);
        draw(&app, 1, 1);
    }
}
