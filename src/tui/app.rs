//! Picker state and the reducer that drives it.
//!
//! [`App::update`] is a pure `(state, message) -> command` step: it never
//! touches storage or the clipboard. Side effects are requested through the
//! returned [`Command`] and performed by [`App::run`], which feeds results
//! back with [`App::apply_reload`] and [`App::copy_finished`].
//!
//! Recomputing the ranked list always runs over the whole candidate set; the
//! renderer only ever reads the visible window.

use std::ops::Range;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::{debug, info, warn};

use super::events::{Action, KeyPress, Message, poll_event, resolve_action};
use super::layout::{self, Indicator, RESULTS_HEADER_ROWS};
use super::rendering::render_ui;
use super::styles::Styles;
use crate::clipboard::copy_to_clipboard;
use crate::config::{Config, MultilineMode, Scope};
use crate::matcher::MatchMode;
use crate::models::{HistoryEntry, ScoredEntry};
use crate::ranking::{self, ScoringOptions};
use crate::storage::{DEFAULT_CANDIDATE_LIMIT, HistoryStore};

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Longest query the input accepts, in characters.
pub const QUERY_CHAR_LIMIT: usize = 256;
const DEFAULT_WIDTH: usize = 80;
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

/// Side effect requested by [`App::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    /// Fetch candidates again with the current toggles.
    Reload,
    Quit,
    CopyToClipboard(String),
}

/// How the picker ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Accepted. The text is empty when the list was empty.
    Selected(String),
    Cancelled,
}

/// What the caller passes in when starting a search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub query: String,
    pub cwd_mode: bool,
    /// Upper bound on result rows.
    pub max_height: usize,
    pub cwd: String,
    pub home: String,
}

pub struct App {
    pub(super) config: Config,
    pub(super) styles: Styles,
    pub(super) query: String,
    pub(super) mode: MatchMode,
    pub(super) enabled_modes: Vec<MatchMode>,
    pub(super) cwd_mode: bool,
    pub(super) dedupe: bool,
    pub(super) only_failures: bool,
    pub(super) cwd: String,
    pub(super) home: String,
    entries: Vec<HistoryEntry>,
    candidates: Vec<String>,
    pub(super) display_entries: Vec<ScoredEntry>,
    pub(super) cursor: usize,
    /// Usable columns inside the panel.
    pub(super) width: usize,
    /// Result rows, column header included.
    pub(super) height: usize,
    max_height: usize,
    terminal_size: Option<(u16, u16)>,
    selected: Option<String>,
    cancelled: bool,
    quitting: bool,
    pub(super) show_help: bool,
    pub(super) show_preview: bool,
    pub(super) preview_command: String,
    pub(super) store_error: Option<String>,
    pub(super) status_message: Option<StatusMessage>,
    needs_redraw: bool,
}

impl App {
    /// Build the initial state. Candidates arrive through [`App::reload`] or
    /// [`App::apply_reload`].
    pub fn new(config: Config, options: SearchOptions) -> Self {
        let max_height = options.max_height.max(1);
        let enabled_modes = config.display.enabled_modes();
        let mode = config.display.initial_mode();
        let cwd_mode = options.cwd_mode || config.display.default_scope == Scope::Cwd;
        let styles = Styles::new(&config.theme);

        let mut query = options.query;
        if query.chars().count() > QUERY_CHAR_LIMIT {
            query = query.chars().take(QUERY_CHAR_LIMIT).collect();
        }

        Self {
            config,
            styles,
            query,
            mode,
            enabled_modes,
            cwd_mode,
            dedupe: true,
            only_failures: false,
            cwd: options.cwd,
            home: options.home,
            entries: Vec::new(),
            candidates: Vec::new(),
            display_entries: Vec::new(),
            cursor: 0,
            width: DEFAULT_WIDTH,
            height: max_height,
            max_height,
            terminal_size: None,
            selected: None,
            cancelled: false,
            quitting: false,
            show_help: false,
            show_preview: false,
            preview_command: String::new(),
            store_error: None,
            status_message: None,
            needs_redraw: true,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn display_entries(&self) -> &[ScoredEntry] {
        &self.display_entries
    }

    pub fn store_error(&self) -> Option<&str> {
        self.store_error.as_deref()
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn outcome(&self) -> Option<SearchOutcome> {
        if self.cancelled {
            return Some(SearchOutcome::Cancelled);
        }
        self.selected.clone().map(SearchOutcome::Selected)
    }

    pub(super) fn selected_entry(&self) -> Option<&ScoredEntry> {
        self.display_entries.get(self.cursor)
    }

    pub(super) fn selected_is_multiline(&self) -> bool {
        self.selected_entry().is_some_and(|e| e.entry.is_multiline())
    }

    /// Fetch candidates with the current toggles and apply them.
    pub fn reload(&mut self, store: &impl HistoryStore) {
        let started = Instant::now();
        let result = store.fetch_candidates(DEFAULT_CANDIDATE_LIMIT, self.dedupe, self.only_failures);
        debug!(
            dedupe = self.dedupe,
            only_failures = self.only_failures,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetched candidates"
        );
        self.apply_reload(result);
    }

    /// Replace the candidate set with a storage result.
    ///
    /// A failure empties the list and keeps the error for display until the
    /// next successful reload.
    pub fn apply_reload(&mut self, result: Result<Vec<HistoryEntry>>) {
        self.needs_redraw = true;
        let mut entries = match result {
            Ok(entries) => entries,
            Err(e) => {
                warn!("failed to load history: {:#}", e);
                self.store_error = Some(format!("{:#}", e));
                self.entries.clear();
                self.candidates.clear();
                self.display_entries.clear();
                self.cursor = 0;
                return;
            }
        };

        self.store_error = None;
        if self.cwd_mode && !self.cwd.is_empty() {
            entries.retain(|e| e.directory == self.cwd);
        }
        if self.config.display.hide_multiline {
            entries.retain(|e| !e.is_multiline());
        }

        info!(count = entries.len(), cwd_mode = self.cwd_mode, "loaded candidates");
        self.candidates = entries.iter().map(|e| e.command.clone()).collect();
        self.entries = entries;
        self.recompute();
    }

    fn scoring_options(&self) -> ScoringOptions {
        ScoringOptions {
            cwd: self.cwd.clone(),
            cwd_bonus: if self.cwd_mode { 0 } else { self.config.display.cwd_boost },
            recency_base: self.config.display.recency_base,
        }
    }

    /// Rank the whole candidate set for the current query and mode.
    fn recompute(&mut self) {
        let opts = self.scoring_options();
        self.display_entries = ranking::rank(&self.entries, &self.candidates, &self.query, self.mode, &opts);
        self.cursor = 0;
        self.needs_redraw = true;
    }

    /// Advance the state by one message.
    pub fn update(&mut self, message: Message) -> Command {
        match message {
            Message::Key(key) => {
                self.needs_redraw = true;
                self.handle_key(&key)
            }
            Message::Resize { width, height } => {
                self.terminal_size = Some((width, height));
                self.fit_to_terminal();
                Command::None
            }
            Message::Tick => {
                if self.clear_expired_status() {
                    self.fit_to_terminal();
                }
                Command::None
            }
        }
    }

    fn handle_key(&mut self, key: &KeyPress) -> Command {
        if self.show_preview {
            self.show_preview = false;
            self.preview_command.clear();
            return Command::None;
        }
        if self.show_help {
            self.show_help = false;
            return Command::None;
        }

        match resolve_action(&self.config.keys, &key.spec) {
            Some(action) => self.handle_action(action),
            None => {
                if let Some(c) = key.text {
                    self.insert_char(c);
                }
                Command::None
            }
        }
    }

    fn handle_action(&mut self, action: Action) -> Command {
        match action {
            Action::Help => self.show_help = true,
            Action::Cancel => {
                self.quitting = true;
                self.cancelled = true;
                return Command::Quit;
            }
            Action::Accept => {
                let command = self.selected_entry().map(|e| e.entry.command.clone()).unwrap_or_default();
                self.selected = Some(command);
                self.quitting = true;
                return Command::Quit;
            }
            Action::Up => self.cursor = self.cursor.saturating_sub(1),
            Action::Down => self.move_down(1),
            Action::PageUp => self.cursor = self.cursor.saturating_sub(self.page_size()),
            Action::PageDown => self.move_down(self.page_size()),
            Action::Top => self.cursor = 0,
            Action::Bottom => self.cursor = self.display_entries.len().saturating_sub(1),
            Action::ModeNext => {
                let next = self.mode.next(&self.enabled_modes);
                self.set_mode(next);
            }
            Action::ModeFuzzy => self.set_mode(MatchMode::Fuzzy),
            Action::ModeRegex => self.set_mode(MatchMode::Regex),
            Action::ModeGlob => self.set_mode(MatchMode::Glob),
            Action::ToggleCwd => {
                self.cwd_mode = !self.cwd_mode;
                return Command::Reload;
            }
            Action::ToggleDedupe => {
                self.dedupe = !self.dedupe;
                return Command::Reload;
            }
            Action::ToggleFails => {
                self.only_failures = !self.only_failures;
                return Command::Reload;
            }
            Action::PreviewCommand => {
                if self.config.display.multiline_mode == MultilineMode::Popup
                    && let Some(entry) = self.selected_entry()
                    && entry.entry.is_multiline()
                {
                    self.preview_command = entry.entry.command.clone();
                    self.show_preview = true;
                }
            }
            Action::Copy => match self.selected_entry() {
                Some(entry) => return Command::CopyToClipboard(entry.entry.command.clone()),
                None => self.set_status("✗ No entry to copy", MessageType::Error, STATUS_ERROR_DURATION_MS),
            },
            Action::ClearQuery => self.edit_query(String::clear),
            Action::DeleteWord => self.edit_query(delete_word),
            Action::DeleteChar => self.edit_query(|q| {
                q.pop();
            }),
        }
        Command::None
    }

    fn move_down(&mut self, step: usize) {
        let last = self.display_entries.len().saturating_sub(1);
        self.cursor = self.cursor.saturating_add(step).min(last);
    }

    /// Switch to `mode` if it is enabled.
    fn set_mode(&mut self, mode: MatchMode) {
        if !self.config.display.is_enabled(mode) {
            return;
        }
        if mode != self.mode {
            debug!(%mode, "match mode changed");
        }
        self.mode = mode;
        self.recompute();
    }

    fn insert_char(&mut self, c: char) {
        if c.is_control() || self.query.chars().count() >= QUERY_CHAR_LIMIT {
            return;
        }
        self.query.push(c);
        self.recompute();
    }

    /// Apply `edit` to the query and re-rank only if it changed.
    fn edit_query(&mut self, edit: impl FnOnce(&mut String)) {
        let before = self.query.clone();
        edit(&mut self.query);
        if self.query != before {
            self.recompute();
        }
    }

    /// Rows available to entries, excluding the column header.
    pub fn page_size(&self) -> usize {
        let header = if self.height > RESULTS_HEADER_ROWS { RESULTS_HEADER_ROWS } else { 0 };
        self.height.saturating_sub(header).max(1)
    }

    /// Display ranks currently in view. Scrolls so the cursor is the last
    /// visible row once it passes the first page.
    pub fn visible_range(&self) -> Range<usize> {
        let count = self.display_entries.len();
        if count == 0 {
            return 0..0;
        }
        let header = if self.height > RESULTS_HEADER_ROWS { RESULTS_HEADER_ROWS } else { 0 };
        let max_visible = self.height.saturating_sub(header).min(count);
        if max_visible == 0 {
            return 0..0;
        }

        let mut start = if self.cursor >= max_visible { self.cursor + 1 - max_visible } else { 0 };
        let mut end = start + max_visible;
        if end > count {
            end = count;
            start = end.saturating_sub(max_visible);
        }
        start..end
    }

    pub(super) fn prompt_width(&self) -> usize {
        self.config.theme.prompt.chars().count()
    }

    /// Mode and toggle indicators that fit the current width.
    pub(super) fn indicators(&self) -> Vec<Indicator> {
        let all = layout::build_indicators(
            &self.enabled_modes,
            self.mode,
            self.cwd_mode,
            self.only_failures,
            self.dedupe,
        );
        layout::fit_indicators(all, self.width)
    }

    pub(super) fn is_merged(&self) -> bool {
        let indicators = layout::indicators_width(&self.indicators());
        layout::input_merged(self.width, self.prompt_width(), indicators)
    }

    pub(super) fn shows_footer(&self) -> bool {
        self.config.display.show_hints || self.status_message.is_some()
    }

    pub(super) fn preview_pane(&self) -> bool {
        self.config.display.multiline_mode == MultilineMode::PreviewPane
    }

    fn chrome_height(&self) -> usize {
        layout::chrome_height(self.is_merged(), self.preview_pane(), self.shows_footer())
    }

    /// Total rows the panel occupies, border included.
    pub(super) fn panel_height(&self) -> usize {
        usize::from(layout::PANEL_BORDER) + self.chrome_height() + self.height
    }

    /// Recompute width and result rows for the last known terminal size.
    fn fit_to_terminal(&mut self) {
        let Some((width, height)) = self.terminal_size else {
            return;
        };
        self.width = layout::inner_width(width);
        let available = usize::from(height)
            .saturating_sub(self.chrome_height() + usize::from(layout::PANEL_BORDER))
            .max(1);
        self.height = available.min(self.max_height);
        self.cursor = self.cursor.min(self.display_entries.len().saturating_sub(1));
        self.needs_redraw = true;
    }

    /// Set a transient status message with automatic expiry
    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.fit_to_terminal();
        self.needs_redraw = true;
    }

    /// Drop an expired status message. Returns whether one was dropped.
    fn clear_expired_status(&mut self) -> bool {
        let expired = self.status_message.as_ref().is_some_and(|msg| Instant::now() >= msg.expires_at);
        if expired {
            self.status_message = None;
            self.needs_redraw = true;
        }
        expired
    }

    /// Report the result of a [`Command::CopyToClipboard`].
    pub fn copy_finished(&mut self, result: Result<()>) {
        match result {
            Ok(()) => self.set_status("✓ Copied to clipboard", MessageType::Success, STATUS_SUCCESS_DURATION_MS),
            Err(e) => {
                warn!("clipboard copy failed: {:#}", e);
                self.set_status(format!("✗ Clipboard error: {}", e), MessageType::Error, STATUS_ERROR_DURATION_MS)
            }
        }
    }

    /// Run the event loop until the user accepts or cancels.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>, store: &impl HistoryStore) -> Result<()> {
        let size = terminal.size()?;
        self.update(Message::Resize { width: size.width, height: size.height });

        while !self.quitting {
            if self.needs_redraw {
                terminal.draw(|f| render_ui(f, &*self))?;
                self.needs_redraw = false;
            }

            let message = poll_event(POLL_INTERVAL)?;
            match self.update(message) {
                Command::None | Command::Quit => {}
                Command::Reload => self.reload(store),
                Command::CopyToClipboard(text) => {
                    let result = copy_to_clipboard(&text);
                    self.copy_finished(result);
                }
            }
        }

        Ok(())
    }
}

/// Remove trailing whitespace and the word before it.
fn delete_word(query: &mut String) {
    let trimmed = query.trim_end().len();
    let cut = query[..trimmed]
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8());
    query.truncate(cut);
}
