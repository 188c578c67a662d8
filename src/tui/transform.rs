//! Display transforms for command text.
//!
//! Commands go through collapse, then truncate, then highlight before they
//! are drawn. Each step carries the matched ranges along in the coordinate
//! space of its own output, so highlighting stays aligned with the visible
//! characters. Every index here counts chars, never bytes; widths count
//! terminal columns.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::models::MatchRange;

/// Spaces substituted for a tab.
pub const TAB_WIDTH: usize = 4;
pub const ELLIPSIS: &str = "...";
pub const DEFAULT_COLLAPSE_SYMBOL: &str = " ";

/// Forward map from each transformed character to the source character it
/// came from. Sources are non-decreasing, which makes the inverse lookup a
/// binary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionMap {
    sources: Vec<usize>,
}

impl PositionMap {
    pub fn identity(len: usize) -> Self {
        Self { sources: (0..len).collect() }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn source_of(&self, index: usize) -> Option<usize> {
        self.sources.get(index).copied()
    }

    /// First transformed index whose source is at or after `source`.
    /// Equals `len()` when no such index exists.
    pub fn first_at_or_after(&self, source: usize) -> usize {
        self.sources.partition_point(|&s| s < source)
    }

    /// Remap source ranges into transformed coordinates.
    ///
    /// The start moves forward to the first surviving character, the end
    /// lands one past the last image of the range. Ranges with no image are
    /// dropped.
    pub fn remap(&self, ranges: &[MatchRange]) -> Vec<MatchRange> {
        ranges
            .iter()
            .filter_map(|range| {
                let start = self.first_at_or_after(range.start);
                let end = self.first_at_or_after(range.end);
                (start < end).then(|| MatchRange::new(start, end))
            })
            .collect()
    }
}

fn needs_collapse(text: &str) -> bool {
    text.chars().any(char::is_control)
}

/// Flatten a command onto one line.
///
/// Newlines and carriage returns become `symbol` (a single space when empty)
/// and tabs become [`TAB_WIDTH`] spaces. ANSI CSI sequences such as colour
/// codes are removed whole, other control characters alone.
pub fn collapse_multiline(text: &str, symbol: &str) -> (String, PositionMap) {
    if !needs_collapse(text) {
        return (text.to_string(), PositionMap::identity(text.chars().count()));
    }

    let symbol = if symbol.is_empty() { DEFAULT_COLLAPSE_SYMBOL } else { symbol };
    let mut collapsed = String::with_capacity(text.len());
    let mut sources = Vec::with_capacity(text.len());

    let mut chars = text.chars().enumerate().peekable();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '\u{1b}' if chars.next_if(|&(_, c)| c == '[').is_some() => {
                // CSI: parameter and intermediate bytes up to a final byte.
                for (_, c) in chars.by_ref() {
                    if ('@'..='~').contains(&c) {
                        break;
                    }
                }
            }
            '\n' | '\r' => {
                for sym in symbol.chars() {
                    collapsed.push(sym);
                    sources.push(i);
                }
            }
            '\t' => {
                for _ in 0..TAB_WIDTH {
                    collapsed.push(' ');
                    sources.push(i);
                }
            }
            c if c.is_control() => {}
            c => {
                collapsed.push(c);
                sources.push(i);
            }
        }
    }

    (collapsed, PositionMap { sources })
}

/// Cut `text` to `width` terminal columns, ending in [`ELLIPSIS`] when
/// shortened.
///
/// Width is measured in display columns, so wide characters count twice.
/// Ranges stay in chars: ranges past the cut are dropped, ranges straddling
/// it are clipped. A `width` of zero leaves the text as is.
pub fn truncate_with_ranges(
    text: &str,
    ranges: &[MatchRange],
    width: usize,
) -> (String, Vec<MatchRange>) {
    if width == 0 || text.width() <= width {
        return (text.to_string(), ranges.to_vec());
    }

    let budget = width.saturating_sub(ELLIPSIS.len());
    let mut used = 0;
    let mut truncated = String::with_capacity(text.len());
    let mut cut = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        truncated.push(ch);
        cut += 1;
    }
    truncated.push_str(ELLIPSIS);

    let clipped = ranges
        .iter()
        .filter(|r| r.start < cut)
        .map(|r| MatchRange::new(r.start, r.end.min(cut)))
        .filter(|r| !r.is_empty())
        .collect();

    (truncated, clipped)
}

/// A run of characters that is either entirely highlighted or entirely plain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub matched: bool,
}

/// Split `text` into alternating plain and highlighted runs.
///
/// Ranges are unioned over character positions, so touching or overlapping
/// ranges produce one run. Positions beyond the text are ignored.
pub fn highlight_runs(text: &str, ranges: &[MatchRange]) -> Vec<TextRun> {
    let len = text.chars().count();
    let mut mask = vec![false; len];
    for range in ranges {
        for slot in mask.iter_mut().take(range.end.min(len)).skip(range.start) {
            *slot = true;
        }
    }

    let mut runs: Vec<TextRun> = Vec::new();
    for (ch, matched) in text.chars().zip(mask) {
        match runs.last_mut() {
            Some(run) if run.matched == matched => run.text.push(ch),
            _ => runs.push(TextRun { text: ch.to_string(), matched }),
        }
    }
    runs
}

/// Command text ready to draw plus the ranges to highlight in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayText {
    pub text: String,
    pub ranges: Vec<MatchRange>,
}

impl DisplayText {
    pub fn runs(&self) -> Vec<TextRun> {
        highlight_runs(&self.text, &self.ranges)
    }
}

/// Collapse then truncate a command for a column `width` chars wide.
///
/// Highlighting is dropped entirely when `query` is empty, whatever ranges
/// were stored.
pub fn prepare_display(
    command: &str,
    ranges: &[MatchRange],
    query: &str,
    collapse_symbol: &str,
    width: usize,
) -> DisplayText {
    let (collapsed, map) = collapse_multiline(command, collapse_symbol);
    let remapped = if query.is_empty() { Vec::new() } else { map.remap(ranges) };
    let (text, ranges) = truncate_with_ranges(&collapsed, &remapped, width);
    DisplayText { text, ranges }
}

/// Prepare one physical line of a multiline command.
///
/// `line_start` is the char offset of the line inside the full command; only
/// ranges that fall inside the line are kept.
pub fn prepare_line(
    line: &str,
    line_start: usize,
    ranges: &[MatchRange],
    query: &str,
    width: usize,
) -> DisplayText {
    let line_len = line.chars().count();
    let local: Vec<MatchRange> = ranges
        .iter()
        .filter(|r| r.end > line_start && r.start < line_start + line_len)
        .map(|r| {
            MatchRange::new(
                r.start.saturating_sub(line_start),
                (r.end - line_start).min(line_len),
            )
        })
        .collect();
    prepare_display(line, &local, query, DEFAULT_COLLAPSE_SYMBOL, width)
}
