//! Terminal output sanitization utilities
//!
//! Stored commands are arbitrary bytes typed into a shell. Anything that is
//! echoed back verbatim (preview popup, preview pane, expanded rows) goes
//! through [`strip_ansi_codes`] first so escape sequences in history cannot
//! repaint the screen under the picker.

/// Strips ANSI CSI escape codes and stray control characters
///
/// Tabs, newlines and carriage returns survive; line layout is handled by
/// [`preview_lines`].
///
/// # Examples
///
/// ```
/// use histsearch::utils::terminal::strip_ansi_codes;
///
/// assert_eq!(strip_ansi_codes("\x1b[31mred\x1b[0m"), "red");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // CSI parameters run until the final letter
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }

        if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
            continue;
        }

        result.push(ch);
    }

    result
}

/// Split a command into display lines no wider than `width` chars.
///
/// Escape codes are stripped, tabs become four spaces and long lines are
/// hard-wrapped. A `width` of zero disables wrapping.
pub fn preview_lines(command: &str, width: usize) -> Vec<String> {
    let clean = strip_ansi_codes(command).replace('\t', "    ");
    let mut lines = Vec::new();

    for line in clean.split('\n') {
        let line = line.trim_end_matches('\r');
        let chars: Vec<char> = line.chars().collect();
        if width == 0 || chars.len() <= width {
            lines.push(line.to_string());
            continue;
        }
        for chunk in chars.chunks(width) {
            lines.push(chunk.iter().collect());
        }
    }

    lines
}
