use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::KeyConfig;

/// A key press in canonical form.
///
/// `spec` is what key bindings are compared against (`ctrl+s`, `alt+f`,
/// `enter`, `?`). `text` is set when the key should type a character into
/// the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub spec: String,
    pub text: Option<char>,
}

impl KeyPress {
    /// Build from a spec string. Single characters also carry `text`.
    pub fn from_spec(spec: &str) -> Self {
        let mut chars = spec.chars();
        let text = match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ if spec == "space" => Some(' '),
            _ => None,
        };
        Self { spec: spec.to_string(), text }
    }
}

/// Input fed to [`super::App::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Key(KeyPress),
    Resize { width: u16, height: u16 },
    /// Periodic wakeup with no input.
    Tick,
}

/// Everything a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ModeNext,
    ModeFuzzy,
    ModeRegex,
    ModeGlob,
    ToggleCwd,
    ToggleDedupe,
    ToggleFails,
    Accept,
    Cancel,
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
    Help,
    PreviewCommand,
    Copy,
    ClearQuery,
    DeleteWord,
    DeleteChar,
}

/// Resolve a key spec against the configured bindings.
///
/// `ctrl+c` always cancels. Other configured bindings win over the fixed
/// fallbacks (`ctrl+p`, `ctrl+n`, `ctrl+u`, `ctrl+w`, `backspace`). Returns
/// `None` for keys that should be treated as text input.
pub fn resolve_action(keys: &KeyConfig, spec: &str) -> Option<Action> {
    // ctrl+c cancels whatever it is bound to.
    if spec == "ctrl+c" {
        return Some(Action::Cancel);
    }

    let bindings: [(&str, Action); 18] = [
        (keys.help.as_str(), Action::Help),
        (keys.cancel.as_str(), Action::Cancel),
        (keys.accept.as_str(), Action::Accept),
        (keys.up.as_str(), Action::Up),
        (keys.down.as_str(), Action::Down),
        (keys.page_up.as_str(), Action::PageUp),
        (keys.page_down.as_str(), Action::PageDown),
        (keys.top.as_str(), Action::Top),
        (keys.bottom.as_str(), Action::Bottom),
        (keys.mode_next.as_str(), Action::ModeNext),
        (keys.mode_fuzzy.as_str(), Action::ModeFuzzy),
        (keys.mode_regex.as_str(), Action::ModeRegex),
        (keys.mode_glob.as_str(), Action::ModeGlob),
        (keys.toggle_cwd.as_str(), Action::ToggleCwd),
        (keys.toggle_dedupe.as_str(), Action::ToggleDedupe),
        (keys.toggle_fails.as_str(), Action::ToggleFails),
        (keys.preview_command.as_str(), Action::PreviewCommand),
        (keys.copy.as_str(), Action::Copy),
    ];

    if let Some((_, action)) = bindings.iter().find(|(bound, _)| !bound.is_empty() && *bound == spec) {
        return Some(*action);
    }

    match spec {
        "ctrl+p" => Some(Action::Up),
        "ctrl+n" => Some(Action::Down),
        "ctrl+u" => Some(Action::ClearQuery),
        "ctrl+w" => Some(Action::DeleteWord),
        "backspace" => Some(Action::DeleteChar),
        _ => None,
    }
}

/// Poll for terminal input and convert it to a message
pub fn poll_event(timeout: Duration) -> anyhow::Result<Message> {
    if !event::poll(timeout)? {
        return Ok(Message::Tick);
    }
    match event::read()? {
        Event::Key(key) if key.kind != KeyEventKind::Release => {
            Ok(key_to_press(key).map_or(Message::Tick, Message::Key))
        }
        Event::Resize(width, height) => Ok(Message::Resize { width, height }),
        _ => Ok(Message::Tick),
    }
}

/// Canonical name of a key event, or `None` for keys with no name.
pub fn key_to_press(key: KeyEvent) -> Option<KeyPress> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    let base = match key.code {
        KeyCode::Char(' ') if !ctrl && !alt => {
            return Some(KeyPress { spec: "space".to_string(), text: Some(' ') });
        }
        KeyCode::Char(c) if !ctrl && !alt => {
            return Some(KeyPress { spec: c.to_string(), text: Some(c) });
        }
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_lowercase().collect(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => return Some(KeyPress { spec: "shift+tab".to_string(), text: None }),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::PageUp => "pgup".to_string(),
        KeyCode::PageDown => "pgdown".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::F(n) => format!("f{}", n),
        _ => return None,
    };

    let is_char = matches!(key.code, KeyCode::Char(_));
    let mut spec = String::new();
    if alt {
        spec.push_str("alt+");
    }
    if ctrl {
        spec.push_str("ctrl+");
    }
    if shift && !is_char {
        spec.push_str("shift+");
    }
    spec.push_str(&base);
    Some(KeyPress { spec, text: None })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(code: KeyCode, modifiers: KeyModifiers) -> String {
        key_to_press(KeyEvent::new(code, modifiers)).unwrap().spec
    }

    #[test]
    fn test_control_and_alt_specs() {
        assert_eq!(spec(KeyCode::Char('s'), KeyModifiers::CONTROL), "ctrl+s");
        assert_eq!(spec(KeyCode::Char('f'), KeyModifiers::ALT), "alt+f");
        assert_eq!(spec(KeyCode::Char('S'), KeyModifiers::CONTROL | KeyModifiers::SHIFT), "ctrl+s");
        assert_eq!(spec(KeyCode::Char('x'), KeyModifiers::CONTROL | KeyModifiers::ALT), "alt+ctrl+x");
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(spec(KeyCode::Enter, KeyModifiers::NONE), "enter");
        assert_eq!(spec(KeyCode::Esc, KeyModifiers::NONE), "esc");
        assert_eq!(spec(KeyCode::PageUp, KeyModifiers::NONE), "pgup");
        assert_eq!(spec(KeyCode::PageDown, KeyModifiers::NONE), "pgdown");
        assert_eq!(spec(KeyCode::Home, KeyModifiers::NONE), "home");
        assert_eq!(spec(KeyCode::Up, KeyModifiers::SHIFT), "shift+up");
        assert_eq!(spec(KeyCode::BackTab, KeyModifiers::SHIFT), "shift+tab");
        assert_eq!(spec(KeyCode::F(5), KeyModifiers::NONE), "f5");
    }

    #[test]
    fn test_printable_chars_carry_text() {
        let press = key_to_press(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)).unwrap();
        assert_eq!(press, KeyPress { spec: "A".to_string(), text: Some('A') });

        let space = key_to_press(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)).unwrap();
        assert_eq!(space.text, Some(' '));

        let ctrl = key_to_press(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL)).unwrap();
        assert_eq!(ctrl.text, None);
    }

    #[test]
    fn test_unnamed_key() {
        assert!(key_to_press(KeyEvent::new(KeyCode::Null, KeyModifiers::NONE)).is_none());
    }

    #[test]
    fn test_from_spec() {
        assert_eq!(KeyPress::from_spec("?").text, Some('?'));
        assert_eq!(KeyPress::from_spec("space").text, Some(' '));
        assert_eq!(KeyPress::from_spec("ctrl+s").text, None);
    }

    #[test]
    fn test_resolve_default_bindings() {
        let keys = KeyConfig::default();
        assert_eq!(resolve_action(&keys, "ctrl+s"), Some(Action::ModeNext));
        assert_eq!(resolve_action(&keys, "alt+r"), Some(Action::ModeRegex));
        assert_eq!(resolve_action(&keys, "enter"), Some(Action::Accept));
        assert_eq!(resolve_action(&keys, "esc"), Some(Action::Cancel));
        assert_eq!(resolve_action(&keys, "?"), Some(Action::Help));
        assert_eq!(resolve_action(&keys, "ctrl+y"), Some(Action::Copy));
        assert_eq!(resolve_action(&keys, "a"), None);
    }

    #[test]
    fn test_resolve_fallbacks() {
        let keys = KeyConfig::default();
        assert_eq!(resolve_action(&keys, "ctrl+c"), Some(Action::Cancel));
        assert_eq!(resolve_action(&keys, "ctrl+p"), Some(Action::Up));
        assert_eq!(resolve_action(&keys, "ctrl+u"), Some(Action::ClearQuery));
        assert_eq!(resolve_action(&keys, "backspace"), Some(Action::DeleteChar));
    }

    #[test]
    fn test_custom_binding_overrides_fallback() {
        let keys = KeyConfig { toggle_cwd: "ctrl+w".to_string(), ..KeyConfig::default() };
        assert_eq!(resolve_action(&keys, "ctrl+w"), Some(Action::ToggleCwd));
    }

    #[test]
    fn test_ctrl_c_cancels_even_when_rebound() {
        let keys = KeyConfig { toggle_cwd: "ctrl+c".to_string(), ..KeyConfig::default() };
        assert_eq!(resolve_action(&keys, "ctrl+c"), Some(Action::Cancel));

        let keys = KeyConfig { cancel: "esc".to_string(), copy: "ctrl+c".to_string(), ..KeyConfig::default() };
        assert_eq!(resolve_action(&keys, "ctrl+c"), Some(Action::Cancel));
        assert_eq!(resolve_action(&keys, "esc"), Some(Action::Cancel));
    }

    #[test]
    fn test_empty_binding_is_unbound() {
        let keys = KeyConfig { help: String::new(), ..KeyConfig::default() };
        assert_eq!(resolve_action(&keys, ""), None);
        assert_eq!(resolve_action(&keys, "?"), None);
    }
}
