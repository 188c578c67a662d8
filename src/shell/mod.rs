//! Shell integration scripts printed by `histsearch init`.
//!
//! Each script records every finished command through `histsearch record`
//! and binds Ctrl+R to `histsearch search`. The search exit status tells the
//! widget what to do: 1 leaves the line alone, 2 runs the selection at once,
//! 0 puts it on the command line for editing.

use std::fmt;

use clap::ValueEnum;

const BASH_SCRIPT: &str = include_str!("scripts/histsearch.bash");
const ZSH_SCRIPT: &str = include_str!("scripts/histsearch.zsh");
const FISH_SCRIPT: &str = include_str!("scripts/histsearch.fish");

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl Shell {
    pub fn as_str(self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
        }
    }

    fn script(self) -> &'static str {
        match self {
            Shell::Bash => BASH_SCRIPT,
            Shell::Zsh => ZSH_SCRIPT,
            Shell::Fish => FISH_SCRIPT,
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quote for POSIX-style shells: single quotes, `'` spliced as `'\''`.
fn posix_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Quote for fish, where backslash escapes work inside single quotes.
fn fish_quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', r"\\").replace('\'', r"\'"))
}

/// The integration script for `shell`.
///
/// With `config_path`, the script first exports `HISTSEARCH_CONFIG` so every
/// `histsearch` call from the shell uses that file.
pub fn init_script(shell: Shell, config_path: Option<&str>) -> String {
    let mut script = String::new();
    if let Some(path) = config_path.filter(|p| !p.is_empty()) {
        let line = match shell {
            Shell::Bash | Shell::Zsh => format!("export HISTSEARCH_CONFIG={}\n", posix_quote(path)),
            Shell::Fish => format!("set -gx HISTSEARCH_CONFIG {}\n", fish_quote(path)),
        };
        script.push_str(&line);
    }
    script.push_str(shell.script());
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Shell; 3] = [Shell::Bash, Shell::Zsh, Shell::Fish];

    #[test]
    fn test_parse_shell_names() {
        assert_eq!(Shell::from_str("bash", true).unwrap(), Shell::Bash);
        assert_eq!(Shell::from_str("ZSH", true).unwrap(), Shell::Zsh);
        assert_eq!(Shell::from_str("fish", false).unwrap(), Shell::Fish);
        assert!(Shell::from_str("nushell", true).is_err());
    }

    #[test]
    fn test_scripts_record_and_bind() {
        for shell in ALL {
            let script = init_script(shell, None);
            assert!(script.contains("histsearch record"), "{}", shell);
            assert!(script.contains("histsearch search"), "{}", shell);
            assert!(script.contains("histsearch session-id"), "{}", shell);
            assert!(script.contains("--exit-code"), "{}", shell);
            assert!(!script.contains("HISTSEARCH_CONFIG"), "{}", shell);
        }
        assert!(init_script(Shell::Bash, None).contains(r#"bind -x '"\C-r": __histsearch_search'"#));
        assert!(init_script(Shell::Zsh, None).contains("bindkey '^R'"));
        assert!(init_script(Shell::Fish, None).contains(r"bind \cr"));
    }

    #[test]
    fn test_scripts_handle_instant_execute() {
        assert!(init_script(Shell::Bash, None).contains("ret -eq 2"));
        assert!(init_script(Shell::Zsh, None).contains("zle accept-line"));
        assert!(init_script(Shell::Fish, None).contains("commandline -f execute"));
    }

    #[test]
    fn test_config_path_is_exported() {
        for shell in ALL {
            let script = init_script(shell, Some("/custom/config.toml"));
            assert!(script.starts_with("export HISTSEARCH_CONFIG=") || script.starts_with("set -gx HISTSEARCH_CONFIG"));
            assert!(script.contains("/custom/config.toml"));
        }
        assert_eq!(init_script(Shell::Zsh, Some("")), init_script(Shell::Zsh, None));
    }

    #[test]
    fn test_config_path_quoting() {
        let bash = init_script(Shell::Bash, Some("/tmp/it's.toml"));
        assert!(bash.starts_with(r"export HISTSEARCH_CONFIG='/tmp/it'\''s.toml'"));

        let fish = init_script(Shell::Fish, Some("/tmp/it's.toml"));
        assert!(fish.starts_with(r"set -gx HISTSEARCH_CONFIG '/tmp/it\'s.toml'"));
    }
}
