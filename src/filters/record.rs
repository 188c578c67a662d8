use std::collections::HashSet;

use anyhow::{Context, Result};
use regex::Regex;

use crate::config::FilterConfig;
use crate::matcher::glob_to_regex;

/// Decides whether a finished command is stored in history
///
/// A command is rejected when any of these holds:
/// - it is empty or whitespace only
/// - it is longer than `max_command_length` bytes (when non-zero)
/// - it starts with a space and `ignore_space` is set
/// - its exit code is listed in `exit_code`
/// - it matches a `command_glob` or `command_regex`
/// - its directory matches a `directory_glob` or `directory_regex`
#[derive(Debug)]
pub struct RecordFilter {
    ignore_space: bool,
    exit_codes: HashSet<i32>,
    command_patterns: Vec<Regex>,
    directory_patterns: Vec<Regex>,
    directory_globs: Vec<glob::Pattern>,
    max_command_length: usize,
}

impl RecordFilter {
    /// Compile all patterns. Any invalid pattern is an error.
    pub fn new(config: &FilterConfig) -> Result<Self> {
        let mut command_patterns = Vec::new();
        for glob in &config.command_glob {
            let re = Regex::new(&glob_to_regex(glob))
                .with_context(|| format!("Invalid command glob: {}", glob))?;
            command_patterns.push(re);
        }
        for pattern in &config.command_regex {
            let re = Regex::new(pattern)
                .with_context(|| format!("Invalid command regex: {}", pattern))?;
            command_patterns.push(re);
        }

        let mut directory_globs = Vec::new();
        for glob in &config.directory_glob {
            directory_globs.extend(compile_directory_glob(glob)?);
        }

        let mut directory_patterns = Vec::new();
        for pattern in &config.directory_regex {
            let re = Regex::new(pattern)
                .with_context(|| format!("Invalid directory regex: {}", pattern))?;
            directory_patterns.push(re);
        }

        Ok(Self {
            ignore_space: config.ignore_space,
            exit_codes: config.exit_code.iter().copied().collect(),
            command_patterns,
            directory_patterns,
            directory_globs,
            max_command_length: config.max_command_length,
        })
    }

    pub fn should_record(&self, command: &str, exit_code: i32, directory: &str) -> bool {
        if command.trim().is_empty() {
            return false;
        }
        if self.max_command_length > 0 && command.len() > self.max_command_length {
            return false;
        }
        if self.ignore_space && command.starts_with(' ') {
            return false;
        }
        if self.exit_codes.contains(&exit_code) {
            return false;
        }
        if self.command_patterns.iter().any(|re| re.is_match(command)) {
            return false;
        }
        if self.directory_globs.iter().any(|g| g.matches_with(directory, DIRECTORY_MATCH)) {
            return false;
        }
        !self.directory_patterns.iter().any(|re| re.is_match(directory))
    }
}

const DIRECTORY_MATCH: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Path-aware glob: `*` and `?` stay inside one component, `**` crosses
/// components, and a trailing `/**` also matches the directory itself.
fn compile_directory_glob(pattern: &str) -> Result<Vec<glob::Pattern>> {
    let compile = |p: &str| {
        glob::Pattern::new(p).with_context(|| format!("Invalid directory glob: {}", pattern))
    };
    let mut globs = vec![compile(pattern)?];
    if let Some(dir) = pattern.strip_suffix("/**")
        && !dir.is_empty()
    {
        globs.push(compile(dir)?);
    }
    Ok(globs)
}
