use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::EXACT_MATCH_SCORE;
use crate::models::Match;

/// Whole-string shell glob matching.
///
/// `*` matches any run of characters (including `/` and newlines), `?`
/// matches exactly one character and everything else is literal. Matches
/// carry no ranges since the whole command satisfied the pattern.
pub fn match_glob(query: &str, candidates: &[String]) -> Vec<Match> {
    if query.is_empty() {
        return Vec::new();
    }

    let Some(re) = compile_glob(query) else {
        return Vec::new();
    };

    candidates
        .iter()
        .enumerate()
        .filter(|(_, candidate)| re.is_match(candidate))
        .map(|(index, _)| Match { index, score: EXACT_MATCH_SCORE, ranges: Vec::new() })
        .collect()
}

/// Translate a glob into an anchored regular expression source string.
pub fn glob_to_regex(glob: &str) -> String {
    let mut pattern = String::with_capacity(glob.len() + 8);
    pattern.push('^');

    for ch in glob.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            other => pattern.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }

    pattern.push('$');
    pattern
}

fn compile_glob(glob: &str) -> Option<Regex> {
    match RegexBuilder::new(&glob_to_regex(glob)).dot_matches_new_line(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            debug!(glob, error = %e, "glob query does not compile");
            None
        }
    }
}
