use regex::RegexBuilder;
use tracing::debug;

use super::EXACT_MATCH_SCORE;
use crate::models::{Match, MatchRange};

/// Case-insensitive regular expression matching.
///
/// Queries that fail to compile (common while the user is still typing)
/// produce no matches instead of an error. Every non-overlapping hit becomes a
/// range; zero-width hits select the candidate without adding a range.
pub fn match_regex(query: &str, candidates: &[String]) -> Vec<Match> {
    if query.is_empty() {
        return Vec::new();
    }

    let re = match RegexBuilder::new(query).case_insensitive(true).build() {
        Ok(re) => re,
        Err(e) => {
            debug!(query, error = %e, "regex query does not compile");
            return Vec::new();
        }
    };

    let mut matches = Vec::new();
    for (index, candidate) in candidates.iter().enumerate() {
        let mut found = false;
        let mut ranges = Vec::new();
        let mut offsets = CharOffsets::new(candidate);

        for hit in re.find_iter(candidate) {
            found = true;
            if hit.start() < hit.end() {
                let start = offsets.char_index(hit.start());
                let end = offsets.char_index(hit.end());
                ranges.push(MatchRange::new(start, end));
            }
        }

        if found {
            matches.push(Match { index, score: EXACT_MATCH_SCORE, ranges });
        }
    }

    matches
}

/// Converts ascending byte offsets into character offsets in one pass.
struct CharOffsets<'a> {
    text: &'a str,
    byte_pos: usize,
    char_pos: usize,
}

impl<'a> CharOffsets<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, byte_pos: 0, char_pos: 0 }
    }

    /// `byte` must be a char boundary and not lower than the previous call.
    fn char_index(&mut self, byte: usize) -> usize {
        if byte > self.byte_pos {
            self.char_pos += self.text[self.byte_pos..byte].chars().count();
            self.byte_pos = byte;
        }
        self.char_pos
    }
}
