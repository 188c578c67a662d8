//! Query matching strategies.
//!
//! A matcher is a pure function from `(query, candidates)` to a list of
//! [`Match`]es. Three strategies exist and exactly one is active at a time:
//!
//! - **Fuzzy**: subsequence matching scored by `nucleo`
//! - **Regex**: case-insensitive regular expression, every hit highlighted
//! - **Glob**: whole-string shell glob, no highlighting
//!
//! Every strategy returns an empty list for an empty query. Callers that
//! want the unfiltered listing go through [`crate::ranking::rank`], which
//! substitutes identity matches instead.

pub mod fuzzy;
pub mod regexp;
pub mod wildcard;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::Match;

pub use fuzzy::match_fuzzy;
pub use regexp::match_regex;
pub use wildcard::{glob_to_regex, match_glob};

/// Score given to every regex and glob hit. Equal to the highest score the
/// fuzzy matcher can produce, so exact filters never rank below fuzzy hits.
pub const EXACT_MATCH_SCORE: i64 = u16::MAX as i64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Fuzzy,
    Regex,
    Glob,
}

impl MatchMode {
    pub const ALL: [MatchMode; 3] = [MatchMode::Fuzzy, MatchMode::Regex, MatchMode::Glob];

    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::Fuzzy => "fuzzy",
            MatchMode::Regex => "regex",
            MatchMode::Glob => "glob",
        }
    }

    /// Next mode in `enabled`, wrapping around.
    ///
    /// When `self` is not part of `enabled` the first enabled mode is
    /// returned. An empty `enabled` list leaves the mode unchanged.
    pub fn next(self, enabled: &[MatchMode]) -> MatchMode {
        let Some(first) = enabled.first() else {
            return self;
        };

        match enabled.iter().position(|mode| *mode == self) {
            Some(pos) => enabled[(pos + 1) % enabled.len()],
            None => *first,
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fuzzy" | "" => Ok(MatchMode::Fuzzy),
            "regex" => Ok(MatchMode::Regex),
            "glob" => Ok(MatchMode::Glob),
            other => anyhow::bail!("unknown match mode '{}' (expected fuzzy, regex or glob)", other),
        }
    }
}

/// Run the matcher for `mode` against `candidates`.
pub fn find_matches(mode: MatchMode, query: &str, candidates: &[String]) -> Vec<Match> {
    match mode {
        MatchMode::Fuzzy => match_fuzzy(query, candidates),
        MatchMode::Regex => match_regex(query, candidates),
        MatchMode::Glob => match_glob(query, candidates),
    }
}
