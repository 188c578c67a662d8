use nucleo::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo::{Config, Matcher, Utf32Str};

use crate::models::{Match, MatchRange};

/// Fuzzy subsequence matching backed by `nucleo`.
///
/// Candidates without a subsequence match are dropped. Results are ordered
/// by descending score, ties broken by candidate index.
pub fn match_fuzzy(query: &str, candidates: &[String]) -> Vec<Match> {
    if query.is_empty() {
        return Vec::new();
    }

    let mut matcher = Matcher::new(Config::DEFAULT);
    let atom =
        Atom::new(query, CaseMatching::Ignore, Normalization::Smart, AtomKind::Fuzzy, false);

    let mut buf = Vec::new();
    let mut indices = Vec::new();
    let mut matches = Vec::new();

    for (index, candidate) in candidates.iter().enumerate() {
        indices.clear();
        // Utf32Str::new indexes by grapheme (or by byte for some non-ASCII
        // text); ranges must be char positions.
        let haystack = if candidate.is_ascii() {
            Utf32Str::Ascii(candidate.as_bytes())
        } else {
            buf.clear();
            buf.extend(candidate.chars());
            Utf32Str::Unicode(&buf)
        };
        if let Some(score) = atom.indices(haystack, &mut matcher, &mut indices) {
            indices.sort_unstable();
            indices.dedup();
            matches.push(Match {
                index,
                score: i64::from(score),
                ranges: merge_indices(&indices),
            });
        }
    }

    matches.sort_by(|a, b| b.score.cmp(&a.score).then(a.index.cmp(&b.index)));
    matches
}

/// Merge sorted character positions into contiguous half-open ranges.
fn merge_indices(indices: &[u32]) -> Vec<MatchRange> {
    let mut ranges: Vec<MatchRange> = Vec::new();

    for &idx in indices {
        let idx = idx as usize;
        match ranges.last_mut() {
            Some(last) if last.end == idx => last.end += 1,
            _ => ranges.push(MatchRange::new(idx, idx + 1)),
        }
    }

    ranges
}
