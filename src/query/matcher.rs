//! Glob-style matching of key paths against parsed queries.
//!
//! Literal segments must match exactly. A wildcard consumes one or more
//! consecutive path segments, so `foo.*.baz` matches `foo.bar.baz` and
//! `foo.a.b.baz` but not `foo.baz`.

use super::ast::{ParsedQuery, Segment};

/// Returns true if `path` matches `query`.
///
/// # Example
///
/// ```
/// use findyml::query::{matches, parse};
///
/// let query = parse("foo.*.baz").unwrap();
/// assert!(matches(&["foo", "bar", "baz"], &query));
/// assert!(!matches(&["foo", "baz"], &query));
/// ```
pub fn matches<S: AsRef<str>>(path: &[S], query: &ParsedQuery) -> bool {
    let segments = query.segments();

    if !query.has_wildcard() {
        return path.len() == segments.len()
            && path
                .iter()
                .zip(segments)
                .all(|(p, s)| matches!(s, Segment::Literal(text) if text == p.as_ref()));
    }

    let mut cursor = 0;
    let mut i = 0;

    while i < segments.len() {
        if segments[i].is_wildcard() {
            let run = literal_run(&segments[i + 1..]);
            let after = i + 1 + run.len();

            if run.is_empty() {
                if after == segments.len() {
                    // Trailing wildcard swallows the rest.
                    return cursor < path.len();
                }
                // Another wildcard follows; this one takes exactly one.
                if cursor >= path.len() {
                    return false;
                }
                cursor += 1;
            } else {
                match find_run(path, cursor + 1, &run) {
                    Some(start) => cursor = start + run.len(),
                    None => return false,
                }
            }
            i = after;
        } else {
            let run = literal_run(&segments[i..]);
            if cursor + run.len() > path.len() || !run_matches(&path[cursor..], &run) {
                return false;
            }
            cursor += run.len();
            i += run.len();
        }
    }

    cursor == path.len()
}

/// Collects the literals at the start of `segments`, up to the next wildcard.
fn literal_run(segments: &[Segment]) -> Vec<&str> {
    segments
        .iter()
        .map_while(|s| match s {
            Segment::Literal(text) => Some(text.as_str()),
            Segment::Wildcard => None,
        })
        .collect()
}

/// True if `path` starts with `run`.
fn run_matches<S: AsRef<str>>(path: &[S], run: &[&str]) -> bool {
    path.len() >= run.len() && path.iter().zip(run).all(|(p, r)| p.as_ref() == *r)
}

/// Finds the leftmost start `>= from` where `run` occurs in `path`.
fn find_run<S: AsRef<str>>(path: &[S], from: usize, run: &[&str]) -> Option<usize> {
    let last = path.len().checked_sub(run.len())?;
    (from..=last).find(|&start| run_matches(&path[start..], run))
}
