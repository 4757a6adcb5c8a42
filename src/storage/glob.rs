//! Path glob matching
//!
//! Patterns are `/`-separated; each segment may use `*` (any run of
//! characters within the segment) and `?` (exactly one character).
//! A directory matched by the pattern contributes every file beneath it,
//! so `log_data/*` picks up `log_data/2018/11/2018-11-01-events.json` as
//! well as `log_data/events.json`.

use crate::error::{Error, Result};
use regex::Regex;

/// A compiled glob pattern
#[derive(Debug, Clone)]
pub struct GlobPattern {
    /// Leading segments without wildcards, used as the listing prefix
    literal: Vec<String>,
    /// Remaining segments, one regex each
    segments: Vec<Regex>,
}

impl GlobPattern {
    /// Compile a pattern
    pub fn new(pattern: &str) -> Result<Self> {
        let parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        if parts.is_empty() {
            return Err(Error::config(format!("Empty glob pattern: '{pattern}'")));
        }

        let split = parts
            .iter()
            .position(|p| has_wildcard(p))
            .unwrap_or(parts.len());

        let literal = parts[..split].iter().map(|s| (*s).to_string()).collect();
        let segments = parts[split..]
            .iter()
            .map(|s| segment_regex(s))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { literal, segments })
    }

    /// Leading literal segments
    pub fn literal_prefix(&self) -> &[String] {
        &self.literal
    }

    /// Whether the pattern contains any wildcard
    pub fn has_wildcards(&self) -> bool {
        !self.segments.is_empty()
    }

    /// Match the segments of a path that follow the literal prefix.
    ///
    /// Accepts the path when its leading segments match the pattern; the
    /// path is either matched itself or lies somewhere under a matched
    /// directory. Hidden segments (`_` or `.` prefix) never match.
    pub fn matches_relative<S: AsRef<str>>(&self, rest: &[S]) -> bool {
        if rest.iter().any(|s| is_hidden(s.as_ref())) {
            return false;
        }

        if rest.len() < self.segments.len() {
            return false;
        }

        self.segments
            .iter()
            .zip(rest)
            .all(|(re, seg)| re.is_match(seg.as_ref()))
    }
}

/// Hidden files are skipped the way Hadoop input formats skip them
pub fn is_hidden(segment: &str) -> bool {
    segment.starts_with('_') || segment.starts_with('.')
}

fn has_wildcard(segment: &str) -> bool {
    segment.contains(['*', '?'])
}

fn segment_regex(segment: &str) -> Result<Regex> {
    let mut expr = String::with_capacity(segment.len() + 8);
    expr.push('^');
    for c in segment.chars() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');

    Regex::new(&expr).map_err(|e| Error::config(format!("Invalid glob segment '{segment}': {e}")))
}
