//! Find functionality with regex support for story scripts.
//!
//! Provides line-scoped text search with support for:
//! - Case-sensitive/insensitive matching (insensitive by default)
//! - Whole word matching (literal mode only)
//! - Regular expression patterns
//!
//! Every pattern is evaluated independently against each line, so a match
//! never spans a line break. Matches on one line never overlap: scanning
//! resumes at the end of the previous match.

use regex::{Captures, Regex, RegexBuilder};
use scenekit_core::{content_hash, source_lines};
use serde::{Deserialize, Serialize};

/// Options for find operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Whether the query is a regular expression.
    pub regex: bool,
    /// Whether the search is case-sensitive.
    pub case_sensitive: bool,
    /// Whether to match whole words only. Ignored when `regex` is set.
    pub whole_word: bool,
}

impl SearchOptions {
    /// Create new search options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set regex mode.
    pub fn regex(mut self, value: bool) -> Self {
        self.regex = value;
        self
    }

    /// Set case sensitivity.
    pub fn case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = value;
        self
    }

    /// Set whole word matching.
    pub fn whole_word(mut self, value: bool) -> Self {
        self.whole_word = value;
        self
    }
}

/// A match found in a source snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// 1-based line number.
    pub line: usize,
    /// 1-based char column of the first matched char.
    pub column: usize,
    /// 1-based char column one past the last matched char.
    pub end_column: usize,
    /// The matched text.
    pub matched_text: String,
    /// Full text of the line the match sits on.
    pub line_text: String,
    /// Capture groups 1..n in regex mode (`None` for groups that did not participate).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Option<String>>,
}

impl Match {
    /// Length of the match in chars.
    pub fn len(&self) -> usize {
        self.end_column - self.column
    }

    /// Check if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.end_column == self.column
    }

    /// Returns true if `(line, column)` is at or before the start of this match.
    pub fn starts_at_or_after(&self, line: usize, column: usize) -> bool {
        (self.line, self.column) >= (line, column)
    }
}

/// The ordered result of one search over one source snapshot.
///
/// A match set is tagged with the query, options and source hash that
/// produced it. It is never patched after an edit; callers re-run [`find`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSet {
    query: String,
    options: SearchOptions,
    source_hash: u64,
    matches: Vec<Match>,
    pattern_error: Option<String>,
}

impl MatchSet {
    fn new(query: &str, options: SearchOptions, source_hash: u64, matches: Vec<Match>) -> Self {
        Self {
            query: query.to_string(),
            options,
            source_hash,
            matches,
            pattern_error: None,
        }
    }

    fn invalid(query: &str, options: SearchOptions, source_hash: u64, error: String) -> Self {
        Self {
            pattern_error: Some(error),
            ..Self::new(query, options, source_hash, Vec::new())
        }
    }

    /// The query that produced this set.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The options that produced this set.
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Hash of the source snapshot this set was computed against.
    pub fn source_hash(&self) -> u64 {
        self.source_hash
    }

    /// All matches in navigation order.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Iterate the matches in navigation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Match> {
        self.matches.iter()
    }

    /// Get a match by index.
    pub fn get(&self, index: usize) -> Option<&Match> {
        self.matches.get(index)
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Check if there are no matches.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The compile error when the query was an invalid regex.
    pub fn pattern_error(&self) -> Option<&str> {
        self.pattern_error.as_deref()
    }

    /// Returns true if the query failed to compile.
    pub fn has_pattern_error(&self) -> bool {
        self.pattern_error.is_some()
    }

    /// Returns true if this set was computed against exactly `source`.
    pub fn is_current_for(&self, source: &str) -> bool {
        self.source_hash == content_hash(source)
    }

    /// Index of the first match starting at or after `(line, column)`,
    /// wrapping to the first match when none follows.
    pub fn first_at_or_after(&self, line: usize, column: usize) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        Some(
            self.matches
                .iter()
                .position(|m| m.starts_at_or_after(line, column))
                .unwrap_or(0),
        )
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a Match;
    type IntoIter = std::slice::Iter<'a, Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

/// Find all matches of `query` in `source`.
///
/// Never fails: an invalid regex yields an empty set whose
/// [`MatchSet::pattern_error`] carries the compile error, and an empty query
/// yields an empty set without an error.
pub fn find(source: &str, query: &str, options: &SearchOptions) -> MatchSet {
    let source_hash = content_hash(source);
    if query.is_empty() {
        return MatchSet::new(query, *options, source_hash, Vec::new());
    }

    let regex = match build_regex(query, options) {
        Ok(regex) => regex,
        Err(err) => {
            tracing::debug!(query, error = %err, "search pattern rejected");
            return MatchSet::invalid(query, *options, source_hash, err.to_string());
        }
    };

    let mut matches = Vec::new();
    for line in source_lines(source) {
        collect_line_matches(&regex, line.number, line.text, options.regex, &mut matches);
    }

    tracing::trace!(query, count = matches.len(), "search complete");
    MatchSet::new(query, *options, source_hash, matches)
}

/// Count the number of matches in `source`; invalid patterns count as zero.
pub fn count_matches(source: &str, query: &str, options: &SearchOptions) -> usize {
    find(source, query, options).len()
}

/// Check that `query` compiles under `options` without searching anything.
pub fn validate_pattern(query: &str, options: &SearchOptions) -> Result<(), FindError> {
    if query.is_empty() {
        return Ok(());
    }
    build_regex(query, options).map(|_| ())
}

fn collect_line_matches(
    regex: &Regex,
    line_number: usize,
    line_text: &str,
    with_groups: bool,
    out: &mut Vec<Match>,
) {
    // Columns are tracked incrementally so each line is walked once.
    let mut column = 1;
    let mut scanned = 0;

    let mut push = |start: usize, end: usize, groups: Vec<Option<String>>| {
        if start == end {
            return;
        }
        column += line_text[scanned..start].chars().count();
        let matched = &line_text[start..end];
        let end_column = column + matched.chars().count();
        out.push(Match {
            line: line_number,
            column,
            end_column,
            matched_text: matched.to_string(),
            line_text: line_text.to_string(),
            groups,
        });
        column = end_column;
        scanned = end;
    };

    if with_groups {
        for caps in regex.captures_iter(line_text) {
            if let Some(m) = caps.get(0) {
                push(m.start(), m.end(), capture_groups(&caps));
            }
        }
    } else {
        for m in regex.find_iter(line_text) {
            push(m.start(), m.end(), Vec::new());
        }
    }
}

fn capture_groups(caps: &Captures<'_>) -> Vec<Option<String>> {
    caps.iter()
        .skip(1)
        .map(|group| group.map(|g| g.as_str().to_string()))
        .collect()
}

/// Build a regex from a query and options.
pub(crate) fn build_regex(query: &str, options: &SearchOptions) -> Result<Regex, FindError> {
    let pattern = if options.regex {
        query.to_string()
    } else {
        let escaped = regex::escape(query);
        if options.whole_word {
            format!(r"\b{}\b", escaped)
        } else {
            escaped
        }
    };

    RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .build()
        .map_err(|e| FindError::InvalidRegex(e.to_string()))
}

/// Errors that can occur during find operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FindError {
    /// Invalid regular expression pattern.
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),
}

impl From<FindError> for scenekit_core::ScenekitError {
    fn from(err: FindError) -> Self {
        match err {
            FindError::InvalidRegex(message) => Self::InvalidPattern(message),
        }
    }
}
