//! Replace functionality: position-stable batch edit planning.
//!
//! Provides:
//! - Planning a single replacement or a replace-all batch from a [`MatchSet`]
//! - Regex replacement with capture groups (`$1`, `$&`, `$$`)
//! - Atomic application of a batch against the snapshot it was planned for
//!
//! A replace-all batch is ordered from the end of the document to the start,
//! so applying it in sequence never shifts the coordinates of an edit that has
//! not been applied yet. Same-line edits come rightmost column first.

use super::find::{FindError, Match, MatchSet, SearchOptions, find};
use scenekit_core::{SourceLine, column_to_byte, source_lines};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One replacement of a span on a single line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditOperation {
    /// 1-based line number.
    pub line: usize,
    /// 1-based char column where the replaced span starts.
    pub start_column: usize,
    /// 1-based char column one past the replaced span.
    pub end_column: usize,
    /// Text inserted in place of the span.
    pub replacement_text: String,
}

impl EditOperation {
    /// Create a new edit operation.
    pub fn new(
        line: usize,
        start_column: usize,
        end_column: usize,
        replacement_text: impl Into<String>,
    ) -> Self {
        Self {
            line,
            start_column,
            end_column,
            replacement_text: replacement_text.into(),
        }
    }

    /// Change in line length (in chars) this edit causes, for single-line replacements.
    pub fn length_delta(&self) -> isize {
        self.replacement_text.chars().count() as isize
            - (self.end_column - self.start_column) as isize
    }
}

/// Result of a one-shot replace-all over a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// The new text after replacement.
    pub text: String,
    /// Number of replacements made.
    pub count: usize,
    /// Any match set computed before the edit no longer describes `text`.
    pub requires_requery: bool,
}

/// Plan the replacement of the match at `index`.
///
/// Returns `None` when the index is out of range; that is a no-op, not an error.
pub fn plan_replace_one(
    match_set: &MatchSet,
    index: usize,
    replacement: &str,
) -> Option<EditOperation> {
    let m = match_set.get(index)?;
    Some(operation_for(match_set, m, replacement))
}

/// Plan the replacement of every match in the set.
///
/// Operations are sorted by line descending, then column descending. Every
/// match yields exactly one operation, regardless of how the replacement's
/// length compares to the matched text.
pub fn plan_replace_all(match_set: &MatchSet, replacement: &str) -> Vec<EditOperation> {
    let mut operations: Vec<_> = match_set
        .iter()
        .map(|m| operation_for(match_set, m, replacement))
        .collect();
    operations.sort_by(|a, b| {
        b.line
            .cmp(&a.line)
            .then_with(|| b.start_column.cmp(&a.start_column))
    });
    operations
}

/// An operation resolved to a byte span of the snapshot it was checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEdit<'a> {
    pub span: Range<usize>,
    pub operation: &'a EditOperation,
}

/// Resolve and validate a batch against `source`.
///
/// The result is sorted by span start. No two operations may start at the
/// same position (two insertions at one point included) and no span may
/// reach into the next one, so acceptance and outcome never depend on the
/// order of `operations`. Spans that only touch are allowed.
pub fn resolve_edits<'a>(
    source: &str,
    operations: &'a [EditOperation],
) -> Result<Vec<ResolvedEdit<'a>>, EditError> {
    let lines: Vec<SourceLine<'_>> = source_lines(source).collect();

    let mut edits = operations
        .iter()
        .map(|operation| {
            Ok(ResolvedEdit {
                span: resolve_span(&lines, operation)?,
                operation,
            })
        })
        .collect::<Result<Vec<_>, EditError>>()?;
    edits.sort_by_key(|edit| (edit.span.start, edit.span.end));

    for pair in edits.windows(2) {
        let (earlier, later) = (&pair[0], &pair[1]);
        if earlier.span.start == later.span.start || earlier.span.end > later.span.start {
            return Err(EditError::Overlapping {
                line: later.operation.line,
                column: later.operation.start_column,
            });
        }
    }
    Ok(edits)
}

/// Apply a batch of operations to `source` as one atomic change.
///
/// See [`resolve_edits`] for the rules a batch must satisfy; a batch that
/// breaks any of them is rejected as a whole.
pub fn apply_edits(source: &str, operations: &[EditOperation]) -> Result<String, EditError> {
    let edits = resolve_edits(source, operations)?;

    let mut text = source.to_string();
    for edit in edits.iter().rev() {
        text.replace_range(edit.span.clone(), &edit.operation.replacement_text);
    }
    Ok(text)
}

/// Replace every match of `query` in `source` in one step.
pub fn replace_all_in(
    source: &str,
    query: &str,
    options: &SearchOptions,
    replacement: &str,
) -> Result<ReplaceOutcome, EditError> {
    let match_set = find(source, query, options);
    if let Some(error) = match_set.pattern_error() {
        return Err(FindError::InvalidRegex(error.to_string()).into());
    }

    let operations = plan_replace_all(&match_set, replacement);
    let text = apply_edits(source, &operations)?;
    tracing::debug!(query, count = operations.len(), "replaced all matches");

    Ok(ReplaceOutcome {
        text,
        count: operations.len(),
        requires_requery: true,
    })
}

fn operation_for(match_set: &MatchSet, m: &Match, replacement: &str) -> EditOperation {
    let text = if match_set.options().regex {
        expand_replacement(replacement, m)
    } else {
        replacement.to_string()
    };
    EditOperation::new(m.line, m.column, m.end_column, text)
}

fn resolve_span(lines: &[SourceLine<'_>], op: &EditOperation) -> Result<Range<usize>, EditError> {
    let out_of_range = || EditError::OutOfRange {
        line: op.line,
        start_column: op.start_column,
        end_column: op.end_column,
    };

    if op.line == 0 || op.start_column > op.end_column {
        return Err(out_of_range());
    }
    let line = lines.get(op.line - 1).ok_or_else(out_of_range)?;
    let start = column_to_byte(line.text, op.start_column).ok_or_else(out_of_range)?;
    let end = column_to_byte(line.text, op.end_column).ok_or_else(out_of_range)?;
    Ok(line.offset + start..line.offset + end)
}

/// Expand replacement string with capture group references.
fn expand_replacement(replacement: &str, m: &Match) -> String {
    let mut result = String::with_capacity(replacement.len() * 2);
    let mut chars = replacement.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('$') => {
                result.push('$');
                chars.next();
            }
            Some('&') => {
                result.push_str(&m.matched_text);
                chars.next();
            }
            Some(d) if d.is_ascii_digit() => {
                let mut num_str = String::new();
                while let Some(&d) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    num_str.push(d);
                    chars.next();
                }
                match num_str.parse::<usize>() {
                    Ok(0) => result.push_str(&m.matched_text),
                    Ok(num) => {
                        if let Some(Some(group)) = m.groups.get(num - 1) {
                            result.push_str(group);
                        }
                    }
                    Err(_) => {}
                }
            }
            _ => result.push(c),
        }
    }

    result
}

/// Errors that can occur while planning or applying edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// The match set was computed against a different snapshot than the buffer holds.
    #[error("Matches are stale: computed against source {expected:#x}, buffer is {actual:#x}")]
    StaleMatches { expected: u64, actual: u64 },

    /// An operation points outside the snapshot.
    #[error("Edit out of range at line {line}, columns {start_column}..{end_column}")]
    OutOfRange {
        line: usize,
        start_column: usize,
        end_column: usize,
    },

    /// Two operations in one batch touch the same span.
    #[error("Overlapping edits at line {line}, column {column}")]
    Overlapping { line: usize, column: usize },

    /// The search query could not be compiled.
    #[error(transparent)]
    Find(#[from] FindError),
}

impl From<EditError> for scenekit_core::ScenekitError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::StaleMatches { expected, actual } => Self::StaleMatches { expected, actual },
            EditError::Find(find) => find.into(),
            other => Self::Edit(other.to_string()),
        }
    }
}
