//! Source snapshot helpers.
//!
//! The host buffer hands the core an immutable `&str` snapshot for every
//! request. Nothing here keeps a copy; these helpers only describe a snapshot.

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Cheap, non-cryptographic hash of a source snapshot.
///
/// Two snapshots with the same hash are treated as identical by the match-set
/// staleness check and by the analysis cache.
pub fn content_hash(text: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(text.as_bytes());
    // Length is mixed in separately so a prefix never collides with the whole.
    hasher.write_usize(text.len());
    hasher.finish()
}

/// One line of a source snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based line number.
    pub number: usize,
    /// Byte offset of the first byte of the line within the snapshot.
    pub offset: usize,
    /// Line text without the terminating `\n` (and without a trailing `\r`).
    pub text: &'a str,
}

impl<'a> SourceLine<'a> {
    /// Length of the line in chars.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns true if the line is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Iterate the lines of `text`, numbered from 1.
///
/// A trailing newline does not produce an extra empty line, matching
/// [`str::lines`].
pub fn source_lines(text: &str) -> impl Iterator<Item = SourceLine<'_>> {
    let mut offset = 0;
    text.split_inclusive('\n')
        .enumerate()
        .map(move |(index, raw)| {
            let line_offset = offset;
            offset += raw.len();
            let text = raw.strip_suffix('\n').unwrap_or(raw);
            let text = text.strip_suffix('\r').unwrap_or(text);
            SourceLine {
                number: index + 1,
                offset: line_offset,
                text,
            }
        })
}

/// Byte offset of a 1-based char column within `line`.
///
/// Column `len + 1` (one past the last char) is valid and maps to
/// `line.len()`. Returns `None` for column 0 or columns further out.
pub fn column_to_byte(line: &str, column: usize) -> Option<usize> {
    if column == 0 {
        return None;
    }
    let target = column - 1;
    let mut count = 0;
    for (byte, _) in line.char_indices() {
        if count == target {
            return Some(byte);
        }
        count += 1;
    }
    (count == target).then_some(line.len())
}
