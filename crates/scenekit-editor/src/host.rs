//! The host editor collaborator.
//!
//! The core never owns the document. A host hands it fresh snapshots through
//! [`HostEditor::text`] and receives edit batches through
//! [`HostEditor::apply_edits`]. [`MemoryBuffer`] is a rope-backed host used by
//! the command-line front-end and by tests.

use crate::find_replace::{EditError, EditOperation, resolve_edits};
use ropey::Rope;
use scenekit_core::{column_to_byte, source_lines};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A selection in the host buffer, in 1-based line / char-column coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    /// Exclusive.
    pub end_column: usize,
}

impl SelectionRange {
    /// Create a selection confined to one line.
    pub fn single_line(line: usize, start_column: usize, end_column: usize) -> Self {
        Self {
            start_line: line,
            start_column,
            end_line: line,
            end_column,
        }
    }

    pub fn is_single_line(&self) -> bool {
        self.start_line == self.end_line
    }

    pub fn is_empty(&self) -> bool {
        self.is_single_line() && self.start_column >= self.end_column
    }

    /// The selected text of `source`, if the selection is a non-empty span on one line.
    pub fn single_line_text<'a>(&self, source: &'a str) -> Option<&'a str> {
        if !self.is_single_line() || self.is_empty() {
            return None;
        }
        let line = source_lines(source).nth(self.start_line.checked_sub(1)?)?;
        let start = column_to_byte(line.text, self.start_column)?;
        let end = column_to_byte(line.text, self.end_column)?;
        Some(&line.text[start..end])
    }
}

/// Operations the core needs from the editor hosting the document.
pub trait HostEditor {
    /// Current full buffer content.
    fn text(&self) -> String;

    /// Apply a batch atomically, as one undoable unit.
    fn apply_edits(&mut self, operations: &[EditOperation]) -> Result<(), EditError>;

    /// The current selection, if any.
    fn selection(&self) -> Option<SelectionRange>;

    /// Scroll to and select a span on one line.
    fn reveal_and_select(&mut self, line: usize, start_column: usize, end_column: usize);
}

/// Undo snapshots a [`MemoryBuffer`] keeps unless told otherwise.
pub const DEFAULT_UNDO_LIMIT: usize = 100;

/// In-memory host buffer backed by a rope.
#[derive(Debug, Clone)]
pub struct MemoryBuffer {
    rope: Rope,
    selection: Option<SelectionRange>,
    undo_stack: VecDeque<Rope>,
    undo_limit: usize,
}

impl MemoryBuffer {
    /// Create a buffer holding `text`.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: None,
            undo_stack: VecDeque::new(),
            undo_limit: DEFAULT_UNDO_LIMIT,
        }
    }

    /// Keep at most `limit` undo snapshots, dropping the oldest first.
    pub fn with_undo_limit(mut self, limit: usize) -> Self {
        self.undo_limit = limit;
        self.undo_stack.truncate(limit);
        self
    }

    /// Set or clear the selection.
    pub fn set_selection(&mut self, selection: Option<SelectionRange>) {
        self.selection = selection;
    }

    /// Revert the most recent edit batch. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop_back() {
            Some(previous) => {
                self.rope = previous;
                self.selection = None;
                true
            }
            None => false,
        }
    }

    /// Number of batches that can be undone.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    fn push_undo(&mut self) {
        if self.undo_limit == 0 {
            return;
        }
        if self.undo_stack.len() == self.undo_limit {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(self.rope.clone());
    }
}

impl Default for MemoryBuffer {
    fn default() -> Self {
        Self::new("")
    }
}

impl HostEditor for MemoryBuffer {
    fn text(&self) -> String {
        self.rope.to_string()
    }

    fn apply_edits(&mut self, operations: &[EditOperation]) -> Result<(), EditError> {
        if operations.is_empty() {
            return Ok(());
        }

        let snapshot = self.rope.to_string();
        let edits = resolve_edits(&snapshot, operations)?;

        self.push_undo();
        for edit in edits.iter().rev() {
            let start = self.rope.byte_to_char(edit.span.start);
            let end = self.rope.byte_to_char(edit.span.end);
            self.rope.remove(start..end);
            self.rope.insert(start, &edit.operation.replacement_text);
        }
        self.selection = None;

        tracing::debug!(edits = operations.len(), "applied edit batch");
        Ok(())
    }

    fn selection(&self) -> Option<SelectionRange> {
        self.selection
    }

    fn reveal_and_select(&mut self, line: usize, start_column: usize, end_column: usize) {
        self.selection = Some(SelectionRange::single_line(line, start_column, end_column));
    }
}
