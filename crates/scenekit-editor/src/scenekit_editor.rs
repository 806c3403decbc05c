//! Scenekit Editor - search and bulk-edit features for story scripts
//!
//! This crate provides the editor-facing half of Scenekit:
//! - Line-scoped find with literal/regex, case and whole-word options
//! - Position-stable replace-one / replace-all edit planning
//! - A debounced search session with match navigation and history
//! - The [`HostEditor`] collaborator trait and an in-memory host buffer

pub mod find_replace;
pub mod history;
pub mod host;
pub mod session;

pub use find_replace::{
    EditError, EditOperation, FindError, Match, MatchSet, ReplaceOutcome, ResolvedEdit,
    SearchOptions, apply_edits, count_matches, find, plan_replace_all, plan_replace_one,
    replace_all_in, resolve_edits, validate_pattern,
};
pub use history::{DEFAULT_HISTORY_LIMIT, History, ReplaceRecord, ReplaceScope};
pub use host::{DEFAULT_UNDO_LIMIT, HostEditor, MemoryBuffer, SelectionRange};
pub use session::{
    DEFAULT_DEBOUNCE_MS, Direction, QueryTicket, SearchSession, SessionConfig, SessionState,
};
