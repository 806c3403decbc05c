//! Find and replace functionality for story scripts.
//!
//! This module provides:
//! - [`find`] - Line-scoped text search with regex support
//! - [`replace`] - Position-stable batch edit planning and application

pub mod find;
pub mod replace;

pub use find::{FindError, Match, MatchSet, SearchOptions, count_matches, find, validate_pattern};
pub use replace::{
    EditError, EditOperation, ReplaceOutcome, ResolvedEdit, apply_edits, plan_replace_all,
    plan_replace_one, replace_all_in, resolve_edits,
};
