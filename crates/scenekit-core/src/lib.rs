//! Scenekit Core - Shared primitives for the story-script tooling crates
//!
//! This crate provides the small set of types every other Scenekit crate
//! depends on:
//!
//! - [`content_hash`] - Cheap hash of a source snapshot, used to tag match sets
//!   and key the analysis cache
//! - [`SourceLine`] / [`source_lines`] - 1-based line iteration over a snapshot
//! - [`ScenekitError`] - Umbrella error type for front-ends

mod error;
mod source;

pub use error::*;
pub use source::*;
