//! Scenekit Analyzer - Static analysis of story scripts
//!
//! This crate provides functionality for:
//! - Extracting scene definitions and choice targets
//! - Tracking variable assignments and interpolation sites
//! - Structure metrics (nesting depth, scene length, comment ratio)
//! - Prioritized suggestions and warnings, cached per snapshot

pub mod cache;
pub mod references;
pub mod structure;
pub mod suggestions;
pub mod syntax;
pub mod variables;

pub use cache::{AnalysisEngine, CacheStats};
pub use references::{ReferenceGraph, SceneDefinition, SceneReference};
pub use structure::{Metrics, SceneSpan, StructureScan, scene_spans};
pub use suggestions::*;
pub use variables::{VariableSite, VariableTable};
