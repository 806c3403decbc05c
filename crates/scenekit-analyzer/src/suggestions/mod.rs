//! Script Analysis Suggestions Module
//!
//! This module turns the extracted reference graph, variable table and
//! structure scan into prioritized suggestions and warnings. It flags choices
//! that lead nowhere, variables that are set but never shown, and scenes that
//! have grown too long or too deeply nested.

mod analyzer;

pub use analyzer::*;
