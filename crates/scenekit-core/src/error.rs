//! Error types for Scenekit

use thiserror::Error;

/// Umbrella error type for Scenekit front-ends.
///
/// Library crates keep their own narrow error enums; this type exists so a
/// host can funnel all of them through one `Result`.
#[derive(Error, Debug)]
pub enum ScenekitError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Stale matches: computed against source {expected:#x}, buffer is now {actual:#x}")]
    StaleMatches { expected: u64, actual: u64 },

    #[error("Edit error: {0}")]
    Edit(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Scenekit operations
pub type Result<T> = std::result::Result<T, ScenekitError>;
