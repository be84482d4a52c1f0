//! Error types for reprise-synth.

use thiserror::Error;

/// Result type alias for reprise-synth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in reprise-synth.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration parameter.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A note with a negative or non-finite time or duration.
    #[error("Invalid note {index}: {reason}")]
    InvalidNote { index: usize, reason: String },

    /// Segment document is not valid JSON or has an unknown shape.
    #[error("Segment parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
