//! Error types for reprise-core.

use thiserror::Error;

/// Error type for reprise-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A fragment reached the compositor at a rate other than the mix rate.
    #[error("Sample rate mismatch: expected {expected} Hz, found {found} Hz")]
    RateMismatch { expected: u32, found: u32 },

    #[error("Invalid fragment offset: {0} seconds (must be finite and non-negative)")]
    InvalidOffset(f64),

    /// A placement would end past the longest buffer that can be allocated.
    #[error("Timeline overflow: {len} samples at index {start_index} exceed the maximum length")]
    TimelineOverflow { start_index: usize, len: usize },

    #[error("Cannot normalize a silent mix")]
    SilentMix,

    #[error("Cannot normalize a buffer whose peak is {0}")]
    NonFinitePeak(f32),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
