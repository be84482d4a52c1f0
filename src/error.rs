//! Centralized error type for the reprise umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use crate::store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] reprise_core::Error),

    #[error("Codec: {0}")]
    Codec(#[from] reprise_codec::CodecError),

    #[error("Synth: {0}")]
    Synth(#[from] reprise_synth::Error),

    #[error("Store: {0}")]
    Store(#[from] StoreError),

    /// Fetching a fragment's bytes failed; the whole mix is aborted.
    #[error("Fetch failed for fragment {index} ({object_ref}): {source}")]
    Fetch {
        index: usize,
        object_ref: String,
        #[source]
        source: StoreError,
    },

    /// A fragment's bytes could not be decoded or resampled.
    #[error("Fragment {index} ({object_ref}): {source}")]
    Fragment {
        index: usize,
        object_ref: String,
        #[source]
        source: reprise_codec::CodecError,
    },

    /// Partial-fill was requested but no placeholder exists for a fragment.
    #[error("No fallback audio for fragment {index} ({object_ref}): {reason}")]
    NoFallback {
        index: usize,
        object_ref: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Index of the fragment that caused this error, if any.
    pub fn fragment_index(&self) -> Option<usize> {
        match self {
            Error::Fetch { index, .. }
            | Error::Fragment { index, .. }
            | Error::NoFallback { index, .. } => Some(*index),
            _ => None,
        }
    }
}
