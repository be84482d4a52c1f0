//! Error types for reprise-codec

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Codec error type
#[derive(Error, Debug)]
pub enum CodecError {
    /// I/O error during scratch file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed or unsupported input container
    #[error("Decode error: {0}")]
    Decode(String),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Resampling error
    #[error("Resampling error: {0}")]
    Resample(String),

    /// Invalid audio data
    #[error("Invalid audio data: {0}")]
    InvalidData(String),

    /// The transcoder executable could not be started
    #[error("Failed to start transcoder {}: {source}", executable.display())]
    Spawn {
        executable: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The transcoder exited unsuccessfully
    #[error("Transcoder exited with {}\n{log}", describe_status(*status))]
    Transcode { status: Option<i32>, log: String },

    /// The transcoder exceeded its wall-clock budget and was killed
    #[error("Transcoder killed after {after:?}\n{log}")]
    TranscodeTimeout { after: Duration, log: String },
}

impl CodecError {
    /// Captured transcoder output, if this error came from the transcoder.
    pub fn process_log(&self) -> Option<&str> {
        match self {
            CodecError::Transcode { log, .. } | CodecError::TranscodeTimeout { log, .. } => {
                Some(log)
            }
            _ => None,
        }
    }
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

fn describe_status(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("code {}", code),
        None => "signal".to_string(),
    }
}

// External library errors are flattened to strings at the API boundary.

impl From<rubato::ResamplerConstructionError> for CodecError {
    fn from(e: rubato::ResamplerConstructionError) -> Self {
        CodecError::Resample(e.to_string())
    }
}

impl From<rubato::ResampleError> for CodecError {
    fn from(e: rubato::ResampleError) -> Self {
        CodecError::Resample(e.to_string())
    }
}
