//! Per-request mix options.

use reprise_codec::{BitDepth, OutputFormat};
use serde::{Deserialize, Serialize};

/// What happens to the composed buffer before it is returned.
///
/// Trimming always runs, using the engine's [`TrimMode`](reprise_core::TrimMode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixOptions {
    /// Rescale to a 1.0 peak after trimming
    pub normalize: bool,
    pub format: OutputFormat,
    /// Sample format of the WAV container (also the transcoder's input)
    pub bit_depth: BitDepth,
}

impl MixOptions {
    /// Trim and deliver float WAV.
    pub fn simple() -> Self {
        Self {
            normalize: false,
            format: OutputFormat::Wav,
            bit_depth: BitDepth::Float32,
        }
    }

    /// Trim, normalize and deliver MP3.
    pub fn full() -> Self {
        Self {
            normalize: true,
            format: OutputFormat::Mp3,
            bit_depth: BitDepth::Int16,
        }
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_bit_depth(mut self, bit_depth: BitDepth) -> Self {
        self.bit_depth = bit_depth;
        self
    }
}

impl Default for MixOptions {
    fn default() -> Self {
        Self::simple()
    }
}
