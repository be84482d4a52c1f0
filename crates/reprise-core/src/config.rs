//! Mix configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Rate every fragment is brought to before composition.
pub const CANONICAL_SAMPLE_RATE: u32 = 44100;

/// How leading and trailing silence is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimMode {
    /// Bit-for-bit parity with the legacy mixer.
    ///
    /// A leading sound at index 0 counts as "not found" (no trimming at all),
    /// only strictly positive samples mark the tail, and the tail sample
    /// itself is excluded (`buffer[first..last]`).
    #[default]
    Legacy,
    /// Keep `buffer[first_nonzero..=last_nonzero]`.
    Symmetric,
    /// Leave the composite untouched.
    Off,
}

/// What the normalizer does with an all-zero buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SilencePolicy {
    /// Fail with [`Error::SilentMix`].
    #[default]
    Reject,
    /// Return the buffer unchanged.
    PassThrough,
}

/// Configuration shared by every mix an engine performs.
#[derive(Debug, Clone, PartialEq)]
pub struct MixConfig {
    pub sample_rate: u32,
    pub trim: TrimMode,
    pub silence: SilencePolicy,
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            sample_rate: CANONICAL_SAMPLE_RATE,
            trim: TrimMode::Legacy,
            silence: SilencePolicy::Reject,
        }
    }
}

impl MixConfig {
    pub fn validate(&self) -> Result<()> {
        if !(8000..=384000).contains(&self.sample_rate) {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (8000-384000 Hz)",
                self.sample_rate
            )));
        }
        Ok(())
    }

    /// Number of whole samples in `seconds` at the mix rate.
    pub fn seconds_to_samples(&self, seconds: f64) -> usize {
        (seconds * self.sample_rate as f64).round().max(0.0) as usize
    }
}
