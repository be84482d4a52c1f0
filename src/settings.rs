//! Engine settings, built once at the process entry point.

use crate::error::{Error, Result};
use reprise_codec::{ResampleQuality, TranscoderConfig, TRANSCODER_PATH_ENV};
use reprise_core::{MixConfig, TrimMode};
use std::path::PathBuf;
use std::time::Duration;

pub const FETCH_CONCURRENCY_ENV: &str = "REPRISE_FETCH_CONCURRENCY";
pub const TRANSCODE_TIMEOUT_ENV: &str = "REPRISE_TRANSCODE_TIMEOUT_SECS";
pub const TRIM_MODE_ENV: &str = "REPRISE_TRIM_MODE";

/// Default number of fragments fetched at once.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 8;

/// Everything a [`MixEngine`](crate::MixEngine) needs besides its collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub mix: MixConfig,
    pub transcoder: TranscoderConfig,
    pub resample_quality: ResampleQuality,
    /// Upper bound on concurrent fetches and decodes
    pub fetch_concurrency: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            mix: MixConfig::default(),
            transcoder: TranscoderConfig::default(),
            resample_quality: ResampleQuality::default(),
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }
}

impl EngineSettings {
    /// Defaults overridden by `LAME_PATH`, `REPRISE_FETCH_CONCURRENCY`,
    /// `REPRISE_TRANSCODE_TIMEOUT_SECS` and `REPRISE_TRIM_MODE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(path) = lookup(TRANSCODER_PATH_ENV).filter(|p| !p.is_empty()) {
            settings.transcoder.executable = PathBuf::from(path);
        }

        if let Some(raw) = lookup(FETCH_CONCURRENCY_ENV) {
            settings.fetch_concurrency = raw.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!("{}={:?} is not a count", FETCH_CONCURRENCY_ENV, raw))
            })?;
        }

        if let Some(raw) = lookup(TRANSCODE_TIMEOUT_ENV) {
            let secs: f64 = raw.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!("{}={:?} is not a number", TRANSCODE_TIMEOUT_ENV, raw))
            })?;
            settings.transcoder.timeout = Duration::try_from_secs_f64(secs).map_err(|_| {
                Error::InvalidConfig(format!("{}={:?} out of range", TRANSCODE_TIMEOUT_ENV, raw))
            })?;
        }

        if let Some(raw) = lookup(TRIM_MODE_ENV) {
            settings.mix.trim = match raw.trim() {
                "legacy" => TrimMode::Legacy,
                "symmetric" => TrimMode::Symmetric,
                "off" => TrimMode::Off,
                other => {
                    return Err(Error::InvalidConfig(format!(
                        "{}={:?}, expected legacy, symmetric or off",
                        TRIM_MODE_ENV, other
                    )))
                }
            };
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.mix.validate()?;
        if self.fetch_concurrency == 0 {
            return Err(Error::InvalidConfig(
                "fetch_concurrency must be at least 1".into(),
            ));
        }
        if self.transcoder.timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "transcoder timeout must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
