//! Builder for MixEngine

use crate::engine::MixEngine;
use crate::error::{Error, Result};
use crate::fallback::FragmentPolicy;
use crate::settings::EngineSettings;
use crate::store::FetchSource;
use reprise_codec::{ResampleQuality, TranscoderConfig};
use reprise_core::{SilencePolicy, TrimMode, CANONICAL_SAMPLE_RATE};
use std::sync::Arc;

/// Builder for [`MixEngine`].
///
/// # Example
///
/// ```ignore
/// use reprise::prelude::*;
///
/// let engine = MixEngine::builder()
///     .settings(EngineSettings::from_env()?)
///     .source(FsStore::new("/var/lib/reprise"))
///     .trim_mode(TrimMode::Symmetric)
///     .build()?;
/// ```
#[derive(Default)]
pub struct MixEngineBuilder {
    settings: EngineSettings,
    source: Option<Arc<dyn FetchSource>>,
    policy: FragmentPolicy,
}

impl MixEngineBuilder {
    /// Replace all settings at once.
    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Mix rate every fragment is resampled to.
    ///
    /// Default: [`CANONICAL_SAMPLE_RATE`] (44100 Hz), which every deployed
    /// mix uses. Other rates depart from that fixed canonical rate and are
    /// meant for tests and offline tooling. The rate is part of
    /// [`MixVariant`](crate::MixVariant), so mixes rendered at different
    /// rates never share a storage key.
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.settings.mix.sample_rate = sample_rate;
        self
    }

    /// Default: [`TrimMode::Legacy`]
    pub fn trim_mode(mut self, mode: TrimMode) -> Self {
        self.settings.mix.trim = mode;
        self
    }

    /// Default: [`SilencePolicy::Reject`]
    pub fn silence_policy(mut self, policy: SilencePolicy) -> Self {
        self.settings.mix.silence = policy;
        self
    }

    pub fn resample_quality(mut self, quality: ResampleQuality) -> Self {
        self.settings.resample_quality = quality;
        self
    }

    /// Default: 8
    pub fn fetch_concurrency(mut self, workers: usize) -> Self {
        self.settings.fetch_concurrency = workers;
        self
    }

    pub fn transcoder(mut self, config: TranscoderConfig) -> Self {
        self.settings.transcoder = config;
        self
    }

    pub fn source(self, source: impl FetchSource + 'static) -> Self {
        self.shared_source(Arc::new(source))
    }

    pub fn shared_source(mut self, source: Arc<dyn FetchSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Default: [`FragmentPolicy::Strict`]
    pub fn fragment_policy(mut self, policy: FragmentPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> Result<MixEngine> {
        self.settings.validate()?;

        let source = self
            .source
            .ok_or_else(|| Error::InvalidConfig("a fetch source is required".into()))?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.settings.fetch_concurrency)
            .thread_name(|i| format!("reprise-fetch-{}", i))
            .build()
            .map_err(|e| Error::InvalidConfig(format!("fetch pool: {}", e)))?;

        tracing::debug!(
            sample_rate = self.settings.mix.sample_rate,
            trim = ?self.settings.mix.trim,
            silence = ?self.settings.mix.silence,
            fetch_concurrency = self.settings.fetch_concurrency,
            policy = ?self.policy,
            "built mix engine"
        );

        Ok(MixEngine::from_parts(self.settings, source, self.policy, pool))
    }
}
