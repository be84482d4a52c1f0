//! MixEngine: fetch, decode, composite, trim, normalize and encode

use crate::builder::MixEngineBuilder;
use crate::error::{Error, Result};
use crate::fallback::FragmentPolicy;
use crate::fragment::FragmentSpec;
use crate::mix_id::{mix_id, mix_key, MixVariant};
use crate::options::MixOptions;
use crate::settings::EngineSettings;
use crate::store::{FetchSource, PersistSink};
use rayon::prelude::*;
use reprise_codec::{
    decode_wav, encode_wav_mono_memory, resample, CodecError, OutputFormat, Transcoder, WavConfig,
};
use reprise_core::{AudioFragment, CompositeBuffer, Compositor};
use std::sync::Arc;
use std::time::Instant;

/// An encoded mix.
#[derive(Debug, Clone, PartialEq)]
pub struct MixResult {
    pub encoded_bytes: Vec<u8>,
    /// Final sample count over the mix rate
    pub duration_seconds: f64,
    /// At least one fragment was replaced by fallback audio
    pub is_partial: bool,
    pub format: OutputFormat,
}

/// Result of [`MixEngine::mix_and_store`].
#[derive(Debug, Clone, PartialEq)]
pub enum MixOutcome {
    /// The mix was rendered and persisted under `key`
    Created {
        id: String,
        key: String,
        result: MixResult,
    },
    /// A mix with this id was already stored; nothing was rendered
    Existing { id: String, key: String },
}

impl MixOutcome {
    pub fn id(&self) -> &str {
        match self {
            MixOutcome::Created { id, .. } | MixOutcome::Existing { id, .. } => id,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            MixOutcome::Created { key, .. } | MixOutcome::Existing { key, .. } => key,
        }
    }

    pub fn result(&self) -> Option<&MixResult> {
        match self {
            MixOutcome::Created { result, .. } => Some(result),
            MixOutcome::Existing { .. } => None,
        }
    }

    pub fn is_existing(&self) -> bool {
        matches!(self, MixOutcome::Existing { .. })
    }
}

struct Fetched {
    bytes: Vec<u8>,
    filled: bool,
}

/// Mixing engine.
///
/// Fetches and decodes fragments concurrently on a bounded pool, then runs the
/// compositor, trimmer, normalizer and encoder once over the full set. Each
/// call owns its buffers, so one engine can serve concurrent requests.
///
/// # Example
///
/// ```
/// use reprise::prelude::*;
/// use std::sync::Arc;
///
/// let store = Arc::new(MemoryStore::new());
/// let wav = reprise::codec::encode_wav_mono_memory(
///     &[0.0, 0.5, 0.25, -0.5],
///     &reprise::codec::WavConfig::mono(44100, BitDepth::Float32),
/// )?;
/// store.insert("recordings/a.wav", wav);
///
/// let engine = MixEngine::builder().shared_source(store).build()?;
/// let result = engine.mix(
///     &[FragmentSpec::new("recordings/a.wav", 0.0, 44100)],
///     &MixOptions::simple(),
/// )?;
/// assert!(!result.is_partial);
/// # Ok::<(), reprise::Error>(())
/// ```
pub struct MixEngine {
    settings: EngineSettings,
    source: Arc<dyn FetchSource>,
    policy: FragmentPolicy,
    transcoder: Transcoder,
    pool: rayon::ThreadPool,
}

impl MixEngine {
    pub fn builder() -> MixEngineBuilder {
        MixEngineBuilder::default()
    }

    pub(crate) fn from_parts(
        settings: EngineSettings,
        source: Arc<dyn FetchSource>,
        policy: FragmentPolicy,
        pool: rayon::ThreadPool,
    ) -> Self {
        let transcoder = Transcoder::new(settings.transcoder.clone());
        Self {
            settings,
            source,
            policy,
            transcoder,
            pool,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn fragment_policy(&self) -> &FragmentPolicy {
        &self.policy
    }

    pub fn sample_rate(&self) -> u32 {
        self.settings.mix.sample_rate
    }

    /// Render settings this engine applies to a request with `options`.
    pub fn mix_variant(&self, options: &MixOptions) -> MixVariant {
        MixVariant::new(&self.settings.mix, options)
    }

    /// Mix `fragments` into one encoded buffer.
    ///
    /// Any fetch or decode failure aborts the whole mix unless the engine was
    /// built with [`FragmentPolicy::FillMissing`], in which case fragments the
    /// store reports as missing are replaced by fallback audio.
    pub fn mix(&self, fragments: &[FragmentSpec], options: &MixOptions) -> Result<MixResult> {
        let started = Instant::now();

        // Offsets are checked before anything is fetched.
        let rate = self.sample_rate();
        for spec in fragments {
            AudioFragment::new(Vec::new(), spec.offset_seconds, rate).start_index(rate)?;
        }

        let fetched = self.fetch_all(fragments)?;
        let is_partial = fetched.iter().any(|f| f.filled);
        tracing::debug!(
            fragments = fragments.len(),
            is_partial,
            elapsed = ?started.elapsed(),
            "fetched fragments"
        );

        let decoded = self.decode_all(fragments, fetched)?;
        let buffer = self.render(&decoded, options)?;
        drop(decoded);

        let encoded_bytes = self.encode(buffer.as_slice(), options)?;
        let duration_seconds = buffer.duration_seconds();

        tracing::info!(
            fragments = fragments.len(),
            samples = buffer.len(),
            duration_seconds,
            bytes = encoded_bytes.len(),
            format = ?options.format,
            is_partial,
            elapsed = ?started.elapsed(),
            "mix complete"
        );

        Ok(MixResult {
            encoded_bytes,
            duration_seconds,
            is_partial,
            format: options.format,
        })
    }

    /// Mix and persist under the content-addressed key, unless that key
    /// already exists in `sink`.
    ///
    /// The key covers the fragments and [`mix_variant`](Self::mix_variant),
    /// so the same recordings rendered with different options never share it.
    pub fn mix_and_store(
        &self,
        fragments: &[FragmentSpec],
        options: &MixOptions,
        sink: &dyn PersistSink,
    ) -> Result<MixOutcome> {
        let id = mix_id(fragments, &self.mix_variant(options))?;
        let key = mix_key(&id, options.format);

        if sink.contains(&key)? {
            tracing::info!(%id, %key, "mix already exists");
            return Ok(MixOutcome::Existing { id, key });
        }

        let result = self.mix(fragments, options)?;
        sink.persist(&key, &result.encoded_bytes)?;
        tracing::debug!(%id, %key, "stored mix");

        Ok(MixOutcome::Created { id, key, result })
    }

    /// Compose, trim and optionally normalize already-decoded fragments.
    pub fn render(
        &self,
        fragments: &[AudioFragment],
        options: &MixOptions,
    ) -> Result<CompositeBuffer> {
        let mut buffer = Compositor::new(self.sample_rate()).compose(fragments)?;

        let removed = buffer.trim(self.settings.mix.trim);
        tracing::debug!(
            removed,
            remaining = buffer.len(),
            mode = ?self.settings.mix.trim,
            "trimmed"
        );

        if options.normalize {
            let peak = buffer.normalize(self.settings.mix.silence)?;
            tracing::debug!(peak, "normalized");
        }
        Ok(buffer)
    }

    /// Serialize mono samples at the mix rate, transcoding to MP3 if requested.
    pub fn encode(&self, samples: &[f32], options: &MixOptions) -> Result<Vec<u8>> {
        let wav = encode_wav_mono_memory(
            samples,
            &WavConfig::mono(self.sample_rate(), options.bit_depth),
        )?;
        match options.format {
            OutputFormat::Wav => Ok(wav),
            OutputFormat::Mp3 => Ok(self.transcoder.transcode(&wav)?),
        }
    }

    fn fetch_all(&self, fragments: &[FragmentSpec]) -> Result<Vec<Fetched>> {
        self.pool.install(|| {
            fragments
                .par_iter()
                .enumerate()
                .map(|(index, spec)| self.fetch_one(index, spec))
                .collect()
        })
    }

    fn fetch_one(&self, index: usize, spec: &FragmentSpec) -> Result<Fetched> {
        match self.source.fetch(&spec.object_ref) {
            Ok(bytes) => Ok(Fetched {
                bytes,
                filled: false,
            }),
            Err(source) => match &self.policy {
                FragmentPolicy::FillMissing(fallback) if source.is_not_found() => {
                    tracing::warn!(
                        index,
                        object_ref = %spec.object_ref,
                        "fragment missing, filling with fallback audio"
                    );
                    let bytes = fallback.fill(index, spec, self.sample_rate())?;
                    Ok(Fetched {
                        bytes,
                        filled: true,
                    })
                }
                _ => Err(Error::Fetch {
                    index,
                    object_ref: spec.object_ref.clone(),
                    source,
                }),
            },
        }
    }

    fn decode_all(
        &self,
        fragments: &[FragmentSpec],
        fetched: Vec<Fetched>,
    ) -> Result<Vec<AudioFragment>> {
        self.pool.install(|| {
            fetched
                .into_par_iter()
                .zip(fragments.par_iter())
                .enumerate()
                .map(|(index, (fetched, spec))| self.decode_one(index, spec, fetched))
                .collect()
        })
    }

    fn decode_one(
        &self,
        index: usize,
        spec: &FragmentSpec,
        fetched: Fetched,
    ) -> Result<AudioFragment> {
        let fragment_err = |source: CodecError| Error::Fragment {
            index,
            object_ref: spec.object_ref.clone(),
            source,
        };

        let decoded = decode_wav(&fetched.bytes).map_err(fragment_err)?;
        drop(fetched.bytes);

        let source_rate = decoded.sample_rate;
        if !fetched.filled && source_rate != spec.native_sample_rate {
            tracing::warn!(
                index,
                declared = spec.native_sample_rate,
                header = source_rate,
                "declared sample rate differs from WAV header, using header"
            );
        }
        if decoded.channels.len() > 1 {
            tracing::debug!(index, channels = decoded.channels.len(), "keeping first channel");
        }

        let samples = resample(
            decoded.into_first_channel(),
            source_rate,
            self.sample_rate(),
            self.settings.resample_quality,
        )
        .map_err(fragment_err)?;

        Ok(AudioFragment::new(
            samples,
            spec.offset_seconds,
            self.sample_rate(),
        ))
    }
}

impl std::fmt::Debug for MixEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixEngine")
            .field("settings", &self.settings)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
