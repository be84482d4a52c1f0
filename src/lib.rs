//! # Reprise - Audio Segment Mixing Engine
//!
//! Combines independently recorded fragments of a piece into one continuous mix.
//!
//! ## Architecture
//!
//! Reprise is an umbrella crate that coordinates:
//! - **reprise-core** - Fragment model, timeline compositor, trim and normalize
//! - **reprise-codec** - WAV decode/encode, resampling, MP3 transcoding
//! - **reprise-synth** - Placeholder segment audio from symbolic notes
//!
//! and adds the I/O edges: fetch/persist collaborators, concurrent fetch,
//! partial-fill fallback, content-addressed mix ids and recording ingest.
//!
//! ## Pipeline
//!
//! ```text
//! fetch (parallel) -> decode + resample (parallel) -> composite -> trim
//!   -> normalize? -> encode -> transcode?
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use reprise::prelude::*;
//!
//! let engine = MixEngine::builder()
//!     .settings(EngineSettings::from_env()?)
//!     .source(FsStore::new("./store"))
//!     .build()?;
//!
//! let outcome = engine.mix_and_store(&fragments, &MixOptions::full(), &FsStore::new("./store"))?;
//! println!("{}", outcome.key());
//! ```

/// Re-export of reprise-core for direct access
pub use reprise_core as core;

/// Re-export of reprise-codec for direct access
pub use reprise_codec as codec;

/// Re-export of reprise-synth for direct access
pub use reprise_synth as synth;

mod builder;
mod engine;
mod error;
mod fallback;
mod fragment;
mod ingest;
mod mix_id;
mod options;
mod selection;
mod settings;
pub mod store;

pub use builder::MixEngineBuilder;
pub use engine::{MixEngine, MixOutcome, MixResult};
pub use error::{Error, Result};
pub use fallback::{render_segment_wav, FallbackSource, FragmentPolicy, SynthFallback};
pub use fragment::FragmentSpec;
pub use ingest::{ingest_and_store, ingest_recording, recording_key, IngestedRecording};
pub use mix_id::{mix_id, mix_key, MixVariant};
pub use options::MixOptions;
pub use selection::{pick_one_per_group, select_recordings};
pub use settings::{
    EngineSettings, DEFAULT_FETCH_CONCURRENCY, FETCH_CONCURRENCY_ENV, TRANSCODE_TIMEOUT_ENV,
    TRIM_MODE_ENV,
};
pub use store::{FetchSource, FsStore, MemoryStore, PersistSink, StoreError};

// Core types
pub use reprise_core::{
    AudioFragment, CompositeBuffer, Compositor, MixConfig, SilencePolicy, TrimMode,
    CANONICAL_SAMPLE_RATE,
};

// Codec types
pub use reprise_codec::{BitDepth, OutputFormat, ResampleQuality, TranscoderConfig};

// Synth types
pub use reprise_synth::{parse_segment_notes, NoteOverlap, SegmentNote};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BitDepth, EngineSettings, FetchSource, FragmentPolicy, FragmentSpec, FsStore,
        MemoryStore, MixEngine, MixOptions, MixOutcome, MixResult, NoteOverlap, OutputFormat,
        PersistSink, SegmentNote, SilencePolicy, SynthFallback, TrimMode,
    };
    pub use crate::{Error, Result};
}
