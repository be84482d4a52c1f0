//! Mix kernel for Reprise.
//!
//! Pure, synchronous stages that turn a set of independently recorded
//! fragments into one continuous buffer:
//!
//! - [`Compositor`]: places fragments on a shared timeline and sums overlaps
//! - [`trim_silence`] / [`CompositeBuffer::trim`]: strips leading and trailing silence
//! - [`normalize_peak`] / [`CompositeBuffer::normalize`]: rescales to a 1.0 peak
//!
//! Nothing here performs I/O. Decoding, resampling and encoding live in
//! `reprise-codec`; fetching and persisting live in the `reprise` crate.
//!
//! # Example
//!
//! ```
//! use reprise_core::{AudioFragment, Compositor, SilencePolicy, TrimMode};
//!
//! let fragments = vec![
//!     AudioFragment::new(vec![0.5, 0.5], 0.0, 44100),
//!     AudioFragment::new(vec![0.25; 4], 1.0 / 44100.0, 44100),
//! ];
//! let mut mix = Compositor::new(44100).compose(&fragments)?;
//! mix.trim(TrimMode::Symmetric);
//! mix.normalize(SilencePolicy::Reject)?;
//! assert_eq!(mix.peak(), 1.0);
//! # Ok::<(), reprise_core::Error>(())
//! ```

pub mod error;
pub use error::{Error, Result};

mod config;
pub use config::{MixConfig, SilencePolicy, TrimMode, CANONICAL_SAMPLE_RATE};

mod fragment;
pub use fragment::{AudioFragment, CompositeBuffer, MAX_TIMELINE_SAMPLES};

mod compositor;
pub use compositor::{sum_placements, Compositor, Placement};

mod trim;
pub use trim::{trim_range, trim_silence};

mod normalize;
pub use normalize::{normalize_peak, peak};
