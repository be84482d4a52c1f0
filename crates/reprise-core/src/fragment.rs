//! Fragment and composite buffer types.
//!
//! A fragment is one decoded, resampled recording waiting to be placed on the
//! mix timeline. The composite buffer is the additive accumulator every
//! fragment is summed into.

use crate::{Error, Result};

/// Longest timeline a [`CompositeBuffer`] can hold, in samples.
pub const MAX_TIMELINE_SAMPLES: usize = isize::MAX as usize / std::mem::size_of::<f32>();

/// One source recording, mono, ready to be placed into a mix.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFragment {
    /// Mono PCM samples, nominally in -1.0..=1.0.
    pub samples: Vec<f32>,
    /// Timeline position of `samples[0]`, in seconds.
    pub offset_seconds: f64,
    /// Rate `samples` are expressed at.
    pub sample_rate: u32,
}

impl AudioFragment {
    pub fn new(samples: Vec<f32>, offset_seconds: f64, sample_rate: u32) -> Self {
        Self {
            samples,
            offset_seconds,
            sample_rate,
        }
    }

    /// Length in samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Index of `samples[0]` on a timeline running at `sample_rate`.
    ///
    /// Fractional positions round up, so a fragment never starts before its
    /// requested offset. Offsets past [`MAX_TIMELINE_SAMPLES`] are rejected.
    pub fn start_index(&self, sample_rate: u32) -> Result<usize> {
        if !self.offset_seconds.is_finite() || self.offset_seconds < 0.0 {
            return Err(Error::InvalidOffset(self.offset_seconds));
        }
        let index = (self.offset_seconds * sample_rate as f64).ceil();
        if index > MAX_TIMELINE_SAMPLES as f64 {
            return Err(Error::TimelineOverflow {
                start_index: MAX_TIMELINE_SAMPLES,
                len: self.len(),
            });
        }
        Ok(index as usize)
    }
}

/// Mutable accumulator for an in-progress mix.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompositeBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl CompositeBuffer {
    /// Zero-filled buffer of `len` samples.
    pub fn silent(len: usize, sample_rate: u32) -> Self {
        Self {
            samples: vec![0.0; len],
            sample_rate,
        }
    }

    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Add `samples` into the buffer starting at `start`.
    ///
    /// The buffer must already be long enough; the compositor sizes it up
    /// front from every placement.
    pub(crate) fn add_at(&mut self, start: usize, samples: &[f32]) {
        let end = start + samples.len();
        for (out, &sample) in self.samples[start..end].iter_mut().zip(samples) {
            *out += sample;
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds at the buffer's sample rate.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Keep only `range`, dropping everything before and after it.
    pub(crate) fn retain_range(&mut self, range: std::ops::Range<usize>) {
        self.samples.truncate(range.end);
        self.samples.drain(..range.start);
    }
}
