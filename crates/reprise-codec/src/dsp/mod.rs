//! DSP utilities for decoding and encoding.

mod resample;

pub use resample::{resample, resampled_len, ResampleQuality};
