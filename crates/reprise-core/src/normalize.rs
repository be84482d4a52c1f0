//! Peak normalization.

use crate::config::SilencePolicy;
use crate::fragment::CompositeBuffer;
use crate::{Error, Result};

/// Largest absolute sample value (0.0 for an empty slice).
///
/// NaN is contagious: any NaN sample makes the peak NaN.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |peak, s| {
        if s.is_nan() || peak.is_nan() {
            f32::NAN
        } else {
            peak.max(s.abs())
        }
    })
}

/// Rescale `samples` so the peak absolute amplitude becomes 1.0.
///
/// Returns the divisor that was applied (1.0 when nothing changed). An empty
/// slice is left alone; a silent one is handled according to `policy`.
pub fn normalize_peak(samples: &mut [f32], policy: SilencePolicy) -> Result<f32> {
    if samples.is_empty() {
        return Ok(1.0);
    }

    let peak = peak(samples);
    if !peak.is_finite() {
        return Err(Error::NonFinitePeak(peak));
    }
    if peak == 0.0 {
        return match policy {
            SilencePolicy::Reject => Err(Error::SilentMix),
            SilencePolicy::PassThrough => Ok(1.0),
        };
    }

    for sample in samples.iter_mut() {
        *sample /= peak;
    }
    Ok(peak)
}

impl CompositeBuffer {
    pub fn peak(&self) -> f32 {
        peak(self.as_slice())
    }

    /// See [`normalize_peak`].
    pub fn normalize(&mut self, policy: SilencePolicy) -> Result<f32> {
        normalize_peak(self.as_mut_slice(), policy)
    }
}
