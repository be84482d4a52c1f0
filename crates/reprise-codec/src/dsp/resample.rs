//! Audio resampling using rubato
//!
//! Provides band-limited, deterministic sample rate conversion. Output length
//! is always `round(len * to / from)` and the resampler's group delay is
//! removed so the first output sample lines up with the first input sample.

use crate::error::Result;
use rubato::{FftFixedIn, Resampler};

/// Resampling quality presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResampleQuality {
    /// Fast resampling (lower quality)
    Fast,
    /// Balanced quality/speed (default)
    #[default]
    Medium,
    /// High quality
    High,
    /// Best quality (slowest)
    Best,
}

impl ResampleQuality {
    fn chunk_size(&self) -> usize {
        match self {
            ResampleQuality::Fast => 512,
            ResampleQuality::Medium => 1024,
            ResampleQuality::High => 2048,
            ResampleQuality::Best => 4096,
        }
    }

    fn sub_chunks(&self) -> usize {
        match self {
            ResampleQuality::Fast => 1,
            ResampleQuality::Medium => 2,
            ResampleQuality::High => 4,
            ResampleQuality::Best => 8,
        }
    }
}

/// Length of `input_len` samples after conversion from `source_rate` to `target_rate`.
pub fn resampled_len(input_len: usize, source_rate: u32, target_rate: u32) -> usize {
    (input_len as f64 * target_rate as f64 / source_rate as f64).round() as usize
}

/// Convert mono `samples` from `source_rate` to `target_rate`.
///
/// Equal rates hand the input back untouched.
pub fn resample(
    samples: Vec<f32>,
    source_rate: u32,
    target_rate: u32,
    quality: ResampleQuality,
) -> Result<Vec<f32>> {
    if source_rate == target_rate {
        return Ok(samples);
    }

    let expected_len = resampled_len(samples.len(), source_rate, target_rate);
    if expected_len == 0 {
        return Ok(Vec::new());
    }

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        target_rate as usize,
        quality.chunk_size(),
        quality.sub_chunks(),
        1,
    )?;

    let delay = resampler.output_delay();
    let needed = delay + expected_len;
    let mut output = Vec::with_capacity(needed + quality.chunk_size());
    let mut chunk = Vec::new();
    let mut pos = 0;

    // Past the end of the input the resampler is fed zeros until the delayed
    // tail has been flushed out.
    while output.len() < needed {
        let frames = resampler.input_frames_next();
        let available = samples.len().saturating_sub(pos).min(frames);

        chunk.clear();
        chunk.extend_from_slice(&samples[pos..pos + available]);
        chunk.resize(frames, 0.0);
        pos += available;

        let processed = resampler.process(&[chunk.as_slice()], None)?;
        output.extend_from_slice(&processed[0]);
    }

    output.drain(..delay);
    output.truncate(expected_len);

    tracing::trace!(
        source_rate,
        target_rate,
        input = samples.len(),
        output = output.len(),
        "resampled"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(frequency: f32, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                0.5 * (2.0 * std::f32::consts::PI * frequency * i as f32 / sample_rate as f32)
                    .sin()
            })
            .collect()
    }

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn test_no_resample_needed() {
        let samples = vec![1.0, 2.0, 3.0];
        let out = resample(samples.clone(), 44100, 44100, ResampleQuality::Fast).unwrap();
        assert_eq!(out, samples);
    }

    #[test]
    fn test_empty_input() {
        let out = resample(Vec::new(), 48000, 44100, ResampleQuality::Medium).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_resampled_len_rounds() {
        assert_eq!(resampled_len(48000, 48000, 44100), 44100);
        assert_eq!(resampled_len(1000, 48000, 44100), 919); // 918.75
        assert_eq!(resampled_len(3, 44100, 44100), 3);
    }

    #[test]
    fn test_downsample_exact_length() {
        let input = sine(440.0, 48000, 4800);
        let out = resample(input, 48000, 44100, ResampleQuality::Medium).unwrap();
        assert_eq!(out.len(), 4410);
    }

    #[test]
    fn test_upsample_exact_length() {
        let input = sine(1000.0, 22050, 2205);
        let out = resample(input, 22050, 44100, ResampleQuality::High).unwrap();
        assert_eq!(out.len(), 4410);
    }

    #[test]
    fn test_short_input_shorter_than_chunk() {
        let out = resample(vec![0.25; 10], 48000, 44100, ResampleQuality::Best).unwrap();
        assert_eq!(out.len(), 9); // 9.1875
    }

    #[test]
    fn test_preserves_level() {
        let input = sine(440.0, 48000, 48000);
        let in_rms = rms(&input[4800..43200]);
        let out = resample(input, 48000, 44100, ResampleQuality::Medium).unwrap();
        let out_rms = rms(&out[4410..39690]);
        assert!(
            (in_rms - out_rms).abs() / in_rms < 0.05,
            "rms {} vs {}",
            in_rms,
            out_rms
        );
    }

    #[test]
    fn test_deterministic() {
        let input = sine(300.0, 32000, 3200);
        let a = resample(input.clone(), 32000, 44100, ResampleQuality::Fast).unwrap();
        let b = resample(input, 32000, 44100, ResampleQuality::Fast).unwrap();
        assert_eq!(a, b);
    }
}
