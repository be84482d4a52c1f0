//! Test helpers and fixtures for Reprise integration tests
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact operations (placement, float WAV round trip)
//! - `RESAMPLE_RMS_TOLERANCE` (5%): Level preservation across rate conversion
//! - `INT16_EPSILON`: 16-bit quantization
//! - `SILENCE_THRESHOLD` (0.0001): Silence detection (-80dB)

#![allow(dead_code)]

pub mod tolerances;

use reprise::codec::{decode_wav, encode_wav_mono_memory, WavConfig};
use reprise::prelude::*;
use std::io::Cursor;
use std::sync::Arc;

/// Mix rate used by every test engine.
pub const TEST_SAMPLE_RATE: u32 = 44100;

/// Encode mono samples as a 32-bit float WAV.
pub fn float_wav(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    encode_wav_mono_memory(samples, &WavConfig::mono(sample_rate, BitDepth::Float32))
        .expect("Failed to encode fixture WAV")
}

/// Encode interleaved 16-bit PCM with any channel count.
pub fn int16_wav(channels: &[Vec<f32>], sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("Failed to create writer");
        let frames = channels.first().map_or(0, Vec::len);
        for i in 0..frames {
            for channel in channels {
                writer
                    .write_sample((channel[i] * 32767.0).round() as i16)
                    .expect("Failed to write sample");
            }
        }
        writer.finalize().expect("Failed to finalize WAV");
    }
    cursor.into_inner()
}

/// Decode a WAV mix and return its rate and first channel.
pub fn decode_mono(bytes: &[u8]) -> (u32, Vec<f32>) {
    let decoded = decode_wav(bytes).expect("Mix output is not a valid WAV");
    (decoded.sample_rate, decoded.into_first_channel())
}

/// Generate a sine wave at given frequency and amplitude.
pub fn generate_sine(
    frequency: f64,
    sample_rate: u32,
    num_samples: usize,
    amplitude: f32,
) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            (2.0 * std::f64::consts::PI * frequency * t).sin() as f32 * amplitude
        })
        .collect()
}

/// Calculate RMS of a signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}

/// Assert that a signal is approximately silent (all values near zero).
pub fn assert_silence(samples: &[f32], tolerance: f32) {
    let max = peak(samples);
    assert!(
        max <= tolerance,
        "Expected silence, but peak amplitude was {}",
        max
    );
}

/// Check if two signals are approximately equal within tolerance.
pub fn signals_approx_equal(a: &[f32], b: &[f32], tolerance: f32) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tolerance)
}

/// Store plus an engine reading from it, with trimming disabled so lengths
/// are predictable.
pub fn untrimmed_engine() -> (Arc<MemoryStore>, MixEngine) {
    let store = Arc::new(MemoryStore::new());
    let engine = MixEngine::builder()
        .shared_source(store.clone())
        .trim_mode(TrimMode::Off)
        .fetch_concurrency(4)
        .build()
        .expect("Failed to create test engine");
    (store, engine)
}
