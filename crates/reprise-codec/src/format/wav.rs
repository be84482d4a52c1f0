//! WAV codec using hound
//!
//! Decodes integer PCM (8/16/24/32-bit) and 32-bit float WAV into per-channel
//! `f32` buffers, and encodes mono buffers as 16-bit, 24-bit or 32-bit float WAV.

use crate::error::{CodecError, Result};
use crate::options::BitDepth;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Cursor, Seek, Write};

/// WAV encoder configuration
#[derive(Debug, Clone)]
pub struct WavConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bit depth
    pub bit_depth: BitDepth,
}

impl Default for WavConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            bit_depth: BitDepth::Float32,
        }
    }
}

impl WavConfig {
    /// Create a new mono WAV config
    pub fn mono(sample_rate: u32, bit_depth: BitDepth) -> Self {
        Self {
            sample_rate,
            bit_depth,
        }
    }
}

/// A decoded WAV container.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedWav {
    pub sample_rate: u32,
    /// One buffer per channel, deinterleaved.
    pub channels: Vec<Vec<f32>>,
}

impl DecodedWav {
    /// Frames per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn duration_seconds(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Keep the first channel and drop the rest.
    pub fn into_first_channel(self) -> Vec<f32> {
        self.channels.into_iter().next().unwrap_or_default()
    }
}

fn open_reader(bytes: &[u8]) -> Result<WavReader<Cursor<&[u8]>>> {
    let reader = WavReader::new(Cursor::new(bytes))
        .map_err(|e| CodecError::Decode(format!("not a readable WAV container: {}", e)))?;

    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(CodecError::Decode("WAV declares zero channels".into()));
    }
    if spec.sample_rate == 0 {
        return Err(CodecError::Decode("WAV declares a 0 Hz sample rate".into()));
    }
    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) | (SampleFormat::Int, 8..=32) => Ok(reader),
        (format, bits) => Err(CodecError::Decode(format!(
            "unsupported encoding: {}-bit {:?}",
            bits, format
        ))),
    }
}

/// Decode a WAV container held in memory.
pub fn decode_wav(bytes: &[u8]) -> Result<DecodedWav> {
    let reader = open_reader(bytes)?;
    let spec = reader.spec();
    let channel_count = spec.channels as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| CodecError::Decode(format!("failed to read float samples: {}", e)))?,
        SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| CodecError::Decode(format!("failed to read int samples: {}", e)))?
        }
    };

    let frames = interleaved.len() / channel_count;
    let mut channels: Vec<Vec<f32>> = (0..channel_count)
        .map(|_| Vec::with_capacity(frames))
        .collect();
    for frame in interleaved.chunks_exact(channel_count) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    Ok(DecodedWav {
        sample_rate: spec.sample_rate,
        channels,
    })
}

/// Duration of a WAV container in seconds, read from its header.
pub fn wav_duration(bytes: &[u8]) -> Result<f64> {
    let reader = open_reader(bytes)?;
    Ok(reader.duration() as f64 / reader.spec().sample_rate as f64)
}

/// Encode mono audio to WAV in memory
///
/// # Arguments
/// * `samples` - Mono audio samples (normalized -1.0 to 1.0)
/// * `config` - WAV configuration
///
/// # Returns
/// WAV file bytes
pub fn encode_wav_mono_memory(samples: &[f32], config: &WavConfig) -> Result<Vec<u8>> {
    let spec = create_wav_spec(config);

    let mut buffer = Vec::new();
    {
        let cursor = Cursor::new(&mut buffer);
        let mut writer = WavWriter::new(cursor, spec).map_err(encoding_error)?;

        write_mono_samples(&mut writer, samples, config)?;

        // Finalize writes the header and flushes
        writer.finalize().map_err(encoding_error)?;
    }

    Ok(buffer)
}

fn encoding_error(e: hound::Error) -> CodecError {
    CodecError::Encoding(e.to_string())
}

/// Create hound WavSpec from our config
fn create_wav_spec(config: &WavConfig) -> WavSpec {
    let sample_format = match config.bit_depth {
        BitDepth::Float32 => SampleFormat::Float,
        _ => SampleFormat::Int,
    };

    WavSpec {
        channels: 1,
        sample_rate: config.sample_rate,
        bits_per_sample: config.bit_depth.bits(),
        sample_format,
    }
}

/// Write mono samples to the writer
fn write_mono_samples<W: Write + Seek>(
    writer: &mut WavWriter<W>,
    samples: &[f32],
    config: &WavConfig,
) -> Result<()> {
    match config.bit_depth {
        BitDepth::Int16 => {
            for &sample in samples {
                writer
                    .write_sample(float_to_i16(sample))
                    .map_err(encoding_error)?;
            }
        }
        BitDepth::Int24 => {
            for &sample in samples {
                writer
                    .write_sample(float_to_i24(sample))
                    .map_err(encoding_error)?;
            }
        }
        BitDepth::Float32 => {
            for &sample in samples {
                writer.write_sample(sample).map_err(encoding_error)?;
            }
        }
    }

    Ok(())
}

/// Convert float sample to 16-bit integer with clipping
#[inline]
fn float_to_i16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    (clamped * 32767.0).round() as i16
}

/// Convert float sample to 24-bit integer (stored as i32) with clipping
#[inline]
fn float_to_i24(sample: f32) -> i32 {
    let clamped = sample.clamp(-1.0, 1.0);
    (clamped * 8388607.0).round() as i32
}
