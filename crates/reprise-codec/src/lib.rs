//! # Reprise Codec
//!
//! Audio container handling for the Reprise mixing engine.
//!
//! This crate provides the byte-level edges of a mix:
//! - **WAV**: decode any PCM/float WAV to `f32`, encode mono WAV in memory
//! - **Resampling**: band-limited, length-exact rate conversion via rubato
//! - **Transcoding**: WAV to MP3 through an external encoder process
//!
//! ```
//! use reprise_codec::{decode_wav, encode_wav_mono_memory, BitDepth, WavConfig};
//!
//! let config = WavConfig::mono(44100, BitDepth::Int16);
//! let bytes = encode_wav_mono_memory(&[0.0, 0.5, -0.5], &config)?;
//! let decoded = decode_wav(&bytes)?;
//! assert_eq!(decoded.sample_rate, 44100);
//! assert_eq!(decoded.frames(), 3);
//! # Ok::<(), reprise_codec::CodecError>(())
//! ```

pub mod error;
mod options;
pub mod transcode;

pub mod dsp;
pub mod format;

pub use dsp::{resample, resampled_len, ResampleQuality};
pub use error::{CodecError, Result};
pub use format::wav::{decode_wav, encode_wav_mono_memory, wav_duration, DecodedWav, WavConfig};
pub use options::{BitDepth, OutputFormat};
pub use transcode::{
    Transcoder, TranscoderConfig, DEFAULT_TRANSCODER_PATH, TRANSCODER_PATH_ENV,
};
