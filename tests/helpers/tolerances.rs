//! Tolerance constants for mix testing.
//!
//! Different stages require different precision levels.

/// Floating point rounding errors (passthrough, additive placement, float WAV).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Relative error allowed when fragment order changes the summation order.
pub const COMMUTATIVE_RELATIVE_EPSILON: f32 = 1e-6;

/// Relative RMS drift allowed across a band-limited rate conversion.
pub const RESAMPLE_RMS_TOLERANCE: f32 = 0.05;

/// Silence threshold (~-80dB).
pub const SILENCE_THRESHOLD: f32 = 0.0001;

/// 16-bit quantization step size.
pub const INT16_EPSILON: f32 = 1.0 / 32768.0;
