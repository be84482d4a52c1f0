//! Container formats.
//!
//! - `wav`: WAV decode/encode via hound (pure Rust)

pub mod wav;
