//! Placeholder segment synthesizer.
//!
//! Renders one sine tone per note at a fixed volume with a linear fade over
//! the last [`FADE_OUT_SAMPLES`] samples, into a buffer long enough for the
//! latest-ending note.

use crate::error::{Error, Result};
use crate::note::SegmentNote;
use crate::tuning::Tuning;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Per-note amplitude.
pub const VOLUME: f32 = 0.3;

/// Length of the linear fade-out at the end of each tone.
pub const FADE_OUT_SAMPLES: usize = 1000;

/// How tones that land on the same sample combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteOverlap {
    /// Later notes replace earlier ones sample by sample
    #[default]
    Overwrite,
    /// Tones are summed like the mix compositor
    Sum,
}

/// Synthesizer configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthConfig {
    pub sample_rate: u32,
    pub volume: f32,
    pub overlap: NoteOverlap,
    pub tuning: Tuning,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            volume: VOLUME,
            overlap: NoteOverlap::Overwrite,
            tuning: Tuning::default(),
        }
    }
}

/// Renders [`SegmentNote`] sequences to mono PCM.
#[derive(Debug, Clone, Default)]
pub struct SegmentSynth {
    config: SynthConfig,
}

impl SegmentSynth {
    pub fn new(config: SynthConfig) -> Result<Self> {
        if config.sample_rate == 0 {
            return Err(Error::InvalidConfig("sample rate must be non-zero".into()));
        }
        if !config.volume.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "volume must be finite, got {}",
                config.volume
            )));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Render all notes into one buffer.
    pub fn render(&self, notes: &[SegmentNote]) -> Result<Vec<f32>> {
        let rate = self.config.sample_rate as f64;

        let mut placed = Vec::with_capacity(notes.len());
        for (index, note) in notes.iter().enumerate() {
            validate_note(index, note)?;
            let start = (note.time_seconds * rate).round() as usize;
            let len = (note.duration_seconds * rate).round() as usize;
            placed.push((start, len, note.midi_pitch));
        }

        let total = placed
            .iter()
            .map(|&(start, len, _)| start + len)
            .max()
            .unwrap_or(0);
        let mut out = vec![0.0f32; total];

        for &(start, len, pitch) in &placed {
            let tone = self.tone(pitch, len);
            let dest = &mut out[start..start + len];
            match self.config.overlap {
                NoteOverlap::Overwrite => dest.copy_from_slice(&tone),
                NoteOverlap::Sum => {
                    for (d, s) in dest.iter_mut().zip(&tone) {
                        *d += s;
                    }
                }
            }
        }

        tracing::debug!(
            notes = notes.len(),
            samples = total,
            overlap = ?self.config.overlap,
            "rendered segment"
        );
        Ok(out)
    }

    fn tone(&self, pitch: u8, len: usize) -> Vec<f32> {
        let rate = self.config.sample_rate as f64;
        let omega = TAU * self.config.tuning.note_to_freq(pitch as f64) / rate;

        let mut tone: Vec<f32> = (0..len)
            .map(|i| (omega * i as f64).sin() as f32 * self.config.volume)
            .collect();

        if len > FADE_OUT_SAMPLES {
            for i in 1..=FADE_OUT_SAMPLES {
                tone[len - i] *= i as f32 / FADE_OUT_SAMPLES as f32;
            }
        }
        tone
    }
}

fn validate_note(index: usize, note: &SegmentNote) -> Result<()> {
    if !note.time_seconds.is_finite() || note.time_seconds < 0.0 {
        return Err(Error::InvalidNote {
            index,
            reason: format!("time {} must be finite and >= 0", note.time_seconds),
        });
    }
    if !note.duration_seconds.is_finite() || note.duration_seconds < 0.0 {
        return Err(Error::InvalidNote {
            index,
            reason: format!("duration {} must be finite and >= 0", note.duration_seconds),
        });
    }
    Ok(())
}

/// Render notes with the default volume and tuning.
pub fn synthesize_segment(
    notes: &[SegmentNote],
    sample_rate: u32,
    overlap: NoteOverlap,
) -> Result<Vec<f32>> {
    SegmentSynth::new(SynthConfig {
        sample_rate,
        overlap,
        ..SynthConfig::default()
    })?
    .render(notes)
}
