//! Placeholder audio for Reprise segments.
//!
//! Renders a reference track from a segment's symbolic notes when no human
//! recording exists yet:
//!
//! - **[`SegmentNote`]** and [`parse_segment_notes`] for MIDI-JSON or flat note lists
//! - **[`SegmentSynth`]** - sine tones at a fixed volume with a short fade-out
//! - **[`Tuning`]** - 12-TET, A4 = 440 Hz
//!
//! # Quick Start
//!
//! ```
//! use reprise_synth::{parse_segment_notes, synthesize_segment, NoteOverlap};
//!
//! let notes = parse_segment_notes(r#"[{ "midi": 69, "time": 0.0, "duration": 0.5 }]"#)?;
//! let samples = synthesize_segment(&notes, 44100, NoteOverlap::Overwrite)?;
//! assert_eq!(samples.len(), 22050);
//! # Ok::<(), reprise_synth::Error>(())
//! ```

pub mod error;
pub use error::{Error, Result};

mod note;
pub use note::{parse_segment_notes, SegmentNote};

mod synth;
pub use synth::{
    synthesize_segment, NoteOverlap, SegmentSynth, SynthConfig, FADE_OUT_SAMPLES, VOLUME,
};

pub mod tuning;
pub use tuning::{midi_to_freq, Tuning, A4_FREQ, A4_NOTE};
