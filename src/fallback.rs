//! Partial mixes: filling missing fragments with placeholder audio.

use crate::error::{Error, Result};
use crate::fragment::FragmentSpec;
use reprise_codec::{encode_wav_mono_memory, BitDepth, WavConfig};
use reprise_synth::{synthesize_segment, NoteOverlap, SegmentNote};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Supplies WAV bytes for a fragment whose recording could not be found.
pub trait FallbackSource: Send + Sync {
    /// `index` is the fragment's position in the mix request.
    fn fill(&self, index: usize, fragment: &FragmentSpec, sample_rate: u32) -> Result<Vec<u8>>;
}

/// How the engine treats fragments the fetch collaborator reports as missing.
#[derive(Clone, Default)]
pub enum FragmentPolicy {
    /// Any missing fragment aborts the mix
    #[default]
    Strict,
    /// Missing fragments are replaced by fallback audio and the mix is flagged partial
    FillMissing(Arc<dyn FallbackSource>),
}

impl FragmentPolicy {
    pub fn fill_missing(source: impl FallbackSource + 'static) -> Self {
        FragmentPolicy::FillMissing(Arc::new(source))
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, FragmentPolicy::Strict)
    }
}

impl fmt::Debug for FragmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentPolicy::Strict => f.write_str("Strict"),
            FragmentPolicy::FillMissing(_) => f.write_str("FillMissing(..)"),
        }
    }
}

/// Render a segment's notes as a mono float WAV.
pub fn render_segment_wav(
    notes: &[SegmentNote],
    sample_rate: u32,
    overlap: NoteOverlap,
) -> Result<Vec<u8>> {
    let samples = synthesize_segment(notes, sample_rate, overlap)?;
    let wav = encode_wav_mono_memory(&samples, &WavConfig::mono(sample_rate, BitDepth::Float32))?;
    Ok(wav)
}

/// Fills a missing fragment with the synthesized notes of its segment.
#[derive(Debug, Clone, Default)]
pub struct SynthFallback {
    segments: HashMap<String, Vec<SegmentNote>>,
    overlap: NoteOverlap,
}

impl SynthFallback {
    pub fn new(segments: HashMap<String, Vec<SegmentNote>>) -> Self {
        Self {
            segments,
            overlap: NoteOverlap::default(),
        }
    }

    pub fn with_overlap(mut self, overlap: NoteOverlap) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn insert(&mut self, segment_id: impl Into<String>, notes: Vec<SegmentNote>) {
        self.segments.insert(segment_id.into(), notes);
    }
}

impl FallbackSource for SynthFallback {
    fn fill(&self, index: usize, fragment: &FragmentSpec, sample_rate: u32) -> Result<Vec<u8>> {
        let no_fallback = |reason: &str| Error::NoFallback {
            index,
            object_ref: fragment.object_ref.clone(),
            reason: reason.to_string(),
        };
        let segment = fragment
            .segment_id
            .as_deref()
            .ok_or_else(|| no_fallback("fragment has no segment id"))?;
        let notes = self
            .segments
            .get(segment)
            .ok_or_else(|| no_fallback("no notes for segment"))?;

        tracing::debug!(index, segment, notes = notes.len(), "synthesizing placeholder");
        render_segment_wav(notes, sample_rate, self.overlap)
    }
}
