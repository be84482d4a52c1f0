//! Segment notes and the JSON documents they are read from.
//!
//! Two shapes are accepted:
//! - MIDI-JSON: `{ "tracks": [ { "notes": [ { "midi", "time", "duration" } ] } ] }`
//! - a flat list: `[ { "midi", "time", "duration" } ]`, optionally wrapped as `{ "notes": [...] }`

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One symbolic note of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentNote {
    /// Onset in seconds from the start of the segment
    #[serde(alias = "time")]
    pub time_seconds: f64,
    /// MIDI pitch (69 = A4)
    #[serde(alias = "midi")]
    pub midi_pitch: u8,
    #[serde(alias = "duration")]
    pub duration_seconds: f64,
}

impl SegmentNote {
    pub fn new(time_seconds: f64, midi_pitch: u8, duration_seconds: f64) -> Self {
        Self {
            time_seconds,
            midi_pitch,
            duration_seconds,
        }
    }

    pub fn end_seconds(&self) -> f64 {
        self.time_seconds + self.duration_seconds
    }
}

#[derive(Deserialize)]
struct Track {
    #[serde(default)]
    notes: Vec<SegmentNote>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SegmentDocument {
    Midi { tracks: Vec<Track> },
    Wrapped { notes: Vec<SegmentNote> },
    Flat(Vec<SegmentNote>),
}

/// Parse segment notes from JSON. MIDI-JSON tracks are concatenated in order.
pub fn parse_segment_notes(json: &str) -> Result<Vec<SegmentNote>> {
    let notes = match serde_json::from_str::<SegmentDocument>(json)? {
        SegmentDocument::Midi { tracks } => tracks.into_iter().flat_map(|t| t.notes).collect(),
        SegmentDocument::Wrapped { notes } | SegmentDocument::Flat(notes) => notes,
    };
    tracing::trace!(count = notes.len(), "parsed segment notes");
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_midi_json() {
        let json = r#"{
            "header": { "ppq": 480 },
            "tracks": [
                { "name": "melody", "notes": [
                    { "midi": 60, "time": 0.0, "duration": 0.5, "velocity": 0.8 },
                    { "midi": 64, "time": 0.5, "duration": 0.5 }
                ] },
                { "name": "empty" },
                { "notes": [ { "midi": 48, "time": 0.0, "duration": 1.0 } ] }
            ]
        }"#;
        let notes = parse_segment_notes(json).unwrap();
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0], SegmentNote::new(0.0, 60, 0.5));
        assert_eq!(notes[1].midi_pitch, 64);
        assert_eq!(notes[2].duration_seconds, 1.0);
    }

    #[test]
    fn test_parse_flat_list() {
        let json = r#"[ { "midi": 69, "time": 1.25, "duration": 0.25 } ]"#;
        let notes = parse_segment_notes(json).unwrap();
        assert_eq!(notes, vec![SegmentNote::new(1.25, 69, 0.25)]);
        assert_eq!(notes[0].end_seconds(), 1.5);
    }

    #[test]
    fn test_parse_wrapped_and_long_names() {
        let json = r#"{ "notes": [ { "midi_pitch": 70, "time_seconds": 0, "duration_seconds": 2 } ] }"#;
        let notes = parse_segment_notes(json).unwrap();
        assert_eq!(notes, vec![SegmentNote::new(0.0, 70, 2.0)]);
    }

    #[test]
    fn test_parse_rejects_unknown_shape() {
        assert!(parse_segment_notes(r#"{ "foo": 1 }"#).is_err());
        assert!(parse_segment_notes("not json").is_err());
        assert!(parse_segment_notes(r#"[ { "midi": 300, "time": 0, "duration": 1 } ]"#).is_err());
    }
}
