//! Equal-tempered tuning.
//!
//! 12-TET with a configurable reference pitch, A4 = 440 Hz by default.

/// Reference pitch for A4.
pub const A4_FREQ: f64 = 440.0;

/// MIDI note number for A4.
pub const A4_NOTE: u8 = 69;

/// Frequency of a MIDI note in standard tuning.
#[inline]
pub fn midi_to_freq(note: f64) -> f64 {
    Tuning::default().note_to_freq(note)
}

/// 12-tone equal temperament around a reference note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    reference_freq: f64,
    reference_note: u8,
}

impl Tuning {
    /// Create 12-TET with custom reference pitch.
    pub fn with_reference(reference_freq: f64, reference_note: u8) -> Self {
        Self {
            reference_freq,
            reference_note,
        }
    }

    /// Frequency for a (possibly fractional) MIDI note.
    #[inline]
    pub fn note_to_freq(&self, note: f64) -> f64 {
        self.reference_freq * 2f64.powf((note - self.reference_note as f64) / 12.0)
    }

    pub fn reference_freq(&self) -> f64 {
        self.reference_freq
    }

    pub fn reference_note(&self) -> u8 {
        self.reference_note
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::with_reference(A4_FREQ, A4_NOTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_equal_temperament() {
        assert_relative_eq!(midi_to_freq(69.0), 440.0);
        assert_relative_eq!(midi_to_freq(81.0), 880.0, epsilon = 1e-9);
        assert_relative_eq!(midi_to_freq(57.0), 220.0, epsilon = 1e-9);
        // Middle C
        assert_relative_eq!(midi_to_freq(60.0), 261.6256, epsilon = 1e-3);
    }

    #[test]
    fn test_custom_reference() {
        let tuning = Tuning::with_reference(432.0, 69);
        assert_relative_eq!(tuning.note_to_freq(69.0), 432.0);
        assert_relative_eq!(tuning.note_to_freq(81.0), 864.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fractional_note() {
        // 50 cents above A4
        let freq = midi_to_freq(69.5);
        assert!(freq > 440.0 && freq < midi_to_freq(70.0));
    }
}
