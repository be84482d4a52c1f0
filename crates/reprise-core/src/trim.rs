//! Leading/trailing silence removal.

use crate::config::TrimMode;
use crate::fragment::CompositeBuffer;
use std::ops::Range;

/// Range of `samples` that survives trimming under `mode`.
///
/// When no trim applies the full range is returned, so the caller can slice
/// unconditionally.
pub fn trim_range(samples: &[f32], mode: TrimMode) -> Range<usize> {
    let full = 0..samples.len();
    match mode {
        TrimMode::Off => full,
        TrimMode::Legacy => {
            let first = samples.iter().position(|&s| s != 0.0);
            let last_positive = samples.iter().rposition(|&s| s > 0.0);
            match (first, last_positive) {
                // Index 0 means "not found" here.
                (Some(first), Some(last)) if first != 0 && first < last => first..last,
                _ => full,
            }
        }
        TrimMode::Symmetric => {
            let first = samples.iter().position(|&s| s != 0.0);
            let last = samples.iter().rposition(|&s| s != 0.0);
            match (first, last) {
                (Some(first), Some(last)) => first..last + 1,
                _ => full,
            }
        }
    }
}

/// Trim a slice, borrowing the surviving range.
pub fn trim_silence(samples: &[f32], mode: TrimMode) -> &[f32] {
    &samples[trim_range(samples, mode)]
}

impl CompositeBuffer {
    /// Trim in place, returning the number of samples removed.
    pub fn trim(&mut self, mode: TrimMode) -> usize {
        let before = self.len();
        let range = trim_range(self.as_slice(), mode);
        self.retain_range(range);
        before - self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_trims_both_ends() {
        let samples = [0.0, 0.0, 0.5, -0.2, 0.3, 0.0, 0.0];
        // Tail sample at index 4 is excluded by the half-open slice.
        assert_eq!(trim_silence(&samples, TrimMode::Legacy), &[0.5, -0.2]);
    }

    #[test]
    fn test_legacy_sound_at_index_zero_disables_trim() {
        let samples = [0.1, 0.2, 0.0, 0.0];
        assert_eq!(trim_silence(&samples, TrimMode::Legacy), &samples);
    }

    #[test]
    fn test_legacy_negative_only_tail_is_not_sound() {
        let samples = [0.0, 0.4, 0.2, -0.3, -0.1, 0.0];
        assert_eq!(trim_silence(&samples, TrimMode::Legacy), &[0.4]);
    }

    #[test]
    fn test_legacy_all_negative_passes_through() {
        let samples = [0.0, -0.4, -0.2, 0.0];
        assert_eq!(trim_silence(&samples, TrimMode::Legacy), &samples);
    }

    #[test]
    fn test_all_silence_passes_through() {
        let samples = [0.0; 8];
        assert_eq!(trim_silence(&samples, TrimMode::Legacy).len(), 8);
        assert_eq!(trim_silence(&samples, TrimMode::Symmetric).len(), 8);
    }

    #[test]
    fn test_empty_buffer() {
        assert!(trim_silence(&[], TrimMode::Legacy).is_empty());
        assert!(trim_silence(&[], TrimMode::Symmetric).is_empty());
    }

    #[test]
    fn test_symmetric_keeps_both_edges() {
        let samples = [0.0, 0.0, 0.5, -0.2, -0.3, 0.0];
        assert_eq!(
            trim_silence(&samples, TrimMode::Symmetric),
            &[0.5, -0.2, -0.3]
        );
        let samples = [0.7, 0.0, 0.2, 0.0];
        assert_eq!(trim_silence(&samples, TrimMode::Symmetric), &[0.7, 0.0, 0.2]);
    }

    #[test]
    fn test_off_is_identity() {
        let samples = [0.0, 1.0, 0.0];
        assert_eq!(trim_silence(&samples, TrimMode::Off), &samples);
    }

    #[test]
    fn test_trim_is_idempotent() {
        let trimmed = [0.3, -0.1, 0.0, 0.2];
        for mode in [TrimMode::Legacy, TrimMode::Symmetric] {
            assert_eq!(trim_silence(&trimmed, mode), &trimmed);
            let once = trim_silence(&[0.0, 0.0, 0.3, -0.1, 0.2, 0.0], mode).to_vec();
            assert_eq!(trim_silence(&once, TrimMode::Symmetric), once.as_slice());
        }
    }

    #[test]
    fn test_buffer_trim_reports_removed() {
        let mut buffer = CompositeBuffer::from_samples(vec![0.0, 0.0, 0.5, 0.5, 0.0], 44100);
        let removed = buffer.trim(TrimMode::Symmetric);
        assert_eq!(removed, 3);
        assert_eq!(buffer.as_slice(), &[0.5, 0.5]);
    }
}
