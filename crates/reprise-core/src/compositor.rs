//! Timeline compositor.
//!
//! Places every fragment at its sample offset on a zero-initialized buffer
//! and sums overlapping regions. No clipping happens here: overlapping
//! fragments may push samples past full scale until the normalizer runs.

use crate::fragment::{AudioFragment, CompositeBuffer, MAX_TIMELINE_SAMPLES};
use crate::{Error, Result};

/// A block of samples pinned to an absolute index.
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub start_index: usize,
    pub samples: &'a [f32],
}

impl<'a> Placement<'a> {
    pub fn new(start_index: usize, samples: &'a [f32]) -> Self {
        Self {
            start_index,
            samples,
        }
    }

    /// One past the last index, if it fits on a timeline.
    pub fn end(&self) -> Result<usize> {
        self.start_index
            .checked_add(self.samples.len())
            .filter(|&end| end <= MAX_TIMELINE_SAMPLES)
            .ok_or(Error::TimelineOverflow {
                start_index: self.start_index,
                len: self.samples.len(),
            })
    }
}

/// Sum placements into a new buffer long enough to hold all of them.
pub fn sum_placements(placements: &[Placement<'_>], sample_rate: u32) -> Result<CompositeBuffer> {
    let mut total_len = 0usize;
    for placement in placements {
        total_len = total_len.max(placement.end()?);
    }
    let mut buffer = CompositeBuffer::silent(total_len, sample_rate);
    for placement in placements {
        buffer.add_at(placement.start_index, placement.samples);
    }
    Ok(buffer)
}

/// Composes fragments recorded at a single mix rate.
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    sample_rate: u32,
}

impl Compositor {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Compose `fragments` into one buffer.
    ///
    /// Every fragment must already be at the compositor's rate and carry a
    /// non-negative offset. An empty list yields an empty buffer.
    pub fn compose(&self, fragments: &[AudioFragment]) -> Result<CompositeBuffer> {
        let placements = fragments
            .iter()
            .map(|fragment| {
                if fragment.sample_rate != self.sample_rate {
                    return Err(Error::RateMismatch {
                        expected: self.sample_rate,
                        found: fragment.sample_rate,
                    });
                }
                let start_index = fragment.start_index(self.sample_rate)?;
                Ok(Placement::new(start_index, &fragment.samples))
            })
            .collect::<Result<Vec<_>>>()?;

        let buffer = sum_placements(&placements, self.sample_rate)?;
        tracing::debug!(
            fragments = fragments.len(),
            samples = buffer.len(),
            "composed timeline"
        );
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fragment(offset: f64, samples: &[f32]) -> AudioFragment {
        AudioFragment::new(samples.to_vec(), offset, 1)
    }

    #[test]
    fn test_empty_fragment_list() {
        let buffer = Compositor::new(44100).compose(&[]).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.duration_seconds(), 0.0);
    }

    #[test]
    fn test_additive_overlap() {
        let fragments = [fragment(0.0, &[1.0, 1.0]), fragment(1.0, &[2.0, 2.0, 2.0])];
        let buffer = Compositor::new(1).compose(&fragments).unwrap();
        assert_eq!(buffer.as_slice(), &[1.0, 3.0, 2.0, 2.0]);
    }

    #[test]
    fn test_disjoint_placement() {
        let fragments = [
            fragment(3.0, &[2.0, 1.0, 5.0, 7.0]),
            fragment(2.0, &[2.0, 7.0]),
            fragment(5.0, &[6.0, 4.0, 3.0, 1.0, 2.0, 3.0, 1.0, 3.0, 5.0]),
            fragment(20.0, &[1.0]),
        ];
        let buffer = Compositor::new(1).compose(&fragments).unwrap();
        assert_eq!(
            buffer.as_slice(),
            &[
                0.0, 0.0, 2.0, 9.0, 1.0, 11.0, 11.0, 3.0, 1.0, 2.0, 3.0, 1.0, 3.0, 5.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 1.0
            ]
        );
        assert_eq!(buffer.len(), 21);
    }

    #[test]
    fn test_gap_between_fragments_is_silent() {
        let fragments = [fragment(2.0, &[1.0, 1.0]), fragment(4.0, &[2.0, 2.0, 2.0])];
        let buffer = Compositor::new(1).compose(&fragments).unwrap();
        assert_eq!(buffer.as_slice(), &[0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_values_above_full_scale_are_kept() {
        let fragments = [fragment(0.0, &[0.9]), fragment(0.0, &[0.9])];
        let buffer = Compositor::new(1).compose(&fragments).unwrap();
        assert!((buffer.as_slice()[0] - 1.8).abs() < 1e-6);
    }

    #[test]
    fn test_rate_mismatch() {
        let fragments = [AudioFragment::new(vec![0.1], 0.0, 48000)];
        let result = Compositor::new(44100).compose(&fragments);
        assert_eq!(
            result,
            Err(Error::RateMismatch {
                expected: 44100,
                found: 48000
            })
        );
    }

    #[test]
    fn test_negative_offset_is_rejected() {
        let fragments = [fragment(-1.0, &[1.0])];
        assert!(matches!(
            Compositor::new(1).compose(&fragments),
            Err(Error::InvalidOffset(_))
        ));
    }

    #[test]
    fn test_unrepresentable_offset_is_rejected() {
        let fragments = [AudioFragment::new(vec![0.5], 1e300, 44100)];
        assert!(matches!(
            Compositor::new(44100).compose(&fragments),
            Err(Error::TimelineOverflow { .. })
        ));
    }

    #[test]
    fn test_placement_end_overflow() {
        let samples = [0.5, 0.5];
        let placements = [
            Placement::new(0, &samples),
            Placement::new(usize::MAX - 1, &samples),
        ];
        assert_eq!(
            sum_placements(&placements, 1),
            Err(Error::TimelineOverflow {
                start_index: usize::MAX - 1,
                len: 2
            })
        );
        let past_limit = [Placement::new(MAX_TIMELINE_SAMPLES, &samples)];
        assert!(sum_placements(&past_limit, 1).is_err());
    }

    #[test]
    fn test_fractional_offset_rounds_up() {
        let fragments = [AudioFragment::new(vec![1.0], 0.5 / 44100.0, 44100)];
        let buffer = Compositor::new(44100).compose(&fragments).unwrap();
        assert_eq!(buffer.as_slice(), &[0.0, 1.0]);
    }

    fn fragments_strategy() -> impl Strategy<Value = Vec<AudioFragment>> {
        prop::collection::vec(
            (0u32..64, prop::collection::vec(-1.0f32..1.0, 0..32)),
            0..8,
        )
        .prop_map(|specs| {
            specs
                .into_iter()
                .map(|(offset, samples)| AudioFragment::new(samples, offset as f64, 1))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn composition_is_order_independent(
            fragments in fragments_strategy(),
            seed in any::<u64>(),
        ) {
            use rand::seq::SliceRandom;
            use rand::SeedableRng;

            let compositor = Compositor::new(1);
            let forward = compositor.compose(&fragments).unwrap();

            let mut shuffled = fragments.clone();
            shuffled.shuffle(&mut rand::rngs::StdRng::seed_from_u64(seed));
            let permuted = compositor.compose(&shuffled).unwrap();

            prop_assert_eq!(forward.len(), permuted.len());
            for (a, b) in forward.as_slice().iter().zip(permuted.as_slice()) {
                let tolerance = 1e-6 * a.abs().max(b.abs()).max(1.0);
                prop_assert!((a - b).abs() <= tolerance, "{} vs {}", a, b);
            }
        }
    }
}
