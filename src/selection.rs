//! One recording per segment.

use crate::fragment::FragmentSpec;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::hash::Hash;

/// Group `items` by `key` in first-seen order and pick one member of each
/// group uniformly at random.
pub fn pick_one_per_group<T, K, F, R>(items: &[T], key: F, rng: &mut R) -> Vec<T>
where
    T: Clone,
    K: Eq + Hash,
    F: Fn(&T) -> K,
    R: Rng + ?Sized,
{
    let mut order: Vec<Vec<&T>> = Vec::new();
    let mut slots: HashMap<K, usize> = HashMap::new();

    for item in items {
        let slot = *slots.entry(key(item)).or_insert_with(|| {
            order.push(Vec::new());
            order.len() - 1
        });
        order[slot].push(item);
    }

    order
        .iter()
        .filter_map(|group| group.choose(rng).map(|item| (*item).clone()))
        .collect()
}

#[derive(PartialEq, Eq, Hash)]
enum SegmentKey<'a> {
    Segment(&'a str),
    Ungrouped(usize),
}

/// Choose one candidate recording per segment.
///
/// Candidates without a segment id are each kept as their own group.
pub fn select_recordings<R: Rng + ?Sized>(
    candidates: &[FragmentSpec],
    rng: &mut R,
) -> Vec<FragmentSpec> {
    let indexed: Vec<(usize, &FragmentSpec)> = candidates.iter().enumerate().collect();
    let picked = pick_one_per_group(
        &indexed,
        |&(index, spec)| match spec.segment_id.as_deref() {
            Some(segment) => SegmentKey::Segment(segment),
            None => SegmentKey::Ungrouped(index),
        },
        rng,
    );
    let selected: Vec<FragmentSpec> = picked.into_iter().map(|(_, spec)| spec.clone()).collect();
    tracing::debug!(
        candidates = candidates.len(),
        selected = selected.len(),
        "selected recordings"
    );
    selected
}
