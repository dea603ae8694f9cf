//! Genetic operators on arrangements.
//!
//! These are the building blocks [`PopulationEvolver`](crate::genetic::PopulationEvolver)
//! uses to create the next generation:
//!
//! - **Crossover**: [`crossover`] recombines two parents, [`crossover_segment`] is its
//!   deterministic core
//! - **Mutation**: [`mutate`] swaps two blocks with a given probability
//!
//! All operators take their parents by reference and return new arrangements. As long as
//! the inputs are permutations of the same [`BlockSet`](oxiwall_engine::BlockSet), so are
//! the outputs.
//!
//! # Duplicate Heights
//!
//! Blocks are identified only by their height. When two blocks share a height, the
//! crossover does not care which of them ends up where; it only guarantees that each
//! height appears in the child exactly as often as in the parents. See
//! [`crossover_segment`] for how this is enforced.

use std::{collections::HashMap, ops::Range};

use oxiwall_engine::{Arrangement, Height};
use rand::Rng;

/// Order-preserving crossover with a random segment.
///
/// Draws `start` uniformly from `[0, n)` and `end` uniformly from `[start, n)`, then
/// delegates to [`crossover_segment`]. The segment may be empty.
///
/// # Panics
///
/// Panics if the parents are empty, differ in length, or are not permutations of the
/// same heights.
pub fn crossover<R>(parent_a: &Arrangement, parent_b: &Arrangement, rng: &mut R) -> Arrangement
where
    R: Rng + ?Sized,
{
    assert_eq!(parent_a.len(), parent_b.len());
    assert!(!parent_a.is_empty(), "cannot cross empty arrangements");
    let n = parent_a.len();
    let start = rng.random_range(0..n);
    let end = rng.random_range(start..n);
    crossover_segment(parent_a, parent_b, start..end)
}

/// Builds a child from a segment of `parent_a` and the remaining heights of `parent_b`.
///
/// 1. Positions in `segment` are copied from `parent_a` unchanged
/// 2. The other positions are filled left to right with `parent_b`'s heights in
///    `parent_b`'s order, skipping heights that are already used up
///
/// A height is used up once the child holds it as many times as `parent_b` does. The
/// remaining count per height starts at its multiplicity in `parent_b` minus its
/// occurrences in the copied segment. With distinct heights this reduces to skipping every
/// height already present in the child.
///
/// # Panics
///
/// Panics if the parents differ in length, `segment` is out of bounds, or the parents are
/// not permutations of the same heights.
///
/// # Examples
///
/// ```
/// use oxiwall_engine::Arrangement;
/// use oxiwall_training::operators::crossover_segment;
///
/// let a = Arrangement::new(vec![1, 2, 3, 4, 5, 6]);
/// let b = Arrangement::new(vec![6, 5, 4, 3, 2, 1]);
/// let child = crossover_segment(&a, &b, 2..4);
/// assert_eq!(child.heights(), &[6, 5, 3, 4, 2, 1]);
///
/// // Duplicate heights keep their multiplicity.
/// let a = Arrangement::new(vec![2, 2, 1, 3]);
/// let b = Arrangement::new(vec![1, 2, 3, 2]);
/// let child = crossover_segment(&a, &b, 0..1);
/// assert_eq!(child.heights(), &[2, 1, 2, 3]);
/// ```
#[must_use]
pub fn crossover_segment(
    parent_a: &Arrangement,
    parent_b: &Arrangement,
    segment: Range<usize>,
) -> Arrangement {
    assert_eq!(parent_a.len(), parent_b.len());
    assert!(
        segment.start <= segment.end && segment.end <= parent_a.len(),
        "segment {segment:?} out of bounds for length {}",
        parent_a.len()
    );

    let mut remaining = height_counts(parent_b.heights());
    let mut child = vec![None; parent_a.len()];
    for i in segment {
        let height = parent_a.heights()[i];
        let count = remaining
            .get_mut(&height)
            .filter(|count| **count > 0)
            .unwrap_or_else(|| panic!("height {height} of first parent is missing from second"));
        *count -= 1;
        child[i] = Some(height);
    }

    let mut donor = parent_b.heights().iter().copied();
    let heights = child
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| take_unused(&mut donor, &mut remaining)))
        .collect();
    Arrangement::new(heights)
}

fn height_counts(heights: &[Height]) -> HashMap<Height, usize> {
    let mut counts = HashMap::new();
    for &h in heights {
        *counts.entry(h).or_insert(0) += 1;
    }
    counts
}

/// Advances `donor` past used-up heights and takes the next one.
fn take_unused<I>(donor: &mut I, remaining: &mut HashMap<Height, usize>) -> Height
where
    I: Iterator<Item = Height>,
{
    donor
        .find(|h| match remaining.get_mut(h) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        })
        .expect("second parent should supply every unfilled position")
}

/// Swap mutation.
///
/// With probability `rate`, picks two positions independently and uniformly (they may
/// coincide) and returns a copy with those blocks swapped. Otherwise returns an equal copy.
///
/// # Panics
///
/// Panics if `rate` is outside `[0, 1]`.
///
/// # Examples
///
/// ```
/// use oxiwall_engine::Arrangement;
/// use oxiwall_training::operators::mutate;
///
/// let wall = Arrangement::new(vec![1, 2, 3]);
/// let mut rng = rand::rng();
/// assert_eq!(mutate(&wall, 0.0, &mut rng), wall);
/// ```
#[must_use]
pub fn mutate<R>(arrangement: &Arrangement, rate: f64, rng: &mut R) -> Arrangement
where
    R: Rng + ?Sized,
{
    if arrangement.is_empty() || !rng.random_bool(rate) {
        return arrangement.clone();
    }
    let n = arrangement.len();
    let i = rng.random_range(0..n);
    let j = rng.random_range(0..n);
    arrangement.swapped(i, j)
}

#[cfg(test)]
mod tests {
    use oxiwall_engine::BlockSet;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn wall(heights: &[Height]) -> Arrangement {
        Arrangement::new(heights.to_vec())
    }

    mod crossover {
        use super::*;

        #[test]
        fn test_empty_segment_copies_second_parent() {
            let a = wall(&[1, 2, 3, 4]);
            let b = wall(&[4, 2, 1, 3]);
            assert_eq!(crossover_segment(&a, &b, 2..2), b);
        }

        #[test]
        fn test_full_segment_copies_first_parent() {
            let a = wall(&[1, 2, 3, 4]);
            let b = wall(&[4, 2, 1, 3]);
            assert_eq!(crossover_segment(&a, &b, 0..4), a);
        }

        #[test]
        fn test_fill_skips_segment_heights() {
            let a = wall(&[1, 2, 3, 4, 5]);
            let b = wall(&[3, 5, 1, 4, 2]);
            // segment [1, 3) = [2, 3]; b without 2 and 3 is [5, 1, 4].
            assert_eq!(
                crossover_segment(&a, &b, 1..3).heights(),
                &[5, 2, 3, 1, 4]
            );
        }

        #[test]
        fn test_duplicates_uneven_between_segment_and_rest() {
            // Both 7s are in a's segment; b has them at the front.
            let a = wall(&[1, 7, 7, 2, 3]);
            let b = wall(&[7, 7, 3, 2, 1]);
            let child = crossover_segment(&a, &b, 1..3);
            assert_eq!(child.heights(), &[3, 7, 7, 2, 1]);

            // Only one 7 in the segment; the other must still be placed.
            let child = crossover_segment(&a, &b, 2..4);
            assert_eq!(child.heights(), &[7, 3, 7, 2, 1]);
        }

        #[test]
        fn test_all_equal_heights() {
            let a = wall(&[4, 4, 4, 4]);
            let b = a.clone();
            assert_eq!(crossover_segment(&a, &b, 1..3), a);
        }

        #[test]
        #[should_panic(expected = "missing from second")]
        fn test_rejects_mismatched_parents() {
            let a = wall(&[1, 2, 3]);
            let b = wall(&[1, 2, 4]);
            let _ = crossover_segment(&a, &b, 2..3);
        }

        #[test]
        fn test_random_crossover_preserves_multiset() {
            let mut rng = Pcg32::seed_from_u64(3);
            for heights in [
                vec![1, 2],
                vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
                vec![1, 1, 1, 2, 2, 3, 5, 5, 8, 8, 8],
            ] {
                let blocks = BlockSet::new(heights).unwrap();
                for _ in 0..200 {
                    let a = blocks.shuffled(&mut rng);
                    let b = blocks.shuffled(&mut rng);
                    let child = crossover(&a, &b, &mut rng);
                    assert_eq!(child.len(), a.len());
                    assert!(blocks.is_arrangement(&child), "{a} x {b} => {child}");
                }
            }
        }
    }

    mod mutation {
        use super::*;

        #[test]
        fn test_zero_rate_is_noop() {
            let mut rng = Pcg32::seed_from_u64(0);
            let original = wall(&[5, 3, 1, 2, 4]);
            for _ in 0..100 {
                assert_eq!(mutate(&original, 0.0, &mut rng), original);
            }
        }

        #[test]
        fn test_full_rate_swaps_at_most_two() {
            let mut rng = Pcg32::seed_from_u64(1);
            let original = wall(&[1, 2, 3, 4, 5, 6]);
            for _ in 0..100 {
                let mutated = mutate(&original, 1.0, &mut rng);
                let changed = std::iter::zip(original.heights(), mutated.heights())
                    .filter(|(a, b)| a != b)
                    .count();
                assert!(changed == 0 || changed == 2);
            }
        }

        #[test]
        fn test_full_rate_eventually_changes() {
            let mut rng = Pcg32::seed_from_u64(2);
            let original = wall(&[1, 2, 3, 4, 5, 6]);
            assert!((0..100).any(|_| mutate(&original, 1.0, &mut rng) != original));
        }

        #[test]
        fn test_mutation_leaves_input_untouched() {
            let mut rng = Pcg32::seed_from_u64(4);
            let original = wall(&[9, 8, 7]);
            let snapshot = original.clone();
            let _ = mutate(&original, 1.0, &mut rng);
            assert_eq!(original, snapshot);
        }
    }
}
