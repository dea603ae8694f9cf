//! Fitness evaluation for wall arrangements.
//!
//! The target shape of a wall rises from both edges toward the center. The
//! fitness of an arrangement measures how far that shape holds from each edge
//! inward, as a pair of *streaks*:
//!
//! - **Left streak** - starting at the leftmost block, the number of
//!   consecutive strict increases while moving right, up to (not including)
//!   the middle index `N / 2`.
//! - **Right streak** - starting at the rightmost block, the number of
//!   consecutive strict increases while moving left, down to (and including)
//!   the middle index.
//!
//! The fitness is the sum of both streaks. A streak stops for good at the
//! first block that is not strictly higher than the previous one, so a single
//! early inversion caps that half no matter how well the rest is ordered.
//! The highest reachable fitness is `N - 2`.
//!
//! # Example
//!
//! ```
//! use oxiwall_engine::Arrangement;
//! use oxiwall_evaluator::{Fitness, fitness};
//!
//! // Perfect pyramid of 6 blocks: 2 steps from the left, 2 from the right.
//! let wall = Arrangement::new(vec![1, 3, 5, 6, 4, 2]);
//! assert_eq!(fitness(&wall), Fitness::new(4));
//!
//! // The inversion at index 1 stops the left streak immediately.
//! let wall = Arrangement::new(vec![3, 1, 5, 6, 4, 2]);
//! assert_eq!(fitness(&wall), Fitness::new(2));
//! ```

use oxiwall_engine::{Arrangement, Height};
use serde::{Deserialize, Serialize};

pub use self::streak::StreakScan;

mod streak;

/// Fitness score of an arrangement. Higher is better.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::Into,
)]
#[serde(transparent)]
pub struct Fitness(u32);

impl Fitness {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(score: u32) -> Self {
        Self(score)
    }

    #[must_use]
    pub const fn score(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

/// Computes the fitness of an arrangement.
///
/// See the [crate-level documentation](crate) for the scoring rule.
#[must_use]
pub fn fitness(arrangement: &Arrangement) -> Fitness {
    fitness_of_heights(arrangement.heights())
}

/// Like [`fitness`], but on a bare height slice.
#[must_use]
pub fn fitness_of_heights(heights: &[Height]) -> Fitness {
    let n = heights.len();
    if n < 2 {
        return Fitness::ZERO;
    }
    let mid = n / 2;
    let left = StreakScan::count(heights[0], heights[1..mid].iter().copied());
    let right = StreakScan::count(heights[n - 1], heights[mid..n - 1].iter().rev().copied());
    Fitness(left + right)
}

#[cfg(test)]
mod tests {
    use oxiwall_engine::BlockSet;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn score(heights: &[Height]) -> u32 {
        fitness_of_heights(heights).score()
    }

    #[test]
    fn test_perfect_ten_block_wall() {
        assert_eq!(score(&[1, 2, 3, 4, 5, 10, 9, 8, 7, 6]), 8);
        assert_eq!(score(&[1, 3, 5, 7, 9, 10, 8, 6, 4, 2]), 8);
    }

    #[test]
    fn test_sorted_ascending_only_scores_left() {
        // Right streak: 9 at index 8 is not higher than 10 at index 9.
        assert_eq!(score(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]), 4);
    }

    #[test]
    fn test_left_streak_stops_before_mid() {
        // Index 4 is the last one the left scan reaches (mid = 5).
        assert_eq!(score(&[1, 2, 3, 4, 5, 1, 1, 1, 1, 1]), 4);
        assert_eq!(score(&[1, 2, 3, 4, 5, 6, 1, 1, 1, 9]), 4);
    }

    #[test]
    fn test_right_streak_includes_mid() {
        // mid = 5; right scan covers indices 8, 7, 6, 5.
        assert_eq!(score(&[9, 1, 1, 1, 1, 5, 4, 3, 2, 1]), 4);
    }

    #[test]
    fn test_first_inversion_caps_half() {
        // Left: 1 -> 2 counts, then 1 stops; later increases are ignored.
        assert_eq!(score(&[1, 2, 1, 3, 4, 0, 0, 0, 0, 0]), 1);
    }

    #[test]
    fn test_equal_heights_do_not_extend() {
        assert_eq!(score(&[2, 2, 3, 3, 3, 2, 2]), 0);
    }

    #[test]
    fn test_two_blocks_always_zero() {
        assert_eq!(score(&[1, 2]), 0);
        assert_eq!(score(&[2, 1]), 0);
        assert_eq!(score(&[3, 3]), 0);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert_eq!(score(&[]), 0);
        assert_eq!(score(&[4]), 0);
    }

    #[test]
    fn test_odd_length() {
        // n = 5, mid = 2: left covers index 1, right covers 3 and 2.
        assert_eq!(score(&[1, 2, 5, 4, 3]), 3);
        assert_eq!(score(&[1, 5, 2, 4, 3]), 2);
    }

    #[test]
    fn test_fitness_range_on_random_walls() {
        let mut rng = Pcg32::seed_from_u64(42);
        for blocks in [
            vec![1, 2],
            vec![1, 2, 3],
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
            vec![1, 1, 2, 2, 3, 3, 4, 4, 5],
        ] {
            let blocks = BlockSet::new(blocks).unwrap();
            let max = u32::try_from(blocks.max_streak()).unwrap();
            for _ in 0..200 {
                let wall = blocks.shuffled(&mut rng);
                assert!(fitness(&wall).score() <= max, "{wall}");
            }
        }
    }

    #[test]
    fn test_equal_sequences_equal_fitness() {
        let a = Arrangement::new(vec![2, 2, 5, 7, 7, 3, 1]);
        let b = Arrangement::new(a.heights().to_vec());
        assert_eq!(fitness(&a), fitness(&b));
    }
}
