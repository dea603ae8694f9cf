use rand::{Rng, seq::SliceRandom as _};
use serde::{Deserialize, Serialize};

use crate::{Arrangement, BlockSetError, Height};

/// The multiset of block heights a wall is built from.
///
/// Heights are not required to be unique. The set is stored sorted in
/// ascending order so that multiset equality reduces to slice equality.
///
/// A block set always holds at least two blocks and every height is positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Height>", into = "Vec<Height>")]
pub struct BlockSet {
    sorted: Vec<Height>,
}

impl BlockSet {
    /// Validates `heights` and builds a block set from them.
    ///
    /// The input order is irrelevant.
    ///
    /// # Examples
    ///
    /// ```
    /// use oxiwall_engine::{BlockSet, BlockSetError};
    ///
    /// assert!(BlockSet::new(vec![4, 2, 4]).is_ok());
    /// assert_eq!(
    ///     BlockSet::new(vec![7]),
    ///     Err(BlockSetError::TooFewBlocks { count: 1 })
    /// );
    /// assert_eq!(
    ///     BlockSet::new(vec![1, 0, 2]),
    ///     Err(BlockSetError::ZeroHeight { index: 1 })
    /// );
    /// ```
    pub fn new(mut heights: Vec<Height>) -> Result<Self, BlockSetError> {
        if heights.len() < 2 {
            return Err(BlockSetError::TooFewBlocks {
                count: heights.len(),
            });
        }
        if let Some(index) = heights.iter().position(|&h| h == 0) {
            return Err(BlockSetError::ZeroHeight { index });
        }
        heights.sort_unstable();
        Ok(Self { sorted: heights })
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Always `false`; a block set holds at least two blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Returns the heights in ascending order.
    #[must_use]
    pub fn sorted_heights(&self) -> &[Height] {
        &self.sorted
    }

    /// Returns the highest fitness any arrangement of this set can reach.
    ///
    /// Both edge streaks together cover at most `len - 2` steps.
    #[must_use]
    pub fn max_streak(&self) -> usize {
        self.sorted.len() - 2
    }

    /// Returns a uniformly shuffled arrangement of all blocks.
    ///
    /// Blocks with equal heights are shuffled as distinct elements.
    pub fn shuffled<R>(&self, rng: &mut R) -> Arrangement
    where
        R: Rng + ?Sized,
    {
        let mut heights = self.sorted.clone();
        heights.shuffle(rng);
        Arrangement::new(heights)
    }

    /// Returns `true` if `arrangement` is a permutation of this block set.
    #[must_use]
    pub fn is_arrangement(&self, arrangement: &Arrangement) -> bool {
        if arrangement.len() != self.sorted.len() {
            return false;
        }
        let mut heights = arrangement.heights().to_vec();
        heights.sort_unstable();
        heights == self.sorted
    }
}

impl TryFrom<Vec<Height>> for BlockSet {
    type Error = BlockSetError;

    fn try_from(heights: Vec<Height>) -> Result<Self, Self::Error> {
        Self::new(heights)
    }
}

impl From<BlockSet> for Vec<Height> {
    fn from(blocks: BlockSet) -> Self {
        blocks.sorted
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_rejects_empty_and_single() {
        assert_eq!(
            BlockSet::new(vec![]),
            Err(BlockSetError::TooFewBlocks { count: 0 })
        );
        assert_eq!(
            BlockSet::new(vec![5]),
            Err(BlockSetError::TooFewBlocks { count: 1 })
        );
    }

    #[test]
    fn test_two_blocks_is_minimum() {
        let blocks = BlockSet::new(vec![2, 1]).unwrap();
        assert_eq!(blocks.sorted_heights(), &[1, 2]);
        assert_eq!(blocks.max_streak(), 0);
    }

    #[test]
    fn test_shuffled_keeps_duplicates() {
        let blocks = BlockSet::new(vec![3, 3, 1, 1, 2, 5, 5, 5]).unwrap();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let wall = blocks.shuffled(&mut rng);
            assert!(blocks.is_arrangement(&wall));
        }
    }

    #[test]
    fn test_is_arrangement_checks_counts() {
        let blocks = BlockSet::new(vec![1, 2, 2, 3]).unwrap();
        assert!(blocks.is_arrangement(&Arrangement::new(vec![2, 3, 2, 1])));
        assert!(!blocks.is_arrangement(&Arrangement::new(vec![2, 3, 3, 1])));
        assert!(!blocks.is_arrangement(&Arrangement::new(vec![2, 3, 1])));
    }

    #[test]
    fn test_deserialize_validates() {
        let blocks: BlockSet = serde_json::from_str("[3, 1, 2]").unwrap();
        assert_eq!(blocks.sorted_heights(), &[1, 2, 3]);

        let result: Result<BlockSet, _> = serde_json::from_str("[3]");
        assert!(result.is_err());
        let result: Result<BlockSet, _> = serde_json::from_str("[3, 0]");
        assert!(result.unwrap_err().to_string().contains("zero height"));
    }
}
