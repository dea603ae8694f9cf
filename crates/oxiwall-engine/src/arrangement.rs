use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Height;

/// One ordering of block heights into a wall, left edge first.
///
/// Arrangements are immutable values. Genetic operators build new
/// arrangements instead of modifying existing ones, so a parent is never
/// affected by the children derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arrangement {
    heights: Vec<Height>,
}

impl Arrangement {
    /// Creates an arrangement from heights in wall order.
    ///
    /// No multiset check is performed here; see
    /// [`BlockSet::is_arrangement`](crate::BlockSet::is_arrangement).
    #[must_use]
    pub fn new(heights: Vec<Height>) -> Self {
        Self { heights }
    }

    /// Returns the heights in wall order.
    #[must_use]
    pub fn heights(&self) -> &[Height] {
        &self.heights
    }

    /// Returns the number of blocks in the wall.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Returns a copy with the blocks at `i` and `j` exchanged.
    ///
    /// `i == j` yields an identical copy.
    ///
    /// # Examples
    ///
    /// ```
    /// use oxiwall_engine::Arrangement;
    ///
    /// let wall = Arrangement::new(vec![1, 2, 3]);
    /// let swapped = wall.swapped(0, 2);
    /// assert_eq!(swapped.heights(), &[3, 2, 1]);
    /// assert_eq!(wall.heights(), &[1, 2, 3]);
    /// ```
    #[must_use]
    pub fn swapped(&self, i: usize, j: usize) -> Self {
        let mut heights = self.heights.clone();
        heights.swap(i, j);
        Self { heights }
    }

    #[must_use]
    pub fn into_heights(self) -> Vec<Height> {
        self.heights
    }
}

impl From<Vec<Height>> for Arrangement {
    fn from(heights: Vec<Height>) -> Self {
        Self::new(heights)
    }
}

/// Formats heights separated by single spaces, e.g. `1 3 5 4 2`.
impl fmt::Display for Arrangement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.heights.iter();
        if let Some(first) = iter.next() {
            write!(f, "{first}")?;
            for h in iter {
                write!(f, " {h}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_space_separated() {
        assert_eq!(Arrangement::new(vec![1, 10, 2]).to_string(), "1 10 2");
        assert_eq!(Arrangement::new(vec![]).to_string(), "");
    }

    #[test]
    fn test_swapped_same_index_is_identity() {
        let wall = Arrangement::new(vec![4, 4, 1]);
        assert_eq!(wall.swapped(1, 1), wall);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let wall = Arrangement::new(vec![2, 5, 3]);
        assert_eq!(serde_json::to_string(&wall).unwrap(), "[2,5,3]");
    }
}
