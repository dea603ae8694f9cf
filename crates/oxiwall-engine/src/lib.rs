//! Core data structures for wall building.
//!
//! A wall is a left-to-right sequence of blocks, each with a fixed integer
//! height. This crate models the raw material of the search:
//!
//! - [`Height`] - Height of a single block
//! - [`BlockSet`] - The validated multiset of block heights a run works with
//! - [`Arrangement`] - One ordering of those heights into a wall
//!
//! Every arrangement the search produces is a permutation of the same
//! [`BlockSet`]. Use [`BlockSet::is_arrangement`] to check that invariant.
//!
//! # Example
//!
//! ```
//! use oxiwall_engine::{Arrangement, BlockSet};
//!
//! let blocks = BlockSet::new(vec![3, 1, 2, 2]).unwrap();
//! let wall = Arrangement::new(vec![1, 2, 3, 2]);
//! assert!(blocks.is_arrangement(&wall));
//!
//! let other = Arrangement::new(vec![1, 1, 2, 3]);
//! assert!(!blocks.is_arrangement(&other));
//! ```

pub use self::{arrangement::*, block_set::*};

mod arrangement;
mod block_set;

/// Height of a single block.
pub type Height = u32;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BlockSetError {
    #[display("at least two blocks are required, got {count}")]
    TooFewBlocks { count: usize },
    #[display("block #{index} has zero height")]
    ZeroHeight { index: usize },
}
