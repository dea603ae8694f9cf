//! Genetic search for well-shaped walls.
//!
//! This crate evolves arrangements of a fixed [`BlockSet`](oxiwall_engine::BlockSet) toward
//! the wall shape scored by [`oxiwall_evaluator`]: heights rising from both edges toward
//! the center.
//!
//! # How the Search Works
//!
//! 1. **Population** - Shuffle the blocks into `P` random arrangements
//! 2. **Ranking** - Order the population by fitness, best first
//! 3. **Selection** - Pick parents by tournament
//! 4. **Reproduction** - Recombine parent pairs (order-preserving crossover) and mutate
//!    the children (swap mutation)
//! 5. **Replacement** - The `P` children become the next generation
//! 6. **Repeat** - Until the target fitness is reached or the generation budget is spent
//!
//! # Modules
//!
//! - [`operators`] - Crossover and mutation on single arrangements
//! - [`genetic`] - Individuals, populations, tournament selection, generational step
//! - [`evolution`] - Run configuration and the generation loop state machine
//!
//! # Current Limitations
//!
//! - **No elitism**: The best individual of a generation can be lost
//! - **Fixed fitness**: The streak score is the only objective; there is no plug-in point
//!   for other fitness functions
//! - **Single-threaded**: Individuals are evaluated sequentially

pub mod evolution;
pub mod genetic;
pub mod operators;
