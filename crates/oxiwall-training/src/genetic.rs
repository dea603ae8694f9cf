//! Populations of arrangements and the generational step between them.
//!
//! # Key Components
//!
//! - [`Individual`] - An arrangement together with its fitness
//! - [`Population`] - The individuals of one generation
//! - [`PopulationEvolver`] - Creates the next generation (selection, crossover, mutation)
//!
//! # Generational Replacement
//!
//! [`PopulationEvolver::evolve`] produces a completely new population of the same size.
//! Nothing is carried over: there is no elitism, so the best individual of a generation
//! survives only if it happens to be recreated. Selection pressure comes solely from
//! tournaments.
//!
//! # Example
//!
//! ```
//! use oxiwall_engine::BlockSet;
//! use oxiwall_training::genetic::{Population, PopulationEvolver};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let blocks = BlockSet::new((1..=10).collect()).unwrap();
//! let mut rng = Pcg32::seed_from_u64(1);
//! let mut population = Population::random(&blocks, 20, &mut rng);
//!
//! let evolver = PopulationEvolver {
//!     tournament_size: 3,
//!     mutation_rate: 0.1,
//! };
//! for _ in 0..10 {
//!     population.rank();
//!     population = evolver.evolve(&population, &mut rng);
//! }
//! assert_eq!(population.len(), 20);
//! ```

use oxiwall_engine::{Arrangement, BlockSet};
use oxiwall_evaluator::Fitness;
use rand::Rng;

use crate::operators;

/// A candidate wall and its fitness.
///
/// Fitness is computed once on construction; since arrangements are immutable it never
/// goes stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    arrangement: Arrangement,
    fitness: Fitness,
}

impl Individual {
    #[must_use]
    pub fn new(arrangement: Arrangement) -> Self {
        let fitness = oxiwall_evaluator::fitness(&arrangement);
        Self {
            arrangement,
            fitness,
        }
    }

    #[must_use]
    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    #[must_use]
    pub fn fitness(&self) -> Fitness {
        self.fitness
    }

    #[must_use]
    pub fn into_arrangement(self) -> Arrangement {
        self.arrangement
    }
}

/// Summary of the fitness values in a population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessStats {
    pub min: Fitness,
    pub max: Fitness,
    pub mean: f64,
}

impl FitnessStats {
    /// Returns `None` for an empty input.
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Fitness>,
    {
        let mut iter = values.into_iter();
        let first = iter.next()?;
        let (mut min, mut max, mut sum, mut count) = (first, first, first.as_f64(), 1_u32);
        for value in iter {
            min = min.min(value);
            max = max.max(value);
            sum += value.as_f64();
            count += 1;
        }
        Some(Self {
            min,
            max,
            mean: sum / f64::from(count),
        })
    }
}

/// The individuals of one generation.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates `count` individuals, each an independent uniform shuffle of `blocks`.
    ///
    /// Individuals are not required to differ from each other.
    #[must_use]
    pub fn random<R>(blocks: &BlockSet, count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::new(blocks.shuffled(rng)))
            .collect();
        Self { individuals }
    }

    #[must_use]
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Sorts individuals by fitness, best first.
    ///
    /// The sort is stable, so equally fit individuals keep their relative order.
    pub fn rank(&mut self) {
        self.individuals
            .sort_by(|a, b| b.fitness.cmp(&a.fitness));
    }

    #[must_use]
    pub fn is_ranked(&self) -> bool {
        self.individuals
            .is_sorted_by(|a, b| a.fitness >= b.fitness)
    }

    /// Returns the fittest individual, the earliest one on ties.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.iter().reduce(|best, ind| {
            if ind.fitness > best.fitness {
                ind
            } else {
                best
            }
        })
    }

    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<FitnessStats> {
        FitnessStats::new(self.individuals.iter().map(Individual::fitness))
    }
}

/// Controls how one generation is turned into the next.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    /// Number of individuals drawn per tournament (larger = stronger selection pressure)
    pub tournament_size: usize,
    /// Probability of applying a swap mutation to each child
    pub mutation_rate: f64,
}

impl PopulationEvolver {
    /// Creates the next generation.
    ///
    /// For each of `len / 2` pairs:
    ///
    /// 1. Selects two parents by independent tournaments over `population`
    /// 2. Creates one child from each parent order, `(p1, p2)` and `(p2, p1)`
    /// 3. Mutates each child independently
    ///
    /// The result replaces `population` entirely. An odd trailing slot is not filled, so
    /// callers keep the population size even.
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let pairs = population.len() / 2;
        let mut next_individuals = Vec::with_capacity(pairs * 2);

        for _ in 0..pairs {
            let p1 = tournament_select(&population.individuals, self.tournament_size, rng);
            let p2 = tournament_select(&population.individuals, self.tournament_size, rng);

            let c1 = operators::crossover(p1.arrangement(), p2.arrangement(), rng);
            let c2 = operators::crossover(p2.arrangement(), p1.arrangement(), rng);

            next_individuals.push(Individual::new(operators::mutate(
                &c1,
                self.mutation_rate,
                rng,
            )));
            next_individuals.push(Individual::new(operators::mutate(
                &c2,
                self.mutation_rate,
                rng,
            )));
        }

        Population {
            individuals: next_individuals,
        }
    }
}

/// Selects an individual using tournament selection.
///
/// Draws `tournament_size` individuals uniformly *with replacement* and returns the
/// fittest of them. On ties the one drawn first wins, so the result is fully determined
/// by the random sequence.
///
/// # Panics
///
/// Panics if `population` is empty or `tournament_size` is zero.
pub fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual
where
    R: Rng + ?Sized,
{
    assert!(tournament_size > 0);
    assert!(!population.is_empty());
    let mut winner = &population[rng.random_range(0..population.len())];
    for _ in 1..tournament_size {
        let candidate = &population[rng.random_range(0..population.len())];
        if candidate.fitness > winner.fitness {
            winner = candidate;
        }
    }
    winner
}
