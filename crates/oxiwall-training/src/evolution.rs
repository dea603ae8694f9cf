//! The generation loop.
//!
//! [`EvolutionEngine`] owns a population and replaces it generation by generation until
//! either the best individual reaches the target fitness ([`EvolutionState::Converged`]) or
//! the generation budget runs out ([`EvolutionState::Exhausted`]).
//!
//! ```text
//!            step()                    best >= target
//!   Running ────────▶ next generation ───────────────▶ Converged
//!      ▲                     │
//!      └──── budget left ────┤
//!                            └─── budget spent ──────▶ Exhausted
//! ```
//!
//! After every generation the engine reports a [`GenerationReport`] to a
//! [`GenerationObserver`]. Any `FnMut(&GenerationReport)` closure is an observer.
//!
//! # Example
//!
//! ```
//! use oxiwall_engine::BlockSet;
//! use oxiwall_training::evolution::{EvolutionConfig, EvolutionEngine, GenerationReport};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let blocks = BlockSet::new((1..=10).collect()).unwrap();
//! let config = EvolutionConfig::default();
//! let engine = EvolutionEngine::new(blocks, config, Pcg32::seed_from_u64(0)).unwrap();
//!
//! let mut last_generation = None;
//! let outcome = engine.run(&mut |report: &GenerationReport| {
//!     last_generation = Some(report.generation);
//! });
//! assert!(outcome.state.is_terminal());
//! assert_eq!(last_generation, Some(outcome.generations - 1));
//! ```

use oxiwall_engine::{BlockSet, Height};
use oxiwall_evaluator::Fitness;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::genetic::{FitnessStats, Individual, Population, PopulationEvolver};

/// Parameters of one evolution run.
///
/// Missing fields fall back to [`Default`] when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Number of individuals per generation. Must be even.
    pub population_size: usize,
    /// Maximum number of generations to run.
    pub generations: usize,
    /// Probability of a swap mutation per child, in `[0, 1]`.
    pub mutation_rate: f64,
    /// Individuals drawn per tournament.
    pub tournament_size: usize,
    /// Fitness that ends the run early. `None` means the maximum reachable, `N - 2`.
    pub target_fitness: Option<u32>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 500,
            mutation_rate: 0.1,
            tournament_size: 3,
            target_fitness: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be even, got {size}")]
    OddPopulationSize { size: usize },
    #[display("population size {size} is smaller than tournament size {tournament_size}")]
    PopulationSmallerThanTournament { size: usize, tournament_size: usize },
    #[display("tournament size must be positive")]
    ZeroTournamentSize,
    #[display("mutation rate must be within [0, 1], got {rate}")]
    MutationRateOutOfRange { rate: f64 },
    #[display("generation budget must be positive")]
    ZeroGenerations,
}

impl EvolutionConfig {
    /// Checks the parameters for consistency.
    ///
    /// # Examples
    ///
    /// ```
    /// use oxiwall_training::evolution::{ConfigError, EvolutionConfig};
    ///
    /// let config = EvolutionConfig {
    ///     population_size: 11,
    ///     ..EvolutionConfig::default()
    /// };
    /// assert_eq!(config.validate(), Err(ConfigError::OddPopulationSize { size: 11 }));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tournament_size == 0 {
            return Err(ConfigError::ZeroTournamentSize);
        }
        if self.population_size % 2 != 0 {
            return Err(ConfigError::OddPopulationSize {
                size: self.population_size,
            });
        }
        if self.population_size < self.tournament_size {
            return Err(ConfigError::PopulationSmallerThanTournament {
                size: self.population_size,
                tournament_size: self.tournament_size,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::MutationRateOutOfRange {
                rate: self.mutation_rate,
            });
        }
        if self.generations == 0 {
            return Err(ConfigError::ZeroGenerations);
        }
        Ok(())
    }

    /// Returns the fitness that ends a run on `blocks` early.
    #[must_use]
    pub fn resolve_target(&self, blocks: &BlockSet) -> Fitness {
        self.target_fitness.map_or_else(
            || Fitness::new(u32::try_from(blocks.max_streak()).unwrap_or(u32::MAX)),
            Fitness::new,
        )
    }

    fn evolver(&self) -> PopulationEvolver {
        PopulationEvolver {
            tournament_size: self.tournament_size,
            mutation_rate: self.mutation_rate,
        }
    }
}

/// Lifecycle of an [`EvolutionEngine`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum EvolutionState {
    #[display("running")]
    Running,
    /// The best individual reached the target fitness.
    #[display("converged")]
    Converged,
    /// The generation budget was spent without reaching the target.
    #[display("exhausted")]
    Exhausted,
}

impl EvolutionState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !self.is_running()
    }
}

/// Progress of one completed generation.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Zero-based index of the generation just produced.
    pub generation: usize,
    /// Fittest individual of that generation.
    pub best: Individual,
    pub fitness_stats: FitnessStats,
}

impl GenerationReport {
    #[must_use]
    pub fn best_heights(&self) -> &[Height] {
        self.best.arrangement().heights()
    }

    #[must_use]
    pub fn best_fitness(&self) -> Fitness {
        self.best.fitness()
    }
}

/// Receives a [`GenerationReport`] after every generation.
pub trait GenerationObserver {
    fn on_generation(&mut self, report: &GenerationReport);
}

impl<F> GenerationObserver for F
where
    F: FnMut(&GenerationReport),
{
    fn on_generation(&mut self, report: &GenerationReport) {
        self(report);
    }
}

/// Result of a finished run.
#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    /// Either [`EvolutionState::Converged`] or [`EvolutionState::Exhausted`].
    pub state: EvolutionState,
    /// Number of generations produced.
    pub generations: usize,
    /// Fittest individual of the last generation.
    pub best: Individual,
}

/// Drives the generation loop.
///
/// All randomness is drawn from the generator handed to [`Self::new`]; a seeded generator
/// makes the whole run reproducible.
#[derive(Debug, Clone)]
pub struct EvolutionEngine<R> {
    blocks: BlockSet,
    config: EvolutionConfig,
    target: Fitness,
    evolver: PopulationEvolver,
    population: Population,
    best: Individual,
    generation: usize,
    state: EvolutionState,
    rng: R,
}

impl<R> EvolutionEngine<R>
where
    R: Rng,
{
    /// Validates `config` and creates the initial population.
    pub fn new(blocks: BlockSet, config: EvolutionConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let target = config.resolve_target(&blocks);
        if target.score() as usize > blocks.max_streak() {
            log::warn!(
                "target fitness {target} exceeds the maximum reachable {} for {} blocks",
                blocks.max_streak(),
                blocks.len()
            );
        }

        let population = Population::random(&blocks, config.population_size, &mut rng);
        let best = population
            .best()
            .cloned()
            .expect("validated population is never empty");
        let evolver = config.evolver();
        Ok(Self {
            blocks,
            config,
            target,
            evolver,
            population,
            best,
            generation: 0,
            state: EvolutionState::Running,
            rng,
        })
    }

    #[must_use]
    pub fn blocks(&self) -> &BlockSet {
        &self.blocks
    }

    #[must_use]
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    #[must_use]
    pub fn target_fitness(&self) -> Fitness {
        self.target
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Returns the fittest individual of the current population.
    #[must_use]
    pub fn best(&self) -> &Individual {
        &self.best
    }

    /// Returns the number of generations produced so far.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn state(&self) -> EvolutionState {
        self.state
    }

    /// Produces one generation and reports it to `observer`.
    ///
    /// Does nothing once the engine is in a terminal state.
    pub fn step<O>(&mut self, observer: &mut O) -> EvolutionState
    where
        O: GenerationObserver + ?Sized,
    {
        if self.state.is_terminal() {
            return self.state;
        }

        self.population.rank();
        self.population = self.evolver.evolve(&self.population, &mut self.rng);

        self.best = self
            .population
            .best()
            .cloned()
            .expect("evolved population is never empty");
        let fitness_stats = self
            .population
            .compute_fitness_stats()
            .expect("evolved population is never empty");
        log::debug!(
            "generation {}: best {} (min {}, mean {:.3})",
            self.generation,
            self.best.fitness(),
            fitness_stats.min,
            fitness_stats.mean
        );
        observer.on_generation(&GenerationReport {
            generation: self.generation,
            best: self.best.clone(),
            fitness_stats,
        });
        self.generation += 1;

        if self.best.fitness() >= self.target {
            self.state = EvolutionState::Converged;
        } else if self.generation >= self.config.generations {
            self.state = EvolutionState::Exhausted;
        }
        if self.state.is_terminal() {
            log::info!(
                "{} after {} generations with fitness {}",
                self.state,
                self.generation,
                self.best.fitness()
            );
        }
        self.state
    }

    /// Steps until a terminal state is reached.
    pub fn run<O>(mut self, observer: &mut O) -> EvolutionOutcome
    where
        O: GenerationObserver + ?Sized,
    {
        while !self.step(&mut *observer).is_terminal() {}
        EvolutionOutcome {
            state: self.state,
            generations: self.generation,
            best: self.best,
        }
    }
}
