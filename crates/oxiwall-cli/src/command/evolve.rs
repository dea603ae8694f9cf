use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use oxiwall_training::evolution::{EvolutionConfig, EvolutionEngine, GenerationReport};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{schema::run_result::RunResult, util};

use super::BlocksArg;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct EvolveArg {
    #[clap(flatten)]
    pub(super) blocks: BlocksArg,
    /// Run configuration file (JSON); flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Individuals per generation (even)
    #[arg(long)]
    population_size: Option<usize>,
    /// Maximum number of generations
    #[arg(long)]
    generations: Option<usize>,
    /// Probability of a swap mutation per child
    #[arg(long)]
    mutation_rate: Option<f64>,
    /// Individuals drawn per tournament
    #[arg(long)]
    tournament_size: Option<usize>,
    /// Fitness that stops the search early (default: number of blocks - 2)
    #[arg(long)]
    target_fitness: Option<u32>,
    /// Random seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path for the run result
    #[arg(long)]
    output: Option<PathBuf>,
}

impl EvolveArg {
    fn build_config(&self) -> anyhow::Result<EvolutionConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => EvolutionConfig::default(),
        };
        if let Some(population_size) = self.population_size {
            config.population_size = population_size;
        }
        if let Some(generations) = self.generations {
            config.generations = generations;
        }
        if let Some(mutation_rate) = self.mutation_rate {
            config.mutation_rate = mutation_rate;
        }
        if let Some(tournament_size) = self.tournament_size {
            config.tournament_size = tournament_size;
        }
        if self.target_fitness.is_some() {
            config.target_fitness = self.target_fitness;
        }
        Ok(config)
    }
}

pub(crate) fn run(arg: &EvolveArg) -> anyhow::Result<()> {
    let blocks = arg.blocks.load()?;
    let config = arg.build_config()?;
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());

    log::info!(
        "Evolving {} blocks: population {}, {} generations, mutation rate {}, seed {seed}",
        blocks.len(),
        config.population_size,
        config.generations,
        config.mutation_rate,
    );

    let engine = EvolutionEngine::new(blocks, config.clone(), Pcg32::seed_from_u64(seed))
        .context("Invalid evolution configuration")?;
    let outcome = engine.run(&mut |report: &GenerationReport| {
        log::info!(
            "Generation: {}; Blocks: {} Best fitness: {}",
            report.generation,
            report.best.arrangement(),
            report.best_fitness()
        );
        log::debug!(
            "  Fitness min/mean/max: {} / {:.3} / {}",
            report.fitness_stats.min,
            report.fitness_stats.mean,
            report.fitness_stats.max
        );
    });

    eprintln!();
    eprintln!("Best wall configuration (heights):");
    eprintln!("  {}", outcome.best.arrangement());
    eprintln!("  Fitness: {}", outcome.best.fitness());
    eprintln!("  State: {} after {} generations", outcome.state, outcome.generations);

    let result = RunResult {
        heights: outcome.best.arrangement().clone(),
        fitness: outcome.best.fitness(),
        state: outcome.state,
        generations: outcome.generations,
        seed,
        config,
        finished_at: Utc::now(),
    };
    util::Output::save_json(&result, arg.output.clone())?;
    if let Some(path) = &arg.output {
        eprintln!("Result saved to {}", path.display());
    }

    Ok(())
}
