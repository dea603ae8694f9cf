use chrono::{DateTime, Utc};
use oxiwall_engine::Arrangement;
use oxiwall_evaluator::Fitness;
use oxiwall_training::evolution::{EvolutionConfig, EvolutionState};
use serde::{Deserialize, Serialize};

/// Outcome of one `evolve` run as written to the output file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunResult {
    pub heights: Arrangement,
    pub fitness: Fitness,
    pub state: EvolutionState,
    pub generations: usize,
    pub seed: u64,
    pub config: EvolutionConfig,
    pub finished_at: DateTime<Utc>,
}
