use oxiwall_engine::{Arrangement, Height};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScoreArg {
    /// Wall heights from left to right, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    heights: Vec<Height>,
}

pub(crate) fn run(arg: &ScoreArg) {
    let wall = Arrangement::new(arg.heights.clone());
    let fitness = oxiwall_evaluator::fitness(&wall);
    let max = wall.len().saturating_sub(2);
    println!("{fitness}");
    eprintln!("Wall: {wall}");
    eprintln!("Fitness: {fitness} (max {max})");
}
