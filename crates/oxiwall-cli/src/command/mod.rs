use std::path::PathBuf;

use clap::{Parser, Subcommand};
use oxiwall_engine::{BlockSet, Height};

use crate::util;

use self::{evolve::EvolveArg, score::ScoreArg};

mod evolve;
mod score;

/// Heights used when no blocks are given on the command line.
const DEFAULT_HEIGHTS: [Height; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Search for a well-shaped wall using a genetic algorithm
    Evolve(#[clap(flatten)] EvolveArg),
    /// Print the fitness of a given wall
    Score(#[clap(flatten)] ScoreArg),
}

/// Where the block heights of a run come from.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct BlocksArg {
    /// Block heights, comma separated
    #[arg(long, value_delimiter = ',', conflicts_with = "blocks")]
    heights: Vec<Height>,
    /// JSON file containing an array of block heights
    #[arg(long)]
    blocks: Option<PathBuf>,
}

impl BlocksArg {
    pub(crate) fn load(&self) -> anyhow::Result<BlockSet> {
        if let Some(path) = &self.blocks {
            return util::read_blocks_file(path);
        }
        let heights = if self.heights.is_empty() {
            DEFAULT_HEIGHTS.to_vec()
        } else {
            self.heights.clone()
        };
        Ok(BlockSet::new(heights)?)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Evolve(EvolveArg::default())) {
        Mode::Evolve(arg) => evolve::run(&arg)?,
        Mode::Score(arg) => score::run(&arg),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CommandArgs, clap::Error> {
        CommandArgs::try_parse_from(std::iter::once("oxiwall").chain(args.iter().copied()))
    }

    #[test]
    fn test_no_subcommand() {
        let args = parse(&[]).unwrap();
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_default_blocks() {
        let blocks = BlocksArg::default().load().unwrap();
        assert_eq!(blocks.sorted_heights(), &DEFAULT_HEIGHTS);
    }

    #[test]
    fn test_heights_are_comma_separated() {
        let args = parse(&["evolve", "--heights", "3,1,2,2"]).unwrap();
        let Some(Mode::Evolve(arg)) = args.mode else {
            panic!("expected evolve mode");
        };
        let blocks = arg.blocks.load().unwrap();
        assert_eq!(blocks.sorted_heights(), &[1, 2, 2, 3]);
    }

    #[test]
    fn test_single_height_rejected_on_load() {
        let args = parse(&["evolve", "--heights", "4"]).unwrap();
        let Some(Mode::Evolve(arg)) = args.mode else {
            panic!("expected evolve mode");
        };
        assert!(arg.blocks.load().is_err());
    }

    #[test]
    fn test_heights_and_blocks_conflict() {
        assert!(parse(&["evolve", "--heights", "1,2", "--blocks", "b.json"]).is_err());
    }

    #[test]
    fn test_score_requires_heights() {
        assert!(parse(&["score"]).is_err());
        assert!(parse(&["score", "--heights", "1,3,2"]).is_ok());
    }
}
