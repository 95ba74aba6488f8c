pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rxnfinder",
    version,
    about = "Find genes in a genome for biochemical reactions",
    long_about = "rxnfinder collects candidate genes for each reaction by walking a \
                  reaction-similarity graph, aligns them against a query genome's proteome \
                  with blastp, and reports a ranked, deduplicated shortlist per reaction."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads to use (0 = all available)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    pub threads: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a genome for genes catalysing the given reactions
    Find(commands::find::FindArgs),

    /// Rank an existing tabular alignment file
    Reduce(commands::reduce::ReduceArgs),

    /// Write or print the configuration file
    Config(commands::config::ConfigArgs),
}
