use super::load_or_default;
use crate::cli::output;
use clap::Args;
use rxnfinder_core::{BatchResult, ReactionHits, RxnFinderError};
use rxnfinder_pipeline::HitReducer;
use rxnfinder_tools::AlignmentOutput;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ReduceArgs {
    /// Tabular (outfmt 6) alignment file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Reaction id to tag the hits with
    #[arg(short, long, default_value = "reaction")]
    pub reaction_id: String,

    /// Minimum bit score for a hit to be counted
    #[arg(long, value_name = "F")]
    pub score_floor: Option<f64>,

    /// Hits to report
    #[arg(long, value_name = "N")]
    pub hits: Option<usize>,

    /// Configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Write JSON results here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: ReduceArgs) -> anyhow::Result<()> {
    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(v) = args.score_floor {
        config.search.blast_score_floor = v;
    }
    if let Some(v) = args.hits {
        config.search.number_of_hits_to_report = v;
    }
    config.validate()?;

    if !args.input.is_file() {
        return Err(RxnFinderError::InvalidBatchInput(format!(
            "alignment file {} does not exist",
            args.input.display()
        ))
        .into());
    }

    let reducer = HitReducer::from_config(&config.search);
    let alignments = AlignmentOutput::from_file(args.input.clone(), None);
    let ranked = reducer.reduce_output(&alignments, &args.reaction_id)?;

    let batch = BatchResult::new(vec![ReactionHits::ranked(&args.reaction_id, ranked)]);
    output::write_json(&batch, args.output.as_deref())?;
    output::print_summary(&batch);
    Ok(())
}
