use super::load_or_default;
use crate::cli::output;
use clap::Args;
use rxnfinder_core::{rxnfinder_home, Config, RxnFinderError};
use rxnfinder_pipeline::{normalize_reactions, BatchOrchestrator, ReactionInput};
use rxnfinder_relation::HttpRelationClient;
use rxnfinder_tools::{Aligner, BlastpAligner, LocalProteome, ProteomeSource};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub struct FindArgs {
    /// Query genome: a protein FASTA path, or a name under $RXNFINDER_HOME/genomes
    #[arg(short, long, value_name = "GENOME")]
    pub genome: String,

    /// Reaction id (repeatable)
    #[arg(short, long = "reaction", value_name = "ID")]
    pub reactions: Vec<String>,

    /// File of newline-separated reaction ids, appended after --reaction
    #[arg(short, long, value_name = "FILE")]
    pub bulk_file: Option<PathBuf>,

    /// Minimum structural similarity for related reactions (0-1)
    #[arg(long, value_name = "F")]
    pub structural_floor: Option<f64>,

    /// Minimum difference similarity for related reactions (0-1)
    #[arg(long, value_name = "F")]
    pub difference_floor: Option<f64>,

    /// Leave the query reaction itself out of the candidate set
    #[arg(long)]
    pub exclude_self: bool,

    /// Minimum bit score for a hit to be counted
    #[arg(long, value_name = "F")]
    pub score_floor: Option<f64>,

    /// Hits to report per reaction
    #[arg(long, value_name = "N")]
    pub hits: Option<usize>,

    /// Configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Write JSON results here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl FindArgs {
    fn apply(&self, config: &mut Config, threads: usize) {
        let search = &mut config.search;
        if let Some(v) = self.structural_floor {
            search.structural_similarity_floor = v;
        }
        if let Some(v) = self.difference_floor {
            search.difference_similarity_floor = v;
        }
        if self.exclude_self {
            search.exclude_self = true;
        }
        if let Some(v) = self.score_floor {
            search.blast_score_floor = v;
        }
        if let Some(v) = self.hits {
            search.number_of_hits_to_report = v;
        }
        if threads > 0 {
            config.aligner.threads = threads;
        }
    }
}

pub async fn run(args: FindArgs, threads: usize) -> anyhow::Result<()> {
    let mut config = load_or_default(args.config.as_deref())?;
    args.apply(&mut config, threads);
    config.validate()?;

    let bulk = match &args.bulk_file {
        Some(path) => Some(std::fs::read_to_string(path).map_err(|e| {
            RxnFinderError::Io(std::io::Error::new(
                e.kind(),
                format!("cannot read bulk file {}: {}", path.display(), e),
            ))
        })?),
        None => None,
    };
    let reactions = normalize_reactions(
        Some(ReactionInput::List(args.reactions.clone())),
        bulk.as_deref(),
    )?;

    let proteome = LocalProteome::new()
        .with_search_dir(rxnfinder_home().join("genomes"))
        .proteome_fasta(&args.genome)
        .await?;

    let client = HttpRelationClient::from_config(&config.relation_engine)?;
    let aligner = BlastpAligner::from_config(&config.aligner)?;
    match aligner.version().await {
        Ok(version) => info!("Using {} ({})", aligner.name(), version),
        Err(e) => warn!("Could not determine {} version: {}", aligner.name(), e),
    }
    let orchestrator = BatchOrchestrator::from_config(client, aligner, &config);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted: finishing reactions already in progress");
            on_signal.cancel();
        }
    });

    info!("Running {} reactions", reactions.len());
    let batch = orchestrator.run(&reactions, &proteome, &cancel).await?;

    output::write_json(&batch, args.output.as_deref())?;
    output::print_summary(&batch);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> FindArgs {
        FindArgs {
            genome: "g.faa".to_string(),
            reactions: vec![],
            bulk_file: None,
            structural_floor: Some(0.8),
            difference_floor: None,
            exclude_self: true,
            score_floor: Some(30.0),
            hits: Some(10),
            config: None,
            output: None,
        }
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let mut config = Config::default();
        args().apply(&mut config, 8);

        assert_eq!(config.search.structural_similarity_floor, 0.8);
        assert_eq!(config.search.difference_similarity_floor, 1.0);
        assert!(config.search.exclude_self);
        assert_eq!(config.search.blast_score_floor, 30.0);
        assert_eq!(config.search.number_of_hits_to_report, 10);
        assert_eq!(config.aligner.threads, 8);
    }

    #[test]
    fn test_zero_threads_keeps_config_value() {
        let mut config = Config::default();
        args().apply(&mut config, 0);
        assert_eq!(config.aligner.threads, 4);
    }
}
