//! Batch orchestration: retrieval, alignment and reduction per reaction

use crate::reducer::HitReducer;
use futures::stream::{self, StreamExt};
use rxnfinder_core::{
    rxnfinder_workspace_dir, BatchResult, Config, ReactionHits, ReactionQuery, RxnFinderError,
    RxnFinderResult,
};
use rxnfinder_relation::{CandidateRetriever, CandidateSet, RelationClient, RetryPolicy};
use rxnfinder_tools::{write_candidate_fasta, Aligner, AlignmentRequest};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Search parameters validated once at the batch boundary
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub structural_similarity_floor: f64,
    pub difference_similarity_floor: f64,
    pub exclude_self: bool,
    pub noise_floor: f64,
    pub top_n: usize,
    pub max_concurrent_reactions: usize,
    /// `None` disables the per-reaction alignment limit
    pub alignment_timeout: Option<Duration>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SearchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            structural_similarity_floor: config.search.structural_similarity_floor,
            difference_similarity_floor: config.search.difference_similarity_floor,
            exclude_self: config.search.exclude_self,
            noise_floor: config.search.blast_score_floor,
            top_n: config.search.number_of_hits_to_report,
            max_concurrent_reactions: config.performance.max_concurrent_reactions,
            alignment_timeout: config.aligner.timeout(),
        }
    }

    pub fn query(&self, reaction_id: &str) -> ReactionQuery {
        ReactionQuery::new(reaction_id)
            .with_floors(self.structural_similarity_floor, self.difference_similarity_floor)
            .excluding_self(self.exclude_self)
    }

    pub fn reducer(&self) -> HitReducer {
        HitReducer::new(self.noise_floor, self.top_n)
    }
}

/// Runs every reaction of a batch through retrieval, alignment and reduction.
///
/// Reactions are processed concurrently up to `max_concurrent_reactions`; the
/// result keeps input order. The first fatal error stops reactions that have
/// not started yet and fails the whole batch.
pub struct BatchOrchestrator<C, A> {
    retriever: CandidateRetriever<C>,
    aligner: A,
    settings: SearchSettings,
    work_root: PathBuf,
}

impl<C: RelationClient, A: Aligner> BatchOrchestrator<C, A> {
    pub fn new(client: C, aligner: A, settings: SearchSettings) -> Self {
        Self {
            retriever: CandidateRetriever::new(client),
            aligner,
            settings,
            work_root: rxnfinder_workspace_dir().join("candidates"),
        }
    }

    /// Build from a validated configuration
    pub fn from_config(client: C, aligner: A, config: &Config) -> Self {
        Self::new(client, aligner, SearchSettings::from_config(config))
            .with_retry_policy(RetryPolicy::from_config(&config.relation_engine))
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retriever = self.retriever.with_policy(policy);
        self
    }

    /// Directory for per-reaction candidate FASTA files
    pub fn with_work_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.work_root = root.into();
        self
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn retriever(&self) -> &CandidateRetriever<C> {
        &self.retriever
    }

    pub fn aligner(&self) -> &A {
        &self.aligner
    }

    /// Run a normalized reaction list against the query-genome proteome at `proteome`.
    ///
    /// Cancelling `cancel` skips reactions that have not started; in-flight ones finish.
    pub async fn run(
        &self,
        reactions: &[String],
        proteome: &Path,
        cancel: &CancellationToken,
    ) -> RxnFinderResult<BatchResult> {
        if reactions.is_empty() {
            return Err(RxnFinderError::InvalidBatchInput(
                "no reaction ids supplied".to_string(),
            ));
        }

        info!(
            "Searching {} reactions against {} ({} at a time)",
            reactions.len(),
            proteome.display(),
            self.settings.max_concurrent_reactions
        );

        // Fatal errors cancel this token without touching the caller's
        let batch_cancel = cancel.child_token();

        let results: Vec<Option<RxnFinderResult<ReactionHits>>> = stream::iter(reactions.iter())
            .map(|reaction_id| {
                let batch_cancel = &batch_cancel;
                async move {
                    if batch_cancel.is_cancelled() {
                        info!("Skipping {}: batch cancelled", reaction_id);
                        return None;
                    }
                    let result = self.run_reaction(reaction_id, proteome).await;
                    if let Err(e) = &result {
                        error!("Reaction {} failed: {}", reaction_id, e);
                        batch_cancel.cancel();
                    }
                    Some(result)
                }
            })
            .buffered(self.settings.max_concurrent_reactions.max(1))
            .collect()
            .await;

        let mut gene_hits = Vec::with_capacity(results.len());
        let mut skipped = false;
        for result in results {
            match result {
                Some(Ok(hits)) => gene_hits.push(hits),
                Some(Err(e)) => return Err(e),
                None => skipped = true,
            }
        }
        if skipped {
            return Err(RxnFinderError::Cancelled);
        }

        let batch = BatchResult::new(gene_hits);
        info!(
            "Batch complete: {} reactions, {} ranked hits",
            batch.len(),
            batch.total_hits()
        );
        Ok(batch)
    }

    async fn run_reaction(
        &self,
        reaction_id: &str,
        proteome: &Path,
    ) -> RxnFinderResult<ReactionHits> {
        let query = self.settings.query(reaction_id);
        let set = self.retriever.fetch(&query).await?;

        let genes = set.alignable_genes();
        if genes.is_empty() {
            info!("{}: no candidate genes with sequences", reaction_id);
            return Ok(with_candidates(ReactionHits::no_candidates(reaction_id), set, 0));
        }

        // The scratch dir lives until alignment has read the candidate FASTA
        let work_root = self.work_root.clone();
        let (_scratch, query_fasta, written) = tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&work_root)?;
            let scratch = tempfile::Builder::new()
                .prefix("rxn_")
                .tempdir_in(&work_root)?;
            let query_fasta = scratch.path().join("candidates.fasta");
            let written = write_candidate_fasta(&genes, &query_fasta)?;
            Ok::<_, RxnFinderError>((scratch, query_fasta, written))
        })
        .await
        .map_err(|e| RxnFinderError::Other(format!("candidate FASTA task failed: {}", e)))??;

        let request = AlignmentRequest::new(reaction_id, &query_fasta, proteome);
        let output = match self.settings.alignment_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.aligner.align(&request)).await {
                Ok(result) => result?,
                Err(_) => {
                    let timeout = RxnFinderError::AlignmentTimeout {
                        reaction_id: reaction_id.to_string(),
                        timeout: limit,
                    };
                    warn!("{}", timeout);
                    return Ok(with_candidates(
                        ReactionHits::timed_out(reaction_id, limit.as_secs()),
                        set,
                        written,
                    ));
                }
            },
            None => self.aligner.align(&request).await?,
        };

        let reducer = self.settings.reducer();
        let label = reaction_id.to_string();
        let ranked = tokio::task::spawn_blocking(move || reducer.reduce_output(&output, &label))
            .await
            .map_err(|e| RxnFinderError::Other(format!("reduction task failed: {}", e)))??;

        info!("{}: {} ranked hits", reaction_id, ranked.len());
        Ok(with_candidates(
            ReactionHits::ranked(reaction_id, ranked),
            set,
            written,
        ))
    }
}

fn with_candidates(hits: ReactionHits, set: CandidateSet, alignable: usize) -> ReactionHits {
    hits.with_candidates(set.candidate_reactions, alignable, set.missing_gene_ids)
}
