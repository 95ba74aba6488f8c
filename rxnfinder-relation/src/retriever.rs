//! Candidate gene retrieval for one reaction

use crate::client::{RelationClient, TraversalRequest, TraversalResult};
use crate::retry::{with_retry_async, RetryPolicy};
use indexmap::{IndexMap, IndexSet};
use rxnfinder_core::{
    CandidateGene, CandidateReaction, ReactionQuery, RxnFinderError, RxnFinderResult,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Normalized traversal output for one reaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateSet {
    /// Reaction id as given by the caller
    pub reaction_id: String,
    pub candidate_reactions: Vec<CandidateReaction>,
    /// Every resolved gene, including ones without a sequence
    pub candidate_genes: Vec<CandidateGene>,
    /// Gene ids referenced by the traversal that could not be used for alignment
    pub missing_gene_ids: Vec<String>,
    /// Retries spent before the successful attempt
    pub retries: u32,
}

impl CandidateSet {
    pub fn empty(reaction_id: impl Into<String>) -> Self {
        Self {
            reaction_id: reaction_id.into(),
            ..Self::default()
        }
    }

    /// Genes that can be used as alignment queries
    pub fn alignable_genes(&self) -> Vec<CandidateGene> {
        self.candidate_genes
            .iter()
            .filter(|g| g.has_sequence())
            .cloned()
            .collect()
    }

    pub fn alignable_count(&self) -> usize {
        self.candidate_genes.iter().filter(|g| g.has_sequence()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.alignable_count() == 0
    }
}

/// Issues the similarity traversal for a reaction and normalizes the result.
///
/// Each `fetch` is independent; the retriever keeps no state between calls.
pub struct CandidateRetriever<C> {
    client: C,
    policy: RetryPolicy,
}

impl<C: RelationClient> CandidateRetriever<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch candidate reactions and genes for `query`.
    ///
    /// Transient upstream errors are retried within the policy budget; anything
    /// left over is returned as `FatalRetrieval`.
    pub async fn fetch(&self, query: &ReactionQuery) -> RxnFinderResult<CandidateSet> {
        let request = TraversalRequest::for_query(query);
        let max_attempts = self.policy.max_attempts();

        let outcome = with_retry_async(
            |attempt| {
                let request = &request;
                async move {
                    info!(
                        "Querying candidates for {} (attempt {}/{})",
                        request.rid,
                        attempt + 1,
                        max_attempts
                    );
                    self.client.execute(request).await?.into_results()
                }
            },
            &self.policy,
            &request.rid,
        )
        .await;

        let retried = outcome.map_err(|exhausted| {
            let (code, message) = exhausted.error.code_and_message();
            RxnFinderError::FatalRetrieval {
                reaction_id: request.rid.clone(),
                code,
                message,
                attempts: exhausted.attempts,
            }
        })?;

        let mut set = normalize(query.reaction_id(), retried.value);
        set.retries = retried.retries;

        info!(
            "{}: {} candidate reactions, {} genes ({} alignable), {} missing",
            request.rid,
            set.candidate_reactions.len(),
            set.candidate_genes.len(),
            set.alignable_count(),
            set.missing_gene_ids.len()
        );
        Ok(set)
    }
}

/// Merge traversal rows into one candidate set.
///
/// Reactions and genes are deduplicated by key in first-seen order. Missing ids
/// are the service's own list, plus ids named by a reaction-complex link but
/// never resolved, plus resolved genes with no sequence.
fn normalize(reaction_id: &str, rows: Vec<TraversalResult>) -> CandidateSet {
    let mut reactions: IndexMap<String, CandidateReaction> = IndexMap::new();
    let mut genes: IndexMap<String, CandidateGene> = IndexMap::new();
    let mut linked: IndexSet<String> = IndexSet::new();
    let mut reported_missing: IndexSet<String> = IndexSet::new();

    for row in rows {
        for rxn in row.rxns {
            reactions.entry(rxn.key.clone()).or_insert(rxn);
        }
        for link in row.rxn_gene_links {
            linked.extend(link.gene_ids);
        }
        for gene in row.genes {
            genes.entry(gene.key.clone()).or_insert(gene);
        }
        reported_missing.extend(row.missing_genes);
    }

    if reactions.is_empty() {
        return CandidateSet::empty(reaction_id);
    }

    let mut missing = reported_missing;
    for id in &linked {
        if !genes.contains_key(id) {
            missing.insert(id.clone());
        }
    }
    for gene in genes.values() {
        if !gene.has_sequence() {
            missing.insert(gene.key.clone());
        }
    }

    CandidateSet {
        reaction_id: reaction_id.to_string(),
        candidate_reactions: reactions.into_values().collect(),
        candidate_genes: genes.into_values().collect(),
        missing_gene_ids: missing.into_iter().collect(),
        retries: 0,
    }
}
