//! Per-reaction results and the batch that collects them

use super::{CandidateReaction, RankedHit};
use serde::{Deserialize, Serialize};

/// How a reaction's search ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReactionOutcome {
    /// Alignment ran and the reducer produced a (possibly empty) ranking
    Ranked,
    /// The traversal found no gene with a usable sequence
    NoCandidates,
    /// Retrieval succeeded but the alignment exceeded its time limit
    AlignmentTimedOut { timeout_secs: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionHits {
    pub reaction_id: String,
    pub outcome: ReactionOutcome,
    pub ranked_hits: Vec<RankedHit>,
    #[serde(default)]
    pub candidate_reactions: Vec<CandidateReaction>,
    #[serde(default)]
    pub candidate_gene_count: usize,
    #[serde(default)]
    pub missing_gene_ids: Vec<String>,
}

impl ReactionHits {
    pub fn no_candidates(reaction_id: impl Into<String>) -> Self {
        Self {
            reaction_id: reaction_id.into(),
            outcome: ReactionOutcome::NoCandidates,
            ranked_hits: Vec::new(),
            candidate_reactions: Vec::new(),
            candidate_gene_count: 0,
            missing_gene_ids: Vec::new(),
        }
    }

    pub fn ranked(reaction_id: impl Into<String>, ranked_hits: Vec<RankedHit>) -> Self {
        Self {
            outcome: ReactionOutcome::Ranked,
            ranked_hits,
            ..Self::no_candidates(reaction_id)
        }
    }

    pub fn timed_out(reaction_id: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            outcome: ReactionOutcome::AlignmentTimedOut { timeout_secs },
            ..Self::no_candidates(reaction_id)
        }
    }

    pub fn with_candidates(
        mut self,
        reactions: Vec<CandidateReaction>,
        gene_count: usize,
        missing_gene_ids: Vec<String>,
    ) -> Self {
        self.candidate_reactions = reactions;
        self.candidate_gene_count = gene_count;
        self.missing_gene_ids = missing_gene_ids;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ranked_hits.is_empty()
    }
}

/// One entry per input reaction, in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub gene_hits: Vec<ReactionHits>,
}

impl BatchResult {
    pub fn new(gene_hits: Vec<ReactionHits>) -> Self {
        Self { gene_hits }
    }

    pub fn len(&self) -> usize {
        self.gene_hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gene_hits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReactionHits> {
        self.gene_hits.iter()
    }

    /// First entry for the given reaction id
    pub fn get(&self, reaction_id: &str) -> Option<&ReactionHits> {
        self.gene_hits.iter().find(|h| h.reaction_id == reaction_id)
    }

    /// `(reaction_id, ranked_hits)` pairs, the shape downstream reports consume
    pub fn pairs(&self) -> Vec<(&str, &[RankedHit])> {
        self.gene_hits
            .iter()
            .map(|h| (h.reaction_id.as_str(), h.ranked_hits.as_slice()))
            .collect()
    }

    pub fn total_hits(&self) -> usize {
        self.gene_hits.iter().map(|h| h.ranked_hits.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AlignmentRecord;

    fn hit(reaction: &str, gene: &str, score: f64) -> RankedHit {
        RankedHit {
            reaction_id: reaction.to_string(),
            record: AlignmentRecord::scored("q", gene, score),
            total_hit_count: 1,
        }
    }

    #[test]
    fn test_pairs_preserve_order() {
        let batch = BatchResult::new(vec![
            ReactionHits::no_candidates("r1"),
            ReactionHits::ranked("r2", vec![hit("r2", "A", 90.0)]),
        ]);

        let pairs = batch.pairs();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0, "r1");
        assert!(pairs[0].1.is_empty());
        assert_eq!(pairs[1].0, "r2");
        assert_eq!(pairs[1].1[0].target_gene(), "A");
        assert_eq!(batch.total_hits(), 1);
    }

    #[test]
    fn test_outcome_serialization() {
        let timed_out = ReactionHits::timed_out("r9", 30);
        let json = serde_json::to_value(&timed_out).unwrap();
        assert_eq!(json["outcome"]["status"], "alignment_timed_out");
        assert_eq!(json["outcome"]["timeout_secs"], 30);

        let ranked = ReactionHits::ranked("r1", vec![hit("r1", "B", 61.0)]);
        let json = serde_json::to_value(&ranked).unwrap();
        // flattened record fields sit beside reaction_id
        assert_eq!(json["ranked_hits"][0]["target_gene"], "B");
        assert_eq!(json["ranked_hits"][0]["reaction_id"], "r1");
        assert_eq!(json["ranked_hits"][0]["total_hit_count"], 1);
    }

    #[test]
    fn test_get_by_reaction() {
        let batch = BatchResult::new(vec![ReactionHits::no_candidates("r1")]);
        assert!(batch.get("r1").is_some());
        assert!(batch.get("r2").is_none());
    }
}
