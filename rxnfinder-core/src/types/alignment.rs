//! Alignment records and the ranked hits derived from them

use serde::{Deserialize, Serialize};

/// One row of tabular (outfmt 6) alignment output.
///
/// `query_gene` is the candidate gene used as the query; `target_gene` is the
/// query-genome gene that was hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentRecord {
    pub query_gene: String,
    pub target_gene: String,
    pub percent_identity: f64,
    pub alignment_length: u32,
    pub mismatches: u32,
    pub gap_opens: u32,
    pub query_start: u32,
    pub query_end: u32,
    pub subject_start: u32,
    pub subject_end: u32,
    pub e_value: f64,
    pub bit_score: f64,
}

impl AlignmentRecord {
    /// Record with only the fields that drive ranking filled in
    pub fn scored(
        query_gene: impl Into<String>,
        target_gene: impl Into<String>,
        bit_score: f64,
    ) -> Self {
        Self {
            query_gene: query_gene.into(),
            target_gene: target_gene.into(),
            percent_identity: 0.0,
            alignment_length: 0,
            mismatches: 0,
            gap_opens: 0,
            query_start: 0,
            query_end: 0,
            subject_start: 0,
            subject_end: 0,
            e_value: 0.0,
            bit_score,
        }
    }
}

/// Best alignment for one target gene, tagged with the reaction it was found for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedHit {
    pub reaction_id: String,
    #[serde(flatten)]
    pub record: AlignmentRecord,
    /// Post-floor records that named this target gene, including ones not reported
    pub total_hit_count: usize,
}

impl RankedHit {
    pub fn target_gene(&self) -> &str {
        &self.record.target_gene
    }

    pub fn bit_score(&self) -> f64 {
        self.record.bit_score
    }
}
