//! Test fixtures and data generators

use rxnfinder_core::{CandidateGene, CandidateReaction, RxnGeneLink};
use rxnfinder_relation::{QueryResponse, TraversalResult};
use std::path::{Path, PathBuf};

/// One twelve-column tabular row with plausible statistics around `bit_score`
pub fn tabular_row(query: &str, target: &str, bit_score: f64) -> String {
    format!(
        "{}\t{}\t85.5\t250\t36\t2\t1\t250\t10\t259\t1e-40\t{}\n",
        query, target, bit_score
    )
}

/// Candidate gene with a sequence (empty `sequence` leaves it unalignable)
pub fn gene(key: &str, sequence: &str) -> CandidateGene {
    CandidateGene::new(key).with_sequence(sequence)
}

/// Single-row traversal payload: `reaction` linked through one complex to `genes`
pub fn traversal_response(reaction: &str, genes: &[CandidateGene]) -> QueryResponse {
    QueryResponse::with_results(vec![TraversalResult {
        rxns: vec![CandidateReaction {
            key: reaction.to_string(),
            name: None,
            structural_similarity: None,
            difference_similarity: None,
        }],
        rxn_gene_links: vec![RxnGeneLink {
            rxn_id: reaction.to_string(),
            complex_id: Some(format!("{}_complex", reaction)),
            gene_ids: genes.iter().map(|g| g.key.clone()).collect(),
        }],
        genes: genes.to_vec(),
        missing_genes: Vec::new(),
    }])
}

/// Write a small protein FASTA to stand in for a query-genome proteome
pub fn write_proteome(dir: &Path) -> PathBuf {
    let path = dir.join("query_genome.faa");
    std::fs::write(
        &path,
        ">qg_0001\nMKTAYIAKQRQISFVKSHFSRQ\n>qg_0002\nMSLEQKKGADIISKILQIQNS\n",
    )
    .expect("failed to write test proteome");
    path
}
