//! FASTA output for candidate gene sequences

use rxnfinder_core::{CandidateGene, RxnFinderError, RxnFinderResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Write every candidate that has a sequence as `>key\nsequence\n`.
///
/// Genes without a sequence are skipped. Returns the number of records written;
/// it is an error for none of the genes to have a sequence.
pub fn write_candidate_fasta(genes: &[CandidateGene], path: &Path) -> RxnFinderResult<usize> {
    let with_sequence: Vec<&CandidateGene> = genes.iter().filter(|g| g.has_sequence()).collect();
    if with_sequence.is_empty() {
        return Err(RxnFinderError::Alignment(format!(
            "none of the {} candidate genes has a sequence to write",
            genes.len()
        )));
    }

    let mut writer = BufWriter::new(File::create(path)?);
    for gene in &with_sequence {
        let sequence: String = gene
            .sequence
            .as_deref()
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        writeln!(writer, ">{}", gene.key)?;
        writeln!(writer, "{}", sequence)?;
    }
    writer.flush()?;

    debug!(
        "Wrote {} of {} candidate sequences to {}",
        with_sequence.len(),
        genes.len(),
        path.display()
    );
    Ok(with_sequence.len())
}
