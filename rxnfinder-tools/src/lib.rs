//! External tool integration for rxnfinder
//!
//! Wraps the pairwise alignment tool (BLAST+ `blastp`), parses its tabular
//! output, writes candidate sequences as FASTA, and resolves query-genome
//! proteomes.

pub mod aligners;
pub mod formats;
pub mod proteome;
pub mod traits;

pub use aligners::BlastpAligner;
pub use formats::fasta::write_candidate_fasta;
pub use formats::tabular::{parse_tabular_line, SkipMalformed, TabularRecords, TABULAR_COLUMNS};
pub use proteome::{LocalProteome, ProteomeSource};
pub use traits::{Aligner, AlignmentOutput, AlignmentRequest};
