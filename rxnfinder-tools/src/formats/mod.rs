pub mod fasta;
pub mod tabular;
