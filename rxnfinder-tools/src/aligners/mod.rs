//! Alignment tool implementations

pub mod blastp;

pub use blastp::BlastpAligner;
