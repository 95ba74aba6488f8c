/// Traits for alignment tools
use crate::formats::tabular::TabularRecords;
use async_trait::async_trait;
use rxnfinder_core::RxnFinderResult;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One alignment job: candidate sequences searched against a proteome
#[derive(Debug, Clone)]
pub struct AlignmentRequest {
    /// Used for scratch directory names and log lines (usually the reaction id)
    pub label: String,
    /// Candidate gene sequences (alignment queries)
    pub query_fasta: PathBuf,
    /// Query-genome proteome (alignment subjects)
    pub subject_fasta: PathBuf,
}

impl AlignmentRequest {
    pub fn new(label: impl Into<String>, query_fasta: &Path, subject_fasta: &Path) -> Self {
        Self {
            label: label.into(),
            query_fasta: query_fasta.to_path_buf(),
            subject_fasta: subject_fasta.to_path_buf(),
        }
    }
}

/// Raw tabular output of an alignment run
#[derive(Debug)]
pub struct AlignmentOutput {
    source: OutputSource,
    // Keeps the scratch directory alive until the output has been read
    _scratch: Option<TempDir>,
}

#[derive(Debug)]
enum OutputSource {
    File(PathBuf),
    Text(String),
}

impl AlignmentOutput {
    /// Output written to a file; `scratch` is removed when this value drops
    pub fn from_file(path: PathBuf, scratch: Option<TempDir>) -> Self {
        Self {
            source: OutputSource::File(path),
            _scratch: scratch,
        }
    }

    /// Output already held in memory
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            source: OutputSource::Text(text.into()),
            _scratch: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            OutputSource::File(path) => Some(path),
            OutputSource::Text(_) => None,
        }
    }

    /// Stream the records row by row
    pub fn records(&self) -> RxnFinderResult<TabularRecords<Box<dyn BufRead + Send + '_>>> {
        let reader: Box<dyn BufRead + Send + '_> = match &self.source {
            OutputSource::File(path) => Box::new(BufReader::new(File::open(path)?)),
            OutputSource::Text(text) => Box::new(Cursor::new(text.as_bytes())),
        };
        Ok(TabularRecords::new(reader))
    }
}

/// Trait for pairwise alignment tools
#[async_trait]
pub trait Aligner: Send + Sync {
    /// Run one alignment job to completion
    async fn align(&self, request: &AlignmentRequest) -> RxnFinderResult<AlignmentOutput>;

    /// Get tool version
    async fn version(&self) -> RxnFinderResult<String>;

    /// Short tool name for logs
    fn name(&self) -> &str;
}
