//! Query-genome proteome resolution

use async_trait::async_trait;
use rxnfinder_core::{RxnFinderError, RxnFinderResult};
use std::path::{Path, PathBuf};
use tracing::debug;

const PROTEIN_FASTA_EXTENSIONS: &[&str] = &["faa", "fasta", "fa", "pep"];

/// Provides the translated protein sequences of a query genome as a FASTA file.
///
/// The file is passed to the aligner untouched; nothing here parses it.
#[async_trait]
pub trait ProteomeSource: Send + Sync {
    async fn proteome_fasta(&self, genome_ref: &str) -> RxnFinderResult<PathBuf>;
}

/// Resolves a genome reference to a protein FASTA already on disk.
///
/// A reference is either a path to the file, or a name looked up as
/// `<dir>/<name>.<ext>` in each search directory.
#[derive(Debug, Clone, Default)]
pub struct LocalProteome {
    search_dirs: Vec<PathBuf>,
}

impl LocalProteome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.push(dir.into());
        self
    }

    fn candidates(&self, genome_ref: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(genome_ref)];
        for dir in &self.search_dirs {
            paths.push(dir.join(genome_ref));
            for ext in PROTEIN_FASTA_EXTENSIONS {
                paths.push(dir.join(format!("{}.{}", genome_ref, ext)));
            }
        }
        paths
    }
}

fn is_usable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

#[async_trait]
impl ProteomeSource for LocalProteome {
    async fn proteome_fasta(&self, genome_ref: &str) -> RxnFinderResult<PathBuf> {
        let found = self.candidates(genome_ref).into_iter().find(|p| is_usable(p));
        match found {
            Some(path) => {
                debug!("Resolved proteome for {} to {}", genome_ref, path.display());
                Ok(path)
            }
            None => Err(RxnFinderError::InvalidBatchInput(format!(
                "no non-empty protein FASTA found for genome '{}'",
                genome_ref
            ))),
        }
    }
}
