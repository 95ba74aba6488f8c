//! BLAST+ blastp aligner implementation

use crate::traits::{Aligner, AlignmentOutput, AlignmentRequest};
use async_trait::async_trait;
use rxnfinder_core::config::AlignerConfig;
use rxnfinder_core::{rxnfinder_workspace_dir, RxnFinderError, RxnFinderResult};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// blastp integration
///
/// Candidate sequences are the queries, the query-genome proteome is passed as
/// `-subject`, and output is always `-outfmt 6`.
#[derive(Debug, Clone)]
pub struct BlastpAligner {
    binary_path: PathBuf,
    threads: usize,
    work_root: PathBuf,
    keep_temp_files: bool,
}

impl BlastpAligner {
    /// Create an aligner for an existing blastp binary
    pub fn new(binary_path: PathBuf) -> RxnFinderResult<Self> {
        if !binary_path.exists() {
            return Err(RxnFinderError::Alignment(format!(
                "blastp binary not found at {}",
                binary_path.display()
            )));
        }

        Ok(Self {
            binary_path,
            threads: 4,
            work_root: rxnfinder_workspace_dir().join("blastp"),
            keep_temp_files: false,
        })
    }

    /// Build from configuration, resolving bare binary names on PATH
    pub fn from_config(config: &AlignerConfig) -> RxnFinderResult<Self> {
        let configured = Path::new(&config.binary);
        let binary_path = if configured.components().count() > 1 || configured.is_absolute() {
            configured.to_path_buf()
        } else {
            which::which(&config.binary).map_err(|e| {
                RxnFinderError::Alignment(format!("{} not found on PATH: {}", config.binary, e))
            })?
        };

        Ok(Self::new(binary_path)?
            .with_threads(config.threads)
            .keep_temp_files(config.keep_temp_files))
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_work_root(mut self, root: PathBuf) -> Self {
        self.work_root = root;
        self
    }

    pub fn keep_temp_files(mut self, keep: bool) -> Self {
        self.keep_temp_files = keep;
        self
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    fn search_command(&self, request: &AlignmentRequest, output_path: &Path) -> Command {
        let mut cmd = Command::new(&self.binary_path);
        cmd.arg("-outfmt")
            .arg("6")
            .arg("-query")
            .arg(&request.query_fasta)
            .arg("-subject")
            .arg(&request.subject_fasta)
            .arg("-num_threads")
            .arg(self.threads.to_string())
            .arg("-out")
            .arg(output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A timed-out search is dropped by the caller; take the child down with it
            .kill_on_drop(true);
        cmd
    }

    /// Scratch directory for one search; removed on drop unless files are kept
    fn search_dir(&self, label: &str) -> RxnFinderResult<(PathBuf, Option<tempfile::TempDir>)> {
        std::fs::create_dir_all(&self.work_root)?;
        let scratch = tempfile::Builder::new()
            .prefix(&format!(
                "search_{}_{}_",
                sanitize_label(label),
                rxnfinder_core::generate_utc_timestamp()
            ))
            .tempdir_in(&self.work_root)?;

        if self.keep_temp_files {
            let dir = scratch.keep();
            debug!("Keeping blastp files for {} in {}", label, dir.display());
            Ok((dir, None))
        } else {
            Ok((scratch.path().to_path_buf(), Some(scratch)))
        }
    }
}

fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

#[async_trait]
impl Aligner for BlastpAligner {
    async fn align(&self, request: &AlignmentRequest) -> RxnFinderResult<AlignmentOutput> {
        let (search_dir, scratch) = self.search_dir(&request.label)?;
        let output_path = search_dir.join("alignments.m8");

        info!(
            "Running blastp for {}: {} vs {}",
            request.label,
            request.query_fasta.display(),
            request.subject_fasta.display()
        );

        let output = self
            .search_command(request, &output_path)
            .output()
            .await
            .map_err(|e| RxnFinderError::Alignment(format!("Failed to run blastp: {}", e)))?;

        // blastp can exit non-zero on warnings while still writing results
        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let written = std::fs::metadata(&output_path).map(|m| m.len()).unwrap_or(0);
            if written > 0 {
                warn!(
                    "blastp returned exit code {} but output file exists with {} bytes",
                    code, written
                );
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(RxnFinderError::Alignment(format!(
                    "blastp failed for {} with exit code {}: {}",
                    request.label,
                    code,
                    stderr.trim()
                )));
            }
        }

        // An empty result set still leaves a (possibly missing) output file
        if !output_path.exists() {
            std::fs::File::create(&output_path)?;
        }

        debug!("blastp output for {} at {}", request.label, output_path.display());
        Ok(AlignmentOutput::from_file(output_path, scratch))
    }

    async fn version(&self) -> RxnFinderResult<String> {
        let output = Command::new(&self.binary_path)
            .arg("-version")
            .output()
            .await
            .map_err(|e| RxnFinderError::Alignment(format!("Failed to run blastp: {}", e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .lines()
            .next()
            .map(|line| line.trim().to_string())
            .ok_or_else(|| RxnFinderError::Alignment("blastp -version printed nothing".to_string()))
    }

    fn name(&self) -> &str {
        "blastp"
    }
}
