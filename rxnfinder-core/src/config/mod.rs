//! Configuration types for rxnfinder

use crate::RxnFinderError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub relation_engine: RelationEngineConfig,
    #[serde(default)]
    pub aligner: AlignerConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
}

/// Thresholds applied to every reaction in a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_similarity_floor")]
    pub structural_similarity_floor: f64,
    #[serde(default = "default_similarity_floor")]
    pub difference_similarity_floor: f64,
    #[serde(default)]
    pub exclude_self: bool,
    /// Bit score noise floor; alignment records below it are discarded
    #[serde(default = "default_blast_score_floor")]
    pub blast_score_floor: f64,
    #[serde(default = "default_number_of_hits_to_report")]
    pub number_of_hits_to_report: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationEngineConfig {
    #[serde(default = "default_relation_engine_url")]
    pub url: String,
    #[serde(default = "default_relation_engine_endpoint")]
    pub endpoint: String,
    /// Environment variable holding the Authorization token
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignerConfig {
    /// blastp binary; bare names are resolved on PATH
    #[serde(default = "default_aligner_binary")]
    pub binary: String,
    #[serde(default = "default_aligner_threads")]
    pub threads: usize,
    /// Per-reaction alignment timeout in seconds (0 = no timeout)
    #[serde(default = "default_aligner_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub keep_temp_files: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    #[serde(default = "default_max_concurrent_reactions")]
    pub max_concurrent_reactions: usize,
}

// Default value functions
fn default_similarity_floor() -> f64 { 1.0 }
fn default_blast_score_floor() -> f64 { 50.0 }
fn default_number_of_hits_to_report() -> usize { 5 }
fn default_relation_engine_url() -> String {
    "https://kbase.us/services/relation_engine_api".to_string()
}
fn default_relation_engine_endpoint() -> String { "/api/v1/query_results".to_string() }
fn default_token_env() -> String { "KB_AUTH_TOKEN".to_string() }
fn default_request_timeout_secs() -> u64 { 300 }
fn default_max_retries() -> u32 { 2 }
fn default_retry_backoff_ms() -> u64 { 500 }
fn default_aligner_binary() -> String { "blastp".to_string() }
fn default_aligner_threads() -> usize { 4 }
fn default_aligner_timeout_secs() -> u64 { 1800 }
fn default_max_concurrent_reactions() -> usize { 2 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            structural_similarity_floor: default_similarity_floor(),
            difference_similarity_floor: default_similarity_floor(),
            exclude_self: false,
            blast_score_floor: default_blast_score_floor(),
            number_of_hits_to_report: default_number_of_hits_to_report(),
        }
    }
}

impl Default for RelationEngineConfig {
    fn default() -> Self {
        Self {
            url: default_relation_engine_url(),
            endpoint: default_relation_engine_endpoint(),
            token_env: default_token_env(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            binary: default_aligner_binary(),
            threads: default_aligner_threads(),
            timeout_secs: default_aligner_timeout_secs(),
            keep_temp_files: false,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            max_concurrent_reactions: default_max_concurrent_reactions(),
        }
    }
}

impl AlignerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Config {
    /// Check every value once, before any retrieval work starts.
    pub fn validate(&self) -> Result<(), RxnFinderError> {
        let search = &self.search;
        for (name, value) in [
            ("structural_similarity_floor", search.structural_similarity_floor),
            ("difference_similarity_floor", search.difference_similarity_floor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(RxnFinderError::Configuration(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        if !search.blast_score_floor.is_finite() || search.blast_score_floor < 0.0 {
            return Err(RxnFinderError::Configuration(format!(
                "blast_score_floor must be a non-negative number, got {}",
                search.blast_score_floor
            )));
        }
        if search.number_of_hits_to_report == 0 {
            return Err(RxnFinderError::Configuration(
                "number_of_hits_to_report must be at least 1".to_string(),
            ));
        }
        if self.relation_engine.url.trim().is_empty() {
            return Err(RxnFinderError::Configuration(
                "relation_engine.url must not be empty".to_string(),
            ));
        }
        if self.aligner.threads == 0 {
            return Err(RxnFinderError::Configuration(
                "aligner.threads must be at least 1".to_string(),
            ));
        }
        if self.performance.max_concurrent_reactions == 0 {
            return Err(RxnFinderError::Configuration(
                "performance.max_concurrent_reactions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, RxnFinderError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| RxnFinderError::Configuration(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), RxnFinderError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| RxnFinderError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.search.structural_similarity_floor, 1.0);
        assert_eq!(config.search.difference_similarity_floor, 1.0);
        assert!(!config.search.exclude_self);
        assert_eq!(config.search.blast_score_floor, 50.0);
        assert_eq!(config.search.number_of_hits_to_report, 5);

        assert_eq!(config.relation_engine.max_retries, 2);
        assert_eq!(config.relation_engine.token_env, "KB_AUTH_TOKEN");

        assert_eq!(config.aligner.binary, "blastp");
        assert_eq!(config.aligner.threads, 4);
        assert_eq!(config.aligner.timeout(), Some(Duration::from_secs(1800)));

        assert_eq!(config.performance.max_concurrent_reactions, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_config() {
        let toml_content = r#"
[search]
structural_similarity_floor = 0.8
number_of_hits_to_report = 10

[aligner]
timeout_secs = 0
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", toml_content).unwrap();

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.search.structural_similarity_floor, 0.8);
        assert_eq!(config.search.number_of_hits_to_report, 10);
        assert_eq!(config.aligner.timeout(), None);

        // Unspecified values fall back to defaults
        assert_eq!(config.search.difference_similarity_floor, 1.0);
        assert_eq!(config.search.blast_score_floor, 50.0);
        assert_eq!(config.relation_engine.max_retries, 2);
        assert_eq!(config.performance.max_concurrent_reactions, 2);
    }

    #[test]
    fn test_load_invalid_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "this is not valid TOML {{").unwrap();

        match load_config(temp_file.path()).unwrap_err() {
            RxnFinderError::Configuration(msg) => assert!(msg.contains("Failed to parse config")),
            _ => panic!("Expected Configuration error"),
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        match load_config("/nonexistent/path/to/config.toml").unwrap_err() {
            RxnFinderError::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = Config::default();
        config.search.exclude_self = true;
        config.search.blast_score_floor = 75.5;
        config.relation_engine.url = "http://localhost:5000".to_string();

        let temp_file = NamedTempFile::new().unwrap();
        save_config(temp_file.path(), &config).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert!(loaded.search.exclude_self);
        assert_eq!(loaded.search.blast_score_floor, 75.5);
        assert_eq!(loaded.relation_engine.url, "http://localhost:5000");
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let mut config = Config::default();
        config.search.structural_similarity_floor = 1.5;
        assert!(matches!(config.validate(), Err(RxnFinderError::Configuration(_))));

        let mut config = Config::default();
        config.search.difference_similarity_floor = -0.1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.search.blast_score_floor = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.search.number_of_hits_to_report = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.performance.max_concurrent_reactions = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.aligner.threads = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.relation_engine.url = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
