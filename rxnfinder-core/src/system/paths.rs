use std::path::PathBuf;
use std::sync::OnceLock;

// Cache the paths to avoid repeated environment lookups
static RXNFINDER_HOME: OnceLock<PathBuf> = OnceLock::new();
static RXNFINDER_WORKSPACE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Generate a UTC timestamp for scratch directory names
/// Returns format: YYYYMMDD_HHMMSS (in UTC timezone)
pub fn generate_utc_timestamp() -> String {
    chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Get the rxnfinder home directory
/// Checks RXNFINDER_HOME environment variable, falls back to ${HOME}/.rxnfinder
pub fn rxnfinder_home() -> PathBuf {
    RXNFINDER_HOME
        .get_or_init(|| {
            if let Ok(path) = std::env::var("RXNFINDER_HOME") {
                PathBuf::from(path)
            } else {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".rxnfinder")
            }
        })
        .clone()
}

/// Default location of the TOML configuration file
pub fn default_config_path() -> PathBuf {
    rxnfinder_home().join("config.toml")
}

/// Get the scratch directory used for candidate FASTA files and alignment output
/// Checks RXNFINDER_WORKSPACE_DIR, falls back to $TMPDIR/rxnfinder or /tmp/rxnfinder
pub fn rxnfinder_workspace_dir() -> PathBuf {
    RXNFINDER_WORKSPACE_DIR
        .get_or_init(|| {
            if let Ok(path) = std::env::var("RXNFINDER_WORKSPACE_DIR") {
                PathBuf::from(path)
            } else if let Ok(tmpdir) = std::env::var("TMPDIR") {
                PathBuf::from(tmpdir).join("rxnfinder")
            } else {
                PathBuf::from("/tmp/rxnfinder")
            }
        })
        .clone()
}
