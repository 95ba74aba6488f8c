pub mod config;
pub mod find;
pub mod reduce;

use rxnfinder_core::{default_config_path, load_config, Config, RxnFinderResult};
use std::path::Path;
use tracing::debug;

/// Explicit config file, else the default location if present, else defaults
pub fn load_or_default(path: Option<&Path>) -> RxnFinderResult<Config> {
    match path {
        Some(path) => load_config(path),
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                debug!("Loading config from {}", default_path.display());
                load_config(&default_path)
            } else {
                Ok(Config::default())
            }
        }
    }
}
