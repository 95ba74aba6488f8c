//! Test utilities for the rxnfinder workspace
//!
//! Scripted stand-ins for the graph query service and the alignment tool,
//! plus small fixtures for building traversal payloads and tabular rows.

pub mod fixtures;
pub mod mock;

pub use fixtures::{gene, tabular_row, traversal_response, write_proteome};
pub use mock::{MockAligner, ScriptedRelationClient};

/// Initialize test logging (call once per test module)
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
