//! Core types shared across the rxnfinder crates
//!
//! Holds the data model that flows between graph retrieval, alignment and
//! ranking, the workspace error type, and the TOML configuration.

pub mod config;
pub mod error;
pub mod system;
pub mod types;

pub use config::{load_config, save_config, Config};
pub use error::{RxnFinderError, RxnFinderResult};

pub use types::{
    AlignmentRecord, BatchResult, CandidateGene, CandidateReaction, RankedHit, ReactionHits,
    ReactionOutcome, ReactionQuery, RxnGeneLink, REACTION_VERTEX_PREFIX,
};

pub use system::{
    default_config_path, generate_utc_timestamp, rxnfinder_home, rxnfinder_workspace_dir,
};
