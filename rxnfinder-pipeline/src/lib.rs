//! Candidate gene ranking pipeline
//!
//! For each reaction in a batch: fetch candidate genes through the similarity
//! graph, align them against the query-genome proteome, and reduce the raw
//! hits to a ranked, deduplicated shortlist.

pub mod input;
pub mod orchestrator;
pub mod reducer;

pub use input::{normalize_reactions, ReactionInput};
pub use orchestrator::{BatchOrchestrator, SearchSettings};
pub use reducer::{HitAccumulator, HitReducer};
