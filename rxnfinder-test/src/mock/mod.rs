//! Mock implementations for testing

mod aligner;
mod relation;

pub use aligner::MockAligner;
pub use relation::ScriptedRelationClient;
