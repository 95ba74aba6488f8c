pub mod alignment;
pub mod batch;
pub mod reaction;

pub use alignment::{AlignmentRecord, RankedHit};
pub use batch::{BatchResult, ReactionHits, ReactionOutcome};
pub use reaction::{
    CandidateGene, CandidateReaction, ReactionQuery, RxnGeneLink, REACTION_VERTEX_PREFIX,
};
