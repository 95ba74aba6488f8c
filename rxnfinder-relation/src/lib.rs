//! Graph retrieval of candidate genes for a reaction
//!
//! A [`CandidateRetriever`] turns a [`ReactionQuery`](rxnfinder_core::ReactionQuery)
//! into the reactions, genes and sequences reachable through the
//! reaction-similarity graph. The graph service itself sits behind the
//! [`RelationClient`] trait; [`HttpRelationClient`] talks to it over HTTP.

pub mod client;
pub mod query;
pub mod retriever;
pub mod retry;

pub use client::{
    HttpRelationClient, QueryResponse, RelationClient, TraversalRequest, TraversalResult,
};
pub use query::traversal_query;
pub use retriever::{CandidateRetriever, CandidateSet};
pub use retry::{with_retry_async, RetryExhausted, RetryPolicy, Retried};
