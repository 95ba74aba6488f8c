//! Scripted graph query service

use async_trait::async_trait;
use rxnfinder_core::{RxnFinderError, RxnFinderResult, REACTION_VERTEX_PREFIX};
use rxnfinder_relation::{QueryResponse, RelationClient, TraversalRequest};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct Script {
    queued: VecDeque<RxnFinderResult<QueryResponse>>,
    fallback: Option<QueryResponse>,
    delay: Option<Duration>,
}

/// Relation client answering from per-reaction scripts.
///
/// Each reaction has a queue of responses consumed one per request, and an
/// optional fallback returned once the queue is empty. Reactions are keyed by
/// their bare id; requests arrive canonicalized and are matched either way.
#[derive(Default)]
pub struct ScriptedRelationClient {
    scripts: Mutex<HashMap<String, Script>>,
    requests: Mutex<Vec<TraversalRequest>>,
}

fn bare(rid: &str) -> &str {
    rid.strip_prefix(REACTION_VERTEX_PREFIX).unwrap_or(rid)
}

impl ScriptedRelationClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn update(self, reaction_id: &str, f: impl FnOnce(&mut Script)) -> Self {
        {
            let mut scripts = self.scripts.lock().unwrap();
            f(scripts.entry(bare(reaction_id).to_string()).or_default());
        }
        self
    }

    /// Always answer `response` for this reaction
    pub fn respond(self, reaction_id: &str, response: QueryResponse) -> Self {
        self.update(reaction_id, |s| s.fallback = Some(response))
    }

    /// Answer `response` once, before any fallback
    pub fn respond_once(self, reaction_id: &str, response: QueryResponse) -> Self {
        self.update(reaction_id, |s| s.queued.push_back(Ok(response)))
    }

    /// Fail once with `error`, before any fallback
    pub fn fail_once(self, reaction_id: &str, error: RxnFinderError) -> Self {
        self.update(reaction_id, |s| s.queued.push_back(Err(error)))
    }

    /// Sleep before answering requests for this reaction
    pub fn with_delay(self, reaction_id: &str, delay: Duration) -> Self {
        self.update(reaction_id, |s| s.delay = Some(delay))
    }

    /// Requests seen so far, in arrival order
    pub fn requests(&self) -> Vec<TraversalRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn calls_for(&self, reaction_id: &str) -> usize {
        let key = bare(reaction_id);
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| bare(&r.rid) == key)
            .count()
    }
}

#[async_trait]
impl RelationClient for ScriptedRelationClient {
    async fn execute(&self, request: &TraversalRequest) -> RxnFinderResult<QueryResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let key = bare(&request.rid).to_string();

        let (next, delay) = {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(&key) {
                Some(script) => {
                    let next = script
                        .queued
                        .pop_front()
                        .or_else(|| script.fallback.clone().map(Ok));
                    (next, script.delay)
                }
                None => (None, None),
            }
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        next.unwrap_or_else(|| {
            Err(RxnFinderError::RequestRejected {
                status: 404,
                body: format!("no scripted response for {}", key),
            })
        })
    }
}
