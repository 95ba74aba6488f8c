//! Graph query service adapter

use crate::query::traversal_query;
use async_trait::async_trait;
use reqwest::Client;
use rxnfinder_core::config::RelationEngineConfig;
use rxnfinder_core::{
    CandidateGene, CandidateReaction, ReactionQuery, RxnFinderError, RxnFinderResult, RxnGeneLink,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Query text plus bind variables, sent as one JSON body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraversalRequest {
    pub query: String,
    pub rid: String,
    pub sf_sim: f64,
    pub df_sim: f64,
    /// Already encoded in the traversal depth of `query`; not a bind variable
    #[serde(skip_serializing)]
    pub exclude_self: bool,
}

impl TraversalRequest {
    pub fn for_query(query: &ReactionQuery) -> Self {
        Self {
            query: traversal_query(query.exclude_self()),
            rid: query.canonical_id(),
            sf_sim: query.structural_similarity_floor(),
            df_sim: query.difference_similarity_floor(),
            exclude_self: query.exclude_self(),
        }
    }
}

/// One row of traversal output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraversalResult {
    #[serde(default)]
    pub rxns: Vec<CandidateReaction>,
    #[serde(default)]
    pub rxn_gene_links: Vec<RxnGeneLink>,
    #[serde(default)]
    pub genes: Vec<CandidateGene>,
    #[serde(default)]
    pub missing_genes: Vec<String>,
}

/// Service response: either `results` or an `error` with optional `arango_message`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<TraversalResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arango_message: Option<String>,
}

impl QueryResponse {
    pub fn with_results(results: Vec<TraversalResult>) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    pub fn with_error(error: impl Into<String>, arango_message: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            error: Some(serde_json::Value::String(error.into())),
            arango_message: Some(arango_message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Results, or the reported query-execution error as `TransientUpstream`
    pub fn into_results(self) -> RxnFinderResult<Vec<TraversalResult>> {
        match self.error {
            Some(error) => {
                let code = match error {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                Err(RxnFinderError::TransientUpstream {
                    code,
                    message: self.arango_message.unwrap_or_default(),
                })
            }
            None => Ok(self.results),
        }
    }
}

/// Issues one traversal request and returns the parsed response
#[async_trait]
pub trait RelationClient: Send + Sync {
    async fn execute(&self, request: &TraversalRequest) -> RxnFinderResult<QueryResponse>;
}

#[async_trait]
impl<T: RelationClient + ?Sized> RelationClient for Arc<T> {
    async fn execute(&self, request: &TraversalRequest) -> RxnFinderResult<QueryResponse> {
        (**self).execute(request).await
    }
}

/// HTTP client for the relation engine query endpoint
pub struct HttpRelationClient {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HttpRelationClient {
    pub fn new(base_url: &str, endpoint: &str, timeout: Duration) -> RxnFinderResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            url: format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                endpoint.trim_start_matches('/')
            ),
            token: None,
        })
    }

    /// Build from configuration; the token is read from `token_env` if set
    pub fn from_config(config: &RelationEngineConfig) -> RxnFinderResult<Self> {
        let client = Self::new(
            &config.url,
            &config.endpoint,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        match std::env::var(&config.token_env) {
            Ok(token) if !token.trim().is_empty() => Ok(client.with_token(token)),
            _ => {
                warn!(
                    "{} is not set; querying the relation engine without a token",
                    config.token_env
                );
                Ok(client)
            }
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RelationClient for HttpRelationClient {
    async fn execute(&self, request: &TraversalRequest) -> RxnFinderResult<QueryResponse> {
        debug!("POST {} rid={}", self.url, request.rid);

        let mut builder = self.client.post(&self.url).json(request);
        if let Some(token) = &self.token {
            builder = builder.header(reqwest::header::AUTHORIZATION, token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        match (status.is_success(), serde_json::from_str::<QueryResponse>(&body)) {
            // An error payload is reported whatever the HTTP status
            (_, Ok(parsed)) if parsed.is_error() => Ok(parsed),
            (true, Ok(parsed)) => Ok(parsed),
            (true, Err(e)) => Err(RxnFinderError::Serialization(format!(
                "unparseable relation engine response: {}",
                e
            ))),
            (false, _) => Err(RxnFinderError::RequestRejected {
                status: status.as_u16(),
                body: truncate(&body, 500),
            }),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
