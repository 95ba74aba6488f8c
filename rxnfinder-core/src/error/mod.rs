//! Core error types for rxnfinder

use std::time::Duration;
use thiserror::Error;

/// Main error type for rxnfinder operations
#[derive(Error, Debug)]
pub enum RxnFinderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid batch input: {0}")]
    InvalidBatchInput(String),

    /// The graph service reported a query-execution error. Retried.
    #[error("Upstream query error {code}: {message}")]
    TransientUpstream { code: String, message: String },

    /// Retrieval gave up after exhausting the retry budget (or hit a non-retryable failure).
    #[error("Retrieval failed for {reaction_id} after {attempts} attempt(s): {code}: {message}")]
    FatalRetrieval {
        reaction_id: String,
        code: String,
        message: String,
        attempts: u32,
    },

    /// The graph service refused the request outright (bad request, auth, not found).
    #[error("Request rejected with HTTP {status}: {body}")]
    RequestRejected { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Alignment error: {0}")]
    Alignment(String),

    #[error("Alignment for {reaction_id} timed out after {timeout:?}")]
    AlignmentTimeout {
        reaction_id: String,
        timeout: Duration,
    },

    #[error("Malformed alignment record at line {line}: {reason}")]
    MalformedAlignmentRecord { line: usize, reason: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias for rxnfinder operations
pub type RxnFinderResult<T> = Result<T, RxnFinderError>;

impl RxnFinderError {
    /// Whether the error should trigger another attempt of the same request.
    pub fn is_transient(&self) -> bool {
        match self {
            RxnFinderError::TransientUpstream { .. } => true,
            RxnFinderError::Network(msg) => {
                let msg = msg.to_lowercase();
                ["connection", "timed out", "timeout", "reset", "broken pipe"]
                    .iter()
                    .any(|pattern| msg.contains(pattern))
            }
            _ => false,
        }
    }

    /// Short code and message pair used when escalating to `FatalRetrieval`.
    pub fn code_and_message(&self) -> (String, String) {
        match self {
            RxnFinderError::TransientUpstream { code, message } => (code.clone(), message.clone()),
            RxnFinderError::RequestRejected { status, body } => {
                (format!("HTTP {}", status), body.clone())
            }
            RxnFinderError::Network(msg) => ("network".to_string(), msg.clone()),
            RxnFinderError::Serialization(msg) => ("malformed_response".to_string(), msg.clone()),
            other => ("error".to_string(), other.to_string()),
        }
    }
}

impl From<serde_json::Error> for RxnFinderError {
    fn from(err: serde_json::Error) -> Self {
        RxnFinderError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for RxnFinderError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timeout"
        } else if err.is_connect() {
            "connection failed"
        } else if err.is_decode() {
            return RxnFinderError::Serialization(err.to_string());
        } else {
            "request failed"
        };
        RxnFinderError::Network(format!("{}: {}", kind, err))
    }
}

impl From<anyhow::Error> for RxnFinderError {
    fn from(err: anyhow::Error) -> Self {
        RxnFinderError::Other(err.to_string())
    }
}
