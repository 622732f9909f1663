use async_trait::async_trait;
use thiserror::Error;

use super::SubmissionPayload;

/// Failure reported by a [`SubmissionTransport`]. Always retryable: the
/// wizard keeps the user's input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("endpoint rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,
}

/// Delivers a completed quote request to whoever handles it.
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn send(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<(), TransportError>;
}
