use async_trait::async_trait;
use thiserror::Error;

use crate::domain::claim::{ClaimReceipt, ClaimRequest};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubmitError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Transaction rejected: {0}")]
    Rejected(String),
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

impl SubmitError {
    /// Whether trying the same claim again may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, SubmitError::Network(_))
    }
}

/// Submits a reward claim and waits for it to settle
#[async_trait]
pub trait ClaimSubmitter: Send + Sync {
    async fn submit_claim(&self, request: &ClaimRequest) -> Result<ClaimReceipt, SubmitError>;
}
