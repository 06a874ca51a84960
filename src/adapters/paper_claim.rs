//! Paper Claim Submitter
//!
//! Simulates claim settlement without touching a network: waits a fixed
//! latency, then succeeds with a configurable probability and a random
//! base58 transaction signature.

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::time::Duration;

use crate::domain::claim::{ClaimReceipt, ClaimRequest};
use crate::ports::claim::{ClaimSubmitter, SubmitError};

/// Default simulated settlement latency
pub const DEFAULT_LATENCY_MS: u64 = 2_200;

/// Signature bytes, as for an ed25519 signature
const SIGNATURE_LEN: usize = 64;

#[derive(Debug, Clone)]
pub struct PaperClaimSubmitter {
    latency: Duration,
    success_probability: f64,
}

impl Default for PaperClaimSubmitter {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
            success_probability: 1.0,
        }
    }
}

impl PaperClaimSubmitter {
    /// `success_probability` is clamped to [0, 1]; NaN counts as 0
    pub fn new(latency: Duration, success_probability: f64) -> Self {
        let success_probability = if success_probability.is_nan() {
            0.0
        } else {
            success_probability.clamp(0.0, 1.0)
        };
        Self {
            latency,
            success_probability,
        }
    }

    fn random_signature() -> String {
        let mut bytes = [0u8; SIGNATURE_LEN];
        rand::thread_rng().fill(&mut bytes[..]);
        bs58::encode(bytes).into_string()
    }
}

#[async_trait]
impl ClaimSubmitter for PaperClaimSubmitter {
    async fn submit_claim(&self, request: &ClaimRequest) -> Result<ClaimReceipt, SubmitError> {
        if request.amount <= 0.0 {
            return Err(SubmitError::InvalidParameters(
                "nothing to claim".to_string(),
            ));
        }

        tracing::debug!(
            "Paper claim: {} {} (settling in {:?})",
            request.amount,
            request.currency,
            self.latency
        );
        tokio::time::sleep(self.latency).await;

        // A simulated failure is a dropped transaction, safe to resubmit
        if rand::random::<f64>() >= self.success_probability {
            return Err(SubmitError::Network(
                "simulated transaction dropped".to_string(),
            ));
        }

        Ok(ClaimReceipt {
            signature: Self::random_signature(),
            amount: request.amount,
            currency: request.currency.clone(),
            confirmed_at: Utc::now(),
        })
    }
}
