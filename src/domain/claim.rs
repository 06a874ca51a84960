//! Claim Flow
//!
//! State machine for withdrawing claimable rewards:
//! Confirm -> Processing -> Success | Error, with Error -> Confirm on retry
//! and any state -> Confirm on reset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::earnings::EarningsSource;
use super::error::{ensure_non_negative, RewardsError};

/// Default network fee label shown on the confirm step
pub const DEFAULT_NETWORK_FEE: &str = "~0.00005 SOL";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClaimError {
    #[error("Cannot {action} while claim is {from}")]
    InvalidTransition { from: ClaimStep, action: &'static str },

    #[error(transparent)]
    Rewards(#[from] RewardsError),
}

/// Current step of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStep {
    /// Awaiting user confirmation
    Confirm,
    /// Submitted, awaiting the network
    Processing,
    /// Funds sent
    Success,
    /// Submission failed, may be retried
    Error,
}

impl ClaimStep {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStep::Success | ClaimStep::Error)
    }

    pub fn description(&self) -> &'static str {
        match self {
            ClaimStep::Confirm => "Review your claim details before confirming.",
            ClaimStep::Processing => "Your claim is being processed...",
            ClaimStep::Success => "Your earnings have been sent to your wallet.",
            ClaimStep::Error => "Something went wrong. Please try again.",
        }
    }
}

impl fmt::Display for ClaimStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClaimStep::Confirm => "confirm",
            ClaimStep::Processing => "processing",
            ClaimStep::Success => "success",
            ClaimStep::Error => "error",
        };
        f.write_str(s)
    }
}

/// What is being claimed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub source: EarningsSource,
    pub amount: f64,
    pub currency: String,
    pub network_fee: String,
    /// Cycle being claimed, when the claim settles a single cycle
    pub cycle: Option<u64>,
}

impl ClaimRequest {
    pub fn new(
        source: EarningsSource,
        amount: f64,
        currency: impl Into<String>,
    ) -> Result<Self, RewardsError> {
        Ok(Self {
            source,
            amount: ensure_non_negative("claim amount", amount)?,
            currency: currency.into(),
            network_fee: DEFAULT_NETWORK_FEE.to_string(),
            cycle: None,
        })
    }

    pub fn with_network_fee(mut self, fee: impl Into<String>) -> Self {
        self.network_fee = fee.into();
        self
    }

    pub fn for_cycle(mut self, cycle: u64) -> Self {
        self.cycle = Some(cycle);
        self
    }
}

/// Proof of a completed claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    pub signature: String,
    pub amount: f64,
    pub currency: String,
    pub confirmed_at: DateTime<Utc>,
}

impl ClaimReceipt {
    /// Signature shortened for display: `5KhR...mP4q`
    pub fn short_signature(&self) -> String {
        super::leaderboard::shorten_address(&self.signature)
    }
}

/// A single claim moving through its steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimFlow {
    request: ClaimRequest,
    step: ClaimStep,
    receipt: Option<ClaimReceipt>,
    last_error: Option<String>,
    attempts: u32,
}

impl ClaimFlow {
    pub fn new(request: ClaimRequest) -> Self {
        Self {
            request,
            step: ClaimStep::Confirm,
            receipt: None,
            last_error: None,
            attempts: 0,
        }
    }

    pub fn request(&self) -> &ClaimRequest {
        &self.request
    }

    pub fn step(&self) -> ClaimStep {
        self.step
    }

    pub fn receipt(&self) -> Option<&ClaimReceipt> {
        self.receipt.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Confirm -> Processing
    pub fn begin(&mut self) -> Result<(), ClaimError> {
        self.expect(ClaimStep::Confirm, "submit")?;
        self.step = ClaimStep::Processing;
        self.attempts += 1;
        self.last_error = None;
        tracing::info!(
            "Claim submitted: {} {} {} (attempt {})",
            self.request.source,
            self.request.amount,
            self.request.currency,
            self.attempts
        );
        Ok(())
    }

    /// Processing -> Success
    pub fn succeed(&mut self, receipt: ClaimReceipt) -> Result<(), ClaimError> {
        self.expect(ClaimStep::Processing, "complete")?;
        tracing::info!("Claim confirmed: tx {}", receipt.signature);
        self.receipt = Some(receipt);
        self.step = ClaimStep::Success;
        Ok(())
    }

    /// Processing -> Error
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), ClaimError> {
        self.expect(ClaimStep::Processing, "fail")?;
        let reason = reason.into();
        tracing::warn!("Claim failed: {}", reason);
        self.last_error = Some(reason);
        self.step = ClaimStep::Error;
        Ok(())
    }

    /// Processing -> Success or Error, depending on the submission outcome
    pub fn resolve(&mut self, outcome: Result<ClaimReceipt, String>) -> Result<(), ClaimError> {
        match outcome {
            Ok(receipt) => self.succeed(receipt),
            Err(reason) => self.fail(reason),
        }
    }

    /// Error -> Confirm
    pub fn retry(&mut self) -> Result<(), ClaimError> {
        self.expect(ClaimStep::Error, "retry")?;
        self.step = ClaimStep::Confirm;
        Ok(())
    }

    /// Any -> Confirm, as when the dialog is closed
    pub fn reset(&mut self) {
        if self.step == ClaimStep::Processing {
            tracing::warn!("Claim reset while processing; result will be discarded");
        }
        self.step = ClaimStep::Confirm;
        self.receipt = None;
        self.last_error = None;
    }

    fn expect(&self, required: ClaimStep, action: &'static str) -> Result<(), ClaimError> {
        if self.step != required {
            return Err(ClaimError::InvalidTransition {
                from: self.step,
                action,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ClaimRequest {
        ClaimRequest::new(EarningsSource::Trader, 0.4521, "SOL").unwrap()
    }

    fn receipt() -> ClaimReceipt {
        ClaimReceipt {
            signature: "5KhRzQ7tV9mP4q".to_string(),
            amount: 0.4521,
            currency: "SOL".to_string(),
            confirmed_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_flow_awaits_confirmation() {
        let flow = ClaimFlow::new(request());
        assert_eq!(flow.step(), ClaimStep::Confirm);
        assert_eq!(flow.attempts(), 0);
        assert!(flow.receipt().is_none());
        assert_eq!(flow.request().network_fee, DEFAULT_NETWORK_FEE);
    }

    #[test]
    fn test_happy_path() {
        let mut flow = ClaimFlow::new(request());
        flow.begin().unwrap();
        assert_eq!(flow.step(), ClaimStep::Processing);

        flow.succeed(receipt()).unwrap();
        assert_eq!(flow.step(), ClaimStep::Success);
        assert!(flow.step().is_terminal());
        assert_eq!(flow.receipt().unwrap().short_signature(), "5KhR...mP4q");
    }

    #[test]
    fn test_failure_then_retry() {
        let mut flow = ClaimFlow::new(request());
        flow.begin().unwrap();
        flow.fail("transaction rejected").unwrap();
        assert_eq!(flow.step(), ClaimStep::Error);
        assert_eq!(flow.last_error(), Some("transaction rejected"));

        flow.retry().unwrap();
        assert_eq!(flow.step(), ClaimStep::Confirm);

        flow.begin().unwrap();
        assert_eq!(flow.attempts(), 2);
        assert!(flow.last_error().is_none());
    }

    #[test]
    fn test_resolve_routes_outcome() {
        let mut flow = ClaimFlow::new(request());
        flow.begin().unwrap();
        flow.resolve(Ok(receipt())).unwrap();
        assert_eq!(flow.step(), ClaimStep::Success);

        let mut flow = ClaimFlow::new(request());
        flow.begin().unwrap();
        flow.resolve(Err("blockhash expired".to_string())).unwrap();
        assert_eq!(flow.step(), ClaimStep::Error);
        assert_eq!(flow.last_error(), Some("blockhash expired"));

        // Only a processing claim can be resolved
        let mut flow = ClaimFlow::new(request());
        assert!(matches!(
            flow.resolve(Ok(receipt())),
            Err(ClaimError::InvalidTransition { from: ClaimStep::Confirm, .. })
        ));
    }

    #[test]
    fn test_cannot_complete_without_submitting() {
        let mut flow = ClaimFlow::new(request());
        let err = flow.succeed(receipt()).unwrap_err();
        assert_eq!(
            err,
            ClaimError::InvalidTransition {
                from: ClaimStep::Confirm,
                action: "complete"
            }
        );
        assert!(flow.fail("x").is_err());
        assert!(flow.retry().is_err());
    }

    #[test]
    fn test_cannot_double_submit() {
        let mut flow = ClaimFlow::new(request());
        flow.begin().unwrap();
        assert!(matches!(
            flow.begin(),
            Err(ClaimError::InvalidTransition { from: ClaimStep::Processing, .. })
        ));
    }

    #[test]
    fn test_success_is_not_retryable() {
        let mut flow = ClaimFlow::new(request());
        flow.begin().unwrap();
        flow.succeed(receipt()).unwrap();
        assert!(flow.retry().is_err());
        assert!(flow.begin().is_err());
    }

    #[test]
    fn test_reset_from_any_step() {
        let mut flow = ClaimFlow::new(request());
        flow.begin().unwrap();
        flow.succeed(receipt()).unwrap();
        flow.reset();
        assert_eq!(flow.step(), ClaimStep::Confirm);
        assert!(flow.receipt().is_none());

        flow.begin().unwrap();
        flow.reset();
        assert_eq!(flow.step(), ClaimStep::Confirm);
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert!(ClaimRequest::new(EarningsSource::Trader, -1.0, "SOL").is_err());
    }

    #[test]
    fn test_request_builders() {
        let req = request().with_network_fee("~0.00025 SOL").for_cycle(47);
        assert_eq!(req.network_fee, "~0.00025 SOL");
        assert_eq!(req.cycle, Some(47));
    }

    #[test]
    fn test_error_message() {
        let err = ClaimError::InvalidTransition {
            from: ClaimStep::Success,
            action: "retry",
        };
        assert_eq!(err.to_string(), "Cannot retry while claim is success");
    }
}
