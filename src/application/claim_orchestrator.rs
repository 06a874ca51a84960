//! Claim Orchestrator
//!
//! Drives a [`ClaimFlow`] through an injected [`ClaimSubmitter`]: the
//! Processing step lasts exactly as long as the submission call, and its
//! outcome (receipt or error) picks the next step.

use std::time::Duration;

use crate::domain::claim::{ClaimError, ClaimFlow, ClaimRequest, ClaimStep};
use crate::domain::earnings::EarningsLedger;
use crate::ports::claim::{ClaimSubmitter, SubmitError};

pub struct ClaimOrchestrator<S: ClaimSubmitter> {
    submitter: S,
    flow: ClaimFlow,
    ledger: Option<EarningsLedger>,
    timeout: Option<Duration>,
    last_failure: Option<SubmitError>,
}

impl<S: ClaimSubmitter> ClaimOrchestrator<S> {
    pub fn new(submitter: S, request: ClaimRequest) -> Self {
        Self {
            submitter,
            flow: ClaimFlow::new(request),
            ledger: None,
            timeout: None,
            last_failure: None,
        }
    }

    /// Mark the claimed earnings in `ledger` on success
    pub fn with_ledger(mut self, ledger: EarningsLedger) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Treat a submission still pending after `timeout` as failed
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn flow(&self) -> &ClaimFlow {
        &self.flow
    }

    pub fn step(&self) -> ClaimStep {
        self.flow.step()
    }

    pub fn ledger(&self) -> Option<&EarningsLedger> {
        self.ledger.as_ref()
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    pub fn last_failure(&self) -> Option<&SubmitError> {
        self.last_failure.as_ref()
    }

    /// The claim failed and resubmitting it may succeed
    pub fn can_retry(&self) -> bool {
        self.flow.step() == ClaimStep::Error
            && self.last_failure.as_ref().is_some_and(SubmitError::is_transient)
    }

    /// Confirm the claim: submit it and wait for the result.
    /// Returns the step the flow settled on (Success or Error).
    pub async fn confirm(&mut self) -> Result<ClaimStep, ClaimError> {
        self.flow.begin()?;

        let submission = self.submitter.submit_claim(self.flow.request());
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, submission)
                .await
                .unwrap_or_else(|_| {
                    Err(SubmitError::Network(format!(
                        "claim not confirmed within {:?}",
                        limit
                    )))
                }),
            None => submission.await,
        };

        let outcome = match result {
            Ok(receipt) => {
                self.last_failure = None;
                Ok(receipt)
            }
            Err(e) => {
                tracing::error!("Claim submission failed: {}", e);
                let reason = e.to_string();
                self.last_failure = Some(e);
                Err(reason)
            }
        };
        let succeeded = outcome.is_ok();
        self.flow.resolve(outcome)?;
        if succeeded {
            self.settle_ledger();
        }

        Ok(self.flow.step())
    }

    /// Error -> Confirm
    pub fn retry(&mut self) -> Result<(), ClaimError> {
        self.flow.retry()
    }

    /// Close the dialog; the flow returns to Confirm
    pub fn close(&mut self) {
        self.flow.reset();
        self.last_failure = None;
    }

    /// A claim for one cycle settles that cycle; otherwise every eligible
    /// row of the source in the claimed currency
    fn settle_ledger(&mut self) {
        let Some(ledger) = self.ledger.as_mut() else {
            return;
        };
        let request = self.flow.request();
        match request.cycle {
            Some(cycle) => {
                if let Err(e) = ledger.mark_claimed(request.source, cycle) {
                    tracing::warn!("Claim confirmed but ledger not updated: {}", e);
                }
            }
            None => {
                ledger.claim_all(request.source, &request.currency);
            }
        }
    }
}
