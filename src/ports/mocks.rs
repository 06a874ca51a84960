use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use chrono::Utc;

use crate::domain::claim::{ClaimReceipt, ClaimRequest};
use super::claim::{ClaimSubmitter, SubmitError};
use super::settings::{SettingsError, SettingsRepository, UiSettings};

/// Mock claim submitter that records calls and replays scripted outcomes
#[derive(Debug, Default, Clone)]
pub struct MockClaimSubmitter {
    calls: Arc<Mutex<Vec<ClaimRequest>>>,
    responses: Arc<Mutex<VecDeque<Result<String, SubmitError>>>>,
}

impl MockClaimSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to queue a successful submission with the given signature
    pub fn with_success(self, signature: &str) -> Self {
        self.responses.lock().unwrap().push_back(Ok(signature.to_string()));
        self
    }

    /// Builder method to queue a failed submission
    pub fn with_failure(self, error: SubmitError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<ClaimRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClaimSubmitter for MockClaimSubmitter {
    async fn submit_claim(&self, request: &ClaimRequest) -> Result<ClaimReceipt, SubmitError> {
        self.calls.lock().unwrap().push(request.clone());
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SubmitError::Network("No response configured".to_string())));

        next.map(|signature| ClaimReceipt {
            signature,
            amount: request.amount,
            currency: request.currency.clone(),
            confirmed_at: Utc::now(),
        })
    }
}

/// Settings repository kept in memory, with a save counter
#[derive(Debug, Default, Clone)]
pub struct InMemorySettingsRepository {
    stored: Arc<Mutex<Option<UiSettings>>>,
    saves: Arc<Mutex<usize>>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(self, settings: UiSettings) -> Self {
        *self.stored.lock().unwrap() = Some(settings);
        self
    }

    pub fn stored(&self) -> Option<UiSettings> {
        *self.stored.lock().unwrap()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl SettingsRepository for InMemorySettingsRepository {
    fn load(&self) -> Result<UiSettings, SettingsError> {
        Ok(self.stored.lock().unwrap().unwrap_or_default())
    }

    fn save(&self, settings: &UiSettings) -> Result<(), SettingsError> {
        *self.stored.lock().unwrap() = Some(*settings);
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}
