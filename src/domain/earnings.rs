//! Earnings Ledger
//!
//! Rewards accrue from three streams: rakeback on the user's own trading,
//! fees from tokens the user created, and fees other creators delegate to
//! the user. A row is Pending while its cycle runs, Eligible once the cycle
//! closes, and Claimed after payout. Only Eligible rows count as claimable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::error::{ensure_non_negative, RewardsError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("No {0} earnings for cycle {1}")]
    UnknownCycle(EarningsSource, u64),

    #[error("{0} for cycle {1} already claimed")]
    AlreadyClaimed(EarningsSource, u64),

    #[error("{0} for cycle {1} not yet eligible")]
    NotEligible(EarningsSource, u64),

    #[error("Duplicate {0} record for cycle {1}")]
    DuplicateRecord(EarningsSource, u64),

    #[error("Unknown earnings source: {0}")]
    UnknownSource(String),

    #[error(transparent)]
    Rewards(#[from] RewardsError),
}

/// Reward stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EarningsSource {
    /// Rakeback on own trading volume
    Trader,
    /// Fees from tokens the user created
    Creator,
    /// Fees delegated by other creators
    Delegated,
}

impl EarningsSource {
    pub const ALL: [EarningsSource; 3] = [
        EarningsSource::Trader,
        EarningsSource::Creator,
        EarningsSource::Delegated,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EarningsSource::Trader => "Trader Rakeback",
            EarningsSource::Creator => "Creator Fees",
            EarningsSource::Delegated => "Delegated Fees",
        }
    }
}

impl fmt::Display for EarningsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EarningsSource {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trader" | "rakeback" => Ok(EarningsSource::Trader),
            "creator" => Ok(EarningsSource::Creator),
            "delegated" => Ok(EarningsSource::Delegated),
            other => Err(LedgerError::UnknownSource(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EarningStatus {
    /// Cycle still running
    Pending,
    /// Cycle closed, can be claimed
    #[serde(alias = "claimable")]
    Eligible,
    Claimed,
}

/// One stream's earnings for one cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub source: EarningsSource,
    pub cycle: u64,
    /// Token the fees came from (creator and delegated rows)
    pub token: Option<String>,
    /// Wallet of the delegating creator
    pub source_wallet: Option<String>,
    /// Trading volume behind trader rakeback
    pub volume_usd: f64,
    pub amount: f64,
    pub currency: String,
    pub status: EarningStatus,
}

impl CycleRecord {
    /// Rakeback on `volume_usd` traded during `cycle`
    pub fn trader(
        cycle: u64,
        volume_usd: f64,
        rakeback: f64,
        currency: impl Into<String>,
    ) -> Result<Self, RewardsError> {
        let mut record = Self::base(EarningsSource::Trader, cycle, rakeback, currency)?;
        record.volume_usd = ensure_non_negative("volume", volume_usd)?;
        Ok(record)
    }

    /// Fees earned by a token the user created
    pub fn creator(
        cycle: u64,
        token: impl Into<String>,
        fees: f64,
        currency: impl Into<String>,
    ) -> Result<Self, RewardsError> {
        let mut record = Self::base(EarningsSource::Creator, cycle, fees, currency)?;
        record.token = Some(token.into());
        Ok(record)
    }

    /// Fees delegated from `source_wallet`'s token
    pub fn delegated(
        cycle: u64,
        source_wallet: impl Into<String>,
        token: impl Into<String>,
        earned: f64,
        currency: impl Into<String>,
    ) -> Result<Self, RewardsError> {
        let mut record = Self::base(EarningsSource::Delegated, cycle, earned, currency)?;
        record.source_wallet = Some(source_wallet.into());
        record.token = Some(token.into());
        Ok(record)
    }

    fn base(
        source: EarningsSource,
        cycle: u64,
        amount: f64,
        currency: impl Into<String>,
    ) -> Result<Self, RewardsError> {
        Ok(Self {
            source,
            cycle,
            token: None,
            source_wallet: None,
            volume_usd: 0.0,
            amount: ensure_non_negative("amount", amount)?,
            currency: currency.into(),
            status: EarningStatus::Eligible,
        })
    }

    pub fn pending(mut self) -> Self {
        self.status = EarningStatus::Pending;
        self
    }

    pub fn claimed(mut self) -> Self {
        self.status = EarningStatus::Claimed;
        self
    }

    pub fn is_eligible(&self) -> bool {
        self.status == EarningStatus::Eligible
    }

    fn same_row(&self, other: &CycleRecord) -> bool {
        self.source == other.source
            && self.cycle == other.cycle
            && self.token == other.token
            && self.source_wallet == other.source_wallet
    }

    fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [self.token.as_deref(), self.source_wallet.as_deref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Earnings across all streams, kept newest cycle first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EarningsLedger {
    records: Vec<CycleRecord>,
}

impl EarningsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<CycleRecord>) -> Result<Self, LedgerError> {
        let mut ledger = Self::new();
        for record in records {
            ledger.record(record)?;
        }
        Ok(ledger)
    }

    pub fn record(&mut self, record: CycleRecord) -> Result<(), LedgerError> {
        if self.records.iter().any(|r| r.same_row(&record)) {
            return Err(LedgerError::DuplicateRecord(record.source, record.cycle));
        }
        let pos = self
            .records
            .iter()
            .position(|r| r.cycle < record.cycle)
            .unwrap_or(self.records.len());
        self.records.insert(pos, record);
        Ok(())
    }

    pub fn records(&self) -> &[CycleRecord] {
        &self.records
    }

    /// One stream's rows, newest cycle first
    pub fn history(&self, source: EarningsSource) -> impl Iterator<Item = &CycleRecord> {
        self.records.iter().filter(move |r| r.source == source)
    }

    pub fn get(&self, source: EarningsSource, cycle: u64) -> Option<&CycleRecord> {
        self.history(source).find(|r| r.cycle == cycle)
    }

    pub fn eligible(&self, source: EarningsSource) -> impl Iterator<Item = &CycleRecord> {
        self.history(source).filter(|r| r.is_eligible())
    }

    /// Rows of `source` whose token or source wallet contains `query`
    pub fn search<'a>(
        &'a self,
        source: EarningsSource,
        query: &'a str,
    ) -> impl Iterator<Item = &'a CycleRecord> {
        self.history(source).filter(move |r| r.matches(query))
    }

    /// Eligible `source` earnings in `currency`; pending and claimed rows excluded
    pub fn claimable_total(&self, source: EarningsSource, currency: &str) -> f64 {
        self.eligible(source)
            .filter(|r| r.currency == currency)
            .map(|r| r.amount)
            .sum()
    }

    /// Earned so far in `currency`: eligible plus claimed
    pub fn lifetime_total(&self, source: EarningsSource, currency: &str) -> f64 {
        self.history(source)
            .filter(|r| r.currency == currency && r.status != EarningStatus::Pending)
            .map(|r| r.amount)
            .sum()
    }

    /// Make pending rows of every cycle up to `cycle` eligible.
    /// Returns how many rows changed.
    pub fn close_cycle(&mut self, cycle: u64) -> usize {
        let mut promoted = 0;
        for record in self
            .records
            .iter_mut()
            .filter(|r| r.cycle <= cycle && r.status == EarningStatus::Pending)
        {
            record.status = EarningStatus::Eligible;
            promoted += 1;
        }
        if promoted > 0 {
            tracing::info!("Cycle {} closed: {} earnings now eligible", cycle, promoted);
        }
        promoted
    }

    /// Claim every eligible `source` row of `cycle`; returns the amount claimed
    pub fn mark_claimed(&mut self, source: EarningsSource, cycle: u64) -> Result<f64, LedgerError> {
        let rows: Vec<&mut CycleRecord> = self
            .records
            .iter_mut()
            .filter(|r| r.source == source && r.cycle == cycle)
            .collect();

        if rows.is_empty() {
            return Err(LedgerError::UnknownCycle(source, cycle));
        }
        if rows.iter().all(|r| r.status == EarningStatus::Claimed) {
            return Err(LedgerError::AlreadyClaimed(source, cycle));
        }
        if !rows.iter().any(|r| r.is_eligible()) {
            return Err(LedgerError::NotEligible(source, cycle));
        }

        let mut total = 0.0;
        for record in rows.into_iter().filter(|r| r.is_eligible()) {
            record.status = EarningStatus::Claimed;
            total += record.amount;
        }
        tracing::info!("{} for cycle {} marked claimed ({})", source, cycle, total);
        Ok(total)
    }

    /// Claim every eligible `source` row in `currency`; returns the amount claimed
    pub fn claim_all(&mut self, source: EarningsSource, currency: &str) -> f64 {
        let mut total = 0.0;
        for record in self
            .records
            .iter_mut()
            .filter(|r| r.source == source && r.currency == currency && r.is_eligible())
        {
            record.status = EarningStatus::Claimed;
            total += record.amount;
        }
        tracing::info!("{} claimed in full: {} {}", source, total, currency);
        total
    }
}
