//! Domain Layer - Core business logic for tiered rakeback
//!
//! This module contains pure domain types and logic with no I/O.
//! All external interactions happen through the ports layer.

pub mod error;
pub mod tier;
pub mod resolver;
pub mod rakeback;
pub mod epoch;
pub mod claim;
pub mod earnings;
pub mod streak;
pub mod leaderboard;

pub use error::RewardsError;
pub use tier::{Tier, TierName, TierTable, TierTableError, STANDARD_TIERS};
pub use resolver::{resolve_tier, TierResolution};
pub use rakeback::{
    claimable_total_usd, estimate_rakeback, estimate_rakeback_in, CurrencyUnit, RakebackBoost,
    DEFAULT_BOOST_PCT,
};
pub use epoch::{period_end, EpochClosed, EpochSchedule, TimeRemaining, DEFAULT_CYCLE_DAYS};
pub use claim::{ClaimError, ClaimFlow, ClaimReceipt, ClaimRequest, ClaimStep, DEFAULT_NETWORK_FEE};
pub use earnings::{CycleRecord, EarningStatus, EarningsLedger, EarningsSource, LedgerError};
pub use streak::TradingStreak;
pub use leaderboard::{shorten_address, Leaderboard, LeaderboardEntry, RankedEntry};
