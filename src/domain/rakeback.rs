//! Rakeback Estimator
//!
//! Cashback estimates for a trade notional at a tier's rakeback rate.
//! Raw estimates are plain `f64` products; display figures are rounded
//! with `rust_decimal` to the precision of the currency unit.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{ensure_non_negative, RewardsError};
use super::tier::Tier;

/// Default boost for post-migration accounts, in percent
pub const DEFAULT_BOOST_PCT: f64 = 15.0;

/// Denomination of an amount, which fixes its display precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyUnit {
    /// Crypto-denominated (SOL): 4 decimal places
    Crypto,
    /// Fiat-denominated (USD, USD1): 2 decimal places
    Fiat,
}

impl CurrencyUnit {
    pub fn decimal_places(&self) -> u32 {
        match self {
            CurrencyUnit::Crypto => 4,
            CurrencyUnit::Fiat => 2,
        }
    }

    /// Round half away from zero to this unit's precision
    pub fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.decimal_places(), RoundingStrategy::MidpointAwayFromZero)
    }
}

impl fmt::Display for CurrencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrencyUnit::Crypto => write!(f, "crypto"),
            CurrencyUnit::Fiat => write!(f, "fiat"),
        }
    }
}

/// Multiplicative payout boost applied on top of a tier's rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RakebackBoost {
    /// Boost in percent (15.0 = +15%)
    pub pct: f64,
}

impl Default for RakebackBoost {
    fn default() -> Self {
        Self {
            pct: DEFAULT_BOOST_PCT,
        }
    }
}

impl RakebackBoost {
    pub fn new(pct: f64) -> Result<Self, RewardsError> {
        Ok(Self {
            pct: ensure_non_negative("boost pct", pct)?,
        })
    }

    /// Boosted rate for a base rakeback fraction
    pub fn apply(&self, percent: f64) -> f64 {
        percent * (1.0 + self.pct / 100.0)
    }
}

/// Estimated cashback: exactly `notional * percent`
pub fn estimate_rakeback(notional: f64, percent: f64) -> Result<f64, RewardsError> {
    let notional = ensure_non_negative("notional", notional)?;
    let percent = ensure_non_negative("rakeback percent", percent)?;
    Ok(notional * percent)
}

/// Estimated cashback rounded to the display precision of `unit`
pub fn estimate_rakeback_in(
    notional: f64,
    percent: f64,
    unit: CurrencyUnit,
) -> Result<Decimal, RewardsError> {
    let notional = to_decimal("notional", ensure_non_negative("notional", notional)?)?;
    let percent = to_decimal("rakeback percent", ensure_non_negative("rakeback percent", percent)?)?;
    let cashback = notional
        .checked_mul(percent)
        .ok_or_else(|| RewardsError::out_of_range(format!("{} * {} overflows", notional, percent)))?;
    Ok(unit.round(cashback))
}

/// Combined claimable balance in fiat: crypto balance at `sol_price_usd`
/// plus a fiat-pegged balance, rounded to cents
pub fn claimable_total_usd(
    claimable_sol: f64,
    claimable_usd1: f64,
    sol_price_usd: f64,
) -> Result<Decimal, RewardsError> {
    let sol = to_decimal("claimable sol", ensure_non_negative("claimable sol", claimable_sol)?)?;
    let usd1 = to_decimal("claimable usd1", ensure_non_negative("claimable usd1", claimable_usd1)?)?;
    let price = to_decimal("sol price", ensure_non_negative("sol price", sol_price_usd)?)?;
    let total = sol
        .checked_mul(price)
        .and_then(|sol_usd| sol_usd.checked_add(usd1))
        .ok_or_else(|| RewardsError::out_of_range("claimable total overflows"))?;
    Ok(CurrencyUnit::Fiat.round(total))
}

fn to_decimal(field: &str, value: f64) -> Result<Decimal, RewardsError> {
    Decimal::from_f64(value)
        .ok_or_else(|| RewardsError::out_of_range(format!("{} {} exceeds Decimal range", field, value)))
}

impl Tier {
    /// Raw cashback on `notional` at this tier's rate
    pub fn estimate_rakeback(&self, notional: f64) -> Result<f64, RewardsError> {
        estimate_rakeback(notional, self.rakeback_percent)
    }

    /// Cashback at this tier's rate, boosted, rounded for display
    pub fn estimate_boosted(
        &self,
        notional: f64,
        boost: Option<RakebackBoost>,
        unit: CurrencyUnit,
    ) -> Result<Decimal, RewardsError> {
        let percent = boost.map_or(self.rakeback_percent, |b| b.apply(self.rakeback_percent));
        estimate_rakeback_in(notional, percent, unit)
    }
}
