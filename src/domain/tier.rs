//! Tier Table
//!
//! Ordered reward levels unlocked by cumulative trading volume. Each tier
//! carries a rakeback percentage (decimal fraction) and the inclusive
//! volume threshold needed to hold it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::error::RewardsError;
use super::resolver::{resolve_tier, TierResolution};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TierTableError {
    #[error("Tier table cannot be empty")]
    Empty,

    #[error("Lowest tier {0} must have a volume threshold of 0, got {1}")]
    NonZeroBase(TierName, f64),

    #[error("Tier {0} has an invalid value: {1}")]
    InvalidValue(TierName, String),

    #[error("Tier {0} must rank above {1}")]
    NameOrder(TierName, TierName),

    #[error("Tier {0} threshold {1} must exceed the previous threshold {2}")]
    ThresholdOrder(TierName, f64, f64),

    #[error("Tier {0} rakeback {1} must exceed the previous rakeback {2}")]
    PercentOrder(TierName, f64, f64),

    #[error("Unknown tier name: {0}")]
    UnknownName(String),
}

/// Tier names, ordered worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TierName {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
}

impl TierName {
    pub const ALL: [TierName; 6] = [
        TierName::Bronze,
        TierName::Silver,
        TierName::Gold,
        TierName::Platinum,
        TierName::Diamond,
        TierName::Master,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TierName::Bronze => "Bronze",
            TierName::Silver => "Silver",
            TierName::Gold => "Gold",
            TierName::Platinum => "Platinum",
            TierName::Diamond => "Diamond",
            TierName::Master => "Master",
        }
    }

    /// Single-letter badge icon
    pub fn icon(&self) -> char {
        match self {
            TierName::Bronze => 'B',
            TierName::Silver => 'S',
            TierName::Gold => 'G',
            TierName::Platinum => 'P',
            TierName::Diamond => 'D',
            TierName::Master => 'M',
        }
    }

    /// Badge colour as a hex string
    pub fn color(&self) -> &'static str {
        match self {
            TierName::Bronze => "#CD7F32",
            TierName::Silver => "#C0C0C0",
            TierName::Gold => "#EAB308",
            TierName::Platinum => "#A0AEC0",
            TierName::Diamond => "#38BDF8",
            TierName::Master => "#F97316",
        }
    }

    /// Diamond and above unlock the VIP lounge
    pub fn is_vip(&self) -> bool {
        *self >= TierName::Diamond
    }
}

impl fmt::Display for TierName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TierName {
    type Err = TierTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TierName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TierTableError::UnknownName(s.to_string()))
    }
}

/// One reward level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub name: TierName,
    /// Decimal fraction (0.04 = 4%)
    pub rakeback_percent: f64,
    /// Inclusive lower bound on cumulative volume
    pub volume_threshold: f64,
}

impl Tier {
    pub const fn new(name: TierName, rakeback_percent: f64, volume_threshold: f64) -> Self {
        Self {
            name,
            rakeback_percent,
            volume_threshold,
        }
    }

    /// Rakeback as a display percentage (0.04 -> 4.0)
    pub fn display_percent(&self) -> f64 {
        self.rakeback_percent * 100.0
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}% rakeback from ${})",
            self.name,
            self.display_percent(),
            self.volume_threshold
        )
    }
}

pub const STANDARD_TIERS: [Tier; 6] = [
    Tier::new(TierName::Bronze, 0.02, 0.0),
    Tier::new(TierName::Silver, 0.03, 10_000.0),
    Tier::new(TierName::Gold, 0.04, 50_000.0),
    Tier::new(TierName::Platinum, 0.05, 150_000.0),
    Tier::new(TierName::Diamond, 0.06, 500_000.0),
    Tier::new(TierName::Master, 0.07, 1_500_000.0),
];

/// Validated, ordered list of tiers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl Default for TierTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TierTable {
    /// The production table: Bronze@0/2% through Master@1.5M/7%
    pub fn standard() -> Self {
        Self {
            tiers: STANDARD_TIERS.to_vec(),
        }
    }

    /// Build a custom table, enforcing ordering invariants
    pub fn new(tiers: Vec<Tier>) -> Result<Self, TierTableError> {
        let first = tiers.first().ok_or(TierTableError::Empty)?;

        for tier in &tiers {
            if !tier.rakeback_percent.is_finite() || tier.rakeback_percent < 0.0 {
                return Err(TierTableError::InvalidValue(
                    tier.name,
                    format!("rakeback_percent {}", tier.rakeback_percent),
                ));
            }
            if !tier.volume_threshold.is_finite() || tier.volume_threshold < 0.0 {
                return Err(TierTableError::InvalidValue(
                    tier.name,
                    format!("volume_threshold {}", tier.volume_threshold),
                ));
            }
        }

        if first.volume_threshold != 0.0 {
            return Err(TierTableError::NonZeroBase(first.name, first.volume_threshold));
        }

        for pair in tiers.windows(2) {
            let (prev, cur) = (&pair[0], &pair[1]);
            if cur.name <= prev.name {
                return Err(TierTableError::NameOrder(cur.name, prev.name));
            }
            if cur.volume_threshold <= prev.volume_threshold {
                return Err(TierTableError::ThresholdOrder(
                    cur.name,
                    cur.volume_threshold,
                    prev.volume_threshold,
                ));
            }
            if cur.rakeback_percent <= prev.rakeback_percent {
                return Err(TierTableError::PercentOrder(
                    cur.name,
                    cur.rakeback_percent,
                    prev.rakeback_percent,
                ));
            }
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.iter()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn get(&self, name: TierName) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.name == name)
    }

    /// The tier ranked immediately above `name`, if any
    pub fn next_after(&self, name: TierName) -> Option<&Tier> {
        let idx = self.tiers.iter().position(|t| t.name == name)?;
        self.tiers.get(idx + 1)
    }

    pub fn min_tier(&self) -> &Tier {
        &self.tiers[0]
    }

    pub fn max_tier(&self) -> &Tier {
        &self.tiers[self.tiers.len() - 1]
    }

    /// Resolve a volume figure against this table
    pub fn resolve(&self, volume: f64) -> Result<TierResolution, RewardsError> {
        resolve_tier(self, volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_values() {
        let table = TierTable::standard();
        assert_eq!(table.len(), 6);
        assert_eq!(table.min_tier().name, TierName::Bronze);
        assert_eq!(table.min_tier().volume_threshold, 0.0);
        assert_eq!(table.max_tier().name, TierName::Master);

        let gold = table.get(TierName::Gold).unwrap();
        assert_eq!(gold.rakeback_percent, 0.04);
        assert_eq!(gold.volume_threshold, 50_000.0);
    }

    #[test]
    fn test_standard_table_strictly_increasing() {
        let table = TierTable::standard();
        for pair in table.tiers().windows(2) {
            assert!(pair[1].name > pair[0].name);
            assert!(pair[1].rakeback_percent > pair[0].rakeback_percent);
            assert!(pair[1].volume_threshold > pair[0].volume_threshold);
        }
        // The standard table passes its own validation
        assert_eq!(TierTable::new(STANDARD_TIERS.to_vec()), Ok(table));
    }

    #[test]
    fn test_next_after() {
        let table = TierTable::standard();
        assert_eq!(
            table.next_after(TierName::Gold).map(|t| t.name),
            Some(TierName::Platinum)
        );
        assert!(table.next_after(TierName::Master).is_none());
    }

    #[test]
    fn test_rejects_empty_table() {
        assert_eq!(TierTable::new(vec![]), Err(TierTableError::Empty));
    }

    #[test]
    fn test_rejects_non_zero_base() {
        let result = TierTable::new(vec![Tier::new(TierName::Bronze, 0.02, 100.0)]);
        assert!(matches!(result, Err(TierTableError::NonZeroBase(TierName::Bronze, _))));
    }

    #[test]
    fn test_rejects_unordered_thresholds() {
        let result = TierTable::new(vec![
            Tier::new(TierName::Bronze, 0.02, 0.0),
            Tier::new(TierName::Silver, 0.03, 10_000.0),
            Tier::new(TierName::Gold, 0.04, 10_000.0),
        ]);
        assert!(matches!(result, Err(TierTableError::ThresholdOrder(TierName::Gold, _, _))));
    }

    #[test]
    fn test_rejects_unordered_percents() {
        let result = TierTable::new(vec![
            Tier::new(TierName::Bronze, 0.02, 0.0),
            Tier::new(TierName::Silver, 0.02, 10_000.0),
        ]);
        assert!(matches!(result, Err(TierTableError::PercentOrder(TierName::Silver, _, _))));
    }

    #[test]
    fn test_rejects_unordered_names() {
        let result = TierTable::new(vec![
            Tier::new(TierName::Silver, 0.02, 0.0),
            Tier::new(TierName::Bronze, 0.03, 10_000.0),
        ]);
        assert!(matches!(result, Err(TierTableError::NameOrder(TierName::Bronze, TierName::Silver))));
    }

    #[test]
    fn test_rejects_nan_values() {
        let result = TierTable::new(vec![Tier::new(TierName::Bronze, f64::NAN, 0.0)]);
        assert!(matches!(result, Err(TierTableError::InvalidValue(TierName::Bronze, _))));
    }

    #[test]
    fn test_sparse_table_allowed() {
        let table = TierTable::new(vec![
            Tier::new(TierName::Bronze, 0.01, 0.0),
            Tier::new(TierName::Master, 0.10, 1_000.0),
        ])
        .unwrap();
        assert_eq!(table.next_after(TierName::Bronze).unwrap().name, TierName::Master);
    }

    #[test]
    fn test_tier_name_parse_and_display() {
        assert_eq!("gold".parse::<TierName>(), Ok(TierName::Gold));
        assert_eq!(" MASTER ".parse::<TierName>(), Ok(TierName::Master));
        assert!("Unobtainium".parse::<TierName>().is_err());
        assert_eq!(TierName::Platinum.to_string(), "Platinum");
    }

    #[test]
    fn test_badges() {
        assert_eq!(TierName::Diamond.icon(), 'D');
        assert_eq!(TierName::Gold.color(), "#EAB308");
        assert!(TierName::Diamond.is_vip());
        assert!(TierName::Master.is_vip());
        assert!(!TierName::Platinum.is_vip());
    }

    #[test]
    fn test_display_percent() {
        let table = TierTable::standard();
        let master = table.get(TierName::Master).unwrap();
        assert!((master.display_percent() - 7.0).abs() < 1e-9);
    }
}
