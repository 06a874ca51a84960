//! Rakeback Leaderboard
//!
//! Ranks wallets by cashback earned in the current epoch (not P&L).

use serde::{Deserialize, Serialize};

use super::tier::TierName;

/// Characters kept on each side when shortening an address
const ADDRESS_EDGE: usize = 4;

/// `7xKpQ...mR4d`-style shortening: first 4, `...`, last 4
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= ADDRESS_EDGE * 2 + 3 {
        return address.to_string();
    }
    let head: String = chars[..ADDRESS_EDGE].iter().collect();
    let tail: String = chars[chars.len() - ADDRESS_EDGE..].iter().collect();
    format!("{}...{}", head, tail)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub wallet: String,
    pub cashback: f64,
    pub tier: TierName,
    #[serde(default)]
    pub boosted: bool,
    #[serde(default)]
    pub is_you: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// 1-based
    pub rank: usize,
    pub entry: LeaderboardEntry,
}

impl RankedEntry {
    pub fn display_wallet(&self) -> String {
        shorten_address(&self.entry.wallet)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Leaderboard {
    ranked: Vec<RankedEntry>,
}

impl Leaderboard {
    /// Rank by cashback descending; ties keep input order.
    /// Uses the IEEE total order, so a NaN cashback cannot scramble the ranking.
    pub fn rank(entries: Vec<LeaderboardEntry>) -> Self {
        let mut entries = entries;
        entries.sort_by(|a, b| b.cashback.total_cmp(&a.cashback));

        let ranked = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| RankedEntry { rank: i + 1, entry })
            .collect();

        Self { ranked }
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.ranked
    }

    pub fn top(&self, n: usize) -> &[RankedEntry] {
        &self.ranked[..n.min(self.ranked.len())]
    }

    pub fn you(&self) -> Option<&RankedEntry> {
        self.ranked.iter().find(|r| r.entry.is_you)
    }

    pub fn total_cashback(&self) -> f64 {
        self.ranked.iter().map(|r| r.entry.cashback).sum()
    }
}
