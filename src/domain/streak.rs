//! Trading Streak
//!
//! Consecutive calendar days with at least one trade. A streak is still
//! alive when the last trade was today or yesterday.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingStreak {
    /// Length of the run ending today or yesterday, 0 if broken
    pub current: u32,
    /// Longest run ever
    pub best: u32,
    /// Trading days of the current week, Monday first
    pub week: [bool; 7],
}

impl TradingStreak {
    /// Streak as of `today` from the days traded. Order and duplicates do
    /// not matter; days after `today` are ignored.
    pub fn from_days(days: &[NaiveDate], today: NaiveDate) -> Self {
        let days: BTreeSet<NaiveDate> = days.iter().copied().filter(|d| *d <= today).collect();

        let mut best = 0;
        let mut run = 0;
        let mut previous: Option<NaiveDate> = None;
        for day in &days {
            run = match previous {
                Some(prev) if *day - prev == Duration::days(1) => run + 1,
                _ => 1,
            };
            best = best.max(run);
            previous = Some(*day);
        }

        let yesterday = today - Duration::days(1);
        let current = match previous {
            Some(last) if last == today || last == yesterday => run,
            _ => 0,
        };

        let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        let mut week = [false; 7];
        for (offset, traded) in week.iter_mut().enumerate() {
            *traded = days.contains(&(monday + Duration::days(offset as i64)));
        }

        tracing::debug!("Streak as of {}: current {}, best {}", today, current, best);
        Self { current, best, week }
    }

    pub fn is_active(&self) -> bool {
        self.current > 0
    }
}
