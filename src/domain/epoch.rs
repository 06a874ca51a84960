//! Epoch / Cycle Timer
//!
//! Rewards accrue over fixed multi-day cycles. A cycle ends at the last
//! millisecond of its final calendar day; the countdown decomposes the
//! time left into days, hours, minutes and seconds.

use chrono::{DateTime, Days, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::RewardsError;

/// Default cycle length in days
pub const DEFAULT_CYCLE_DAYS: u32 = 3;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Advance `now` by `days_ahead` calendar days and pin the result to
/// 23:59:59.999 local time in `now`'s zone.
pub fn period_end<Tz: TimeZone>(now: &DateTime<Tz>, days_ahead: u32) -> Result<DateTime<Tz>, RewardsError> {
    let date = now
        .date_naive()
        .checked_add_days(Days::new(u64::from(days_ahead)))
        .ok_or_else(|| RewardsError::invalid(format!("cannot advance {} days", days_ahead)))?;

    let end_of_day = date
        .and_hms_milli_opt(23, 59, 59, 999)
        .ok_or_else(|| RewardsError::invalid("invalid end-of-day time"))?;

    now.timezone()
        .from_local_datetime(&end_of_day)
        .latest()
        .ok_or_else(|| RewardsError::invalid(format!("{} does not exist in this time zone", end_of_day)))
}

/// Remaining time until a deadline, never negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub days: i64,
    /// 0-23
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub total_ms: i64,
}

impl TimeRemaining {
    pub fn from_millis(total_ms: i64) -> Self {
        let total_ms = total_ms.max(0);
        Self {
            days: total_ms / MS_PER_DAY,
            hours: (total_ms % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (total_ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (total_ms % MS_PER_MINUTE) / MS_PER_SECOND,
            total_ms,
        }
    }

    pub fn between<Tz: TimeZone, Tz2: TimeZone>(now: &DateTime<Tz>, end: &DateTime<Tz2>) -> Self {
        Self::from_millis(end.timestamp_millis() - now.timestamp_millis())
    }

    pub fn is_elapsed(&self) -> bool {
        self.total_ms == 0
    }

    /// Header chip format: `2d 04h`
    pub fn compact(&self) -> String {
        format!("{}d {:02}h", self.days, self.hours)
    }

    /// Mini countdown format: `HH:MM:SS`, hours not wrapped into days
    pub fn clock(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}",
            self.total_ms / MS_PER_HOUR,
            self.minutes,
            self.seconds
        )
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Emitted when an epoch's end instant has passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochClosed {
    pub epoch: u64,
    pub ended_at: DateTime<Utc>,
}

/// A numbered, recurring reward cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochSchedule {
    number: u64,
    ends_at: DateTime<Utc>,
    cycle_days: u32,
}

impl EpochSchedule {
    pub fn new(number: u64, ends_at: DateTime<Utc>, cycle_days: u32) -> Result<Self, RewardsError> {
        if cycle_days == 0 {
            return Err(RewardsError::invalid("cycle_days must be >= 1"));
        }
        Ok(Self {
            number,
            ends_at,
            cycle_days,
        })
    }

    /// Epoch running at `now`: it ends on the last day of a cycle that
    /// started today, i.e. `cycle_days - 1` days ahead at end of day in
    /// `now`'s time zone.
    pub fn current<Tz: TimeZone>(number: u64, now: &DateTime<Tz>, cycle_days: u32) -> Result<Self, RewardsError> {
        if cycle_days == 0 {
            return Err(RewardsError::invalid("cycle_days must be >= 1"));
        }
        let ends_at = period_end(now, cycle_days - 1)?.with_timezone(&Utc);
        Self::new(number, ends_at, cycle_days)
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    pub fn cycle_days(&self) -> u32 {
        self.cycle_days
    }

    pub fn remaining(&self, now: &DateTime<Utc>) -> TimeRemaining {
        TimeRemaining::between(now, &self.ends_at)
    }

    /// Close the current epoch if its end has passed and roll to the next.
    /// One epoch closes per call, so missed boundaries drain over repeated polls.
    pub fn poll(&mut self, now: &DateTime<Utc>) -> Option<EpochClosed> {
        if *now < self.ends_at {
            return None;
        }

        let closed = EpochClosed {
            epoch: self.number,
            ended_at: self.ends_at,
        };
        self.number += 1;
        self.ends_at += Duration::days(i64::from(self.cycle_days));

        tracing::info!(
            "Epoch {} closed at {}, epoch {} ends at {}",
            closed.epoch,
            closed.ended_at,
            self.number,
            self.ends_at
        );

        Some(closed)
    }
}
