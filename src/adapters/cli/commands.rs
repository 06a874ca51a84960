//! CLI Command Definitions
//!
//! Argument parsing for the rakeback binary. Handlers live in `main.rs`.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::domain::earnings::EarningsSource;
use crate::domain::rakeback::CurrencyUnit;
use crate::domain::tier::TierName;
use crate::ports::settings::Theme;

/// Rakeback - tiered trading rewards calculator
#[derive(Parser, Debug)]
#[command(
    name = "rakeback",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Tiered rakeback calculator and claim simulator",
    long_about = "Resolves a trader's rakeback tier from 30-day volume, estimates \
                  rakeback on a trade, tracks the reward cycle countdown and \
                  simulates claiming accrued rewards."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the tier table
    Tiers,

    /// Resolve the tier for a 30-day volume
    Tier(TierCmd),

    /// Estimate rakeback on a trade
    Estimate(EstimateCmd),

    /// Show the current reward cycle countdown
    Epoch(EpochCmd),

    /// Claim accrued rewards (simulated)
    Claim(ClaimCmd),

    /// Show the trading streak for a set of trading days
    Streak(StreakCmd),

    /// Show or change UI preferences
    #[command(subcommand)]
    Settings(SettingsCmd),
}

/// Resolve a tier
#[derive(Parser, Debug)]
pub struct TierCmd {
    /// 30-day trading volume in USD
    #[arg(value_name = "VOLUME")]
    pub volume: f64,
}

/// Estimate rakeback
#[derive(Parser, Debug)]
pub struct EstimateCmd {
    /// Trade notional
    #[arg(value_name = "NOTIONAL")]
    pub notional: f64,

    /// Tier to apply (e.g. gold)
    #[arg(long, value_name = "NAME", conflicts_with = "volume")]
    pub tier: Option<TierName>,

    /// Resolve the tier from this 30-day volume instead
    #[arg(long, value_name = "USD")]
    pub volume: Option<f64>,

    /// Rounding of the displayed amount
    #[arg(long, value_enum, default_value = "crypto")]
    pub unit: UnitArg,

    /// Apply the payout boost
    #[arg(long)]
    pub boost: bool,
}

/// Cycle countdown
#[derive(Parser, Debug)]
pub struct EpochCmd {
    /// Keep printing the countdown until Ctrl+C
    #[arg(short, long)]
    pub watch: bool,
}

/// Claim rewards
#[derive(Parser, Debug)]
pub struct ClaimCmd {
    /// Amount to claim
    #[arg(value_name = "AMOUNT")]
    pub amount: f64,

    /// Currency label
    #[arg(long, default_value = "SOL")]
    pub currency: String,

    /// Reward stream: trader, creator or delegated
    #[arg(long, default_value = "trader")]
    pub source: EarningsSource,

    /// Settle a single cycle
    #[arg(long, value_name = "N")]
    pub cycle: Option<u64>,

    /// Force the simulated claim to fail
    #[arg(long)]
    pub fail: bool,

    /// Retries after a transient claim failure
    #[arg(long, value_name = "N", default_value = "0")]
    pub retries: u32,
}

/// Trading streak
#[derive(Parser, Debug)]
pub struct StreakCmd {
    /// Days with at least one trade (YYYY-MM-DD)
    #[arg(value_name = "DATE", required = true)]
    pub days: Vec<NaiveDate>,

    /// Reference day (defaults to today, local time)
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,
}

/// UI preferences
#[derive(Subcommand, Debug)]
pub enum SettingsCmd {
    /// Print stored preferences
    Show,

    /// Change one or more preferences
    Set(SettingsSetCmd),

    /// Flip between light and dark
    ToggleTheme {
        /// Treat the OS theme as dark when resolving `system`
        #[arg(long)]
        system_dark: bool,
    },
}

#[derive(Parser, Debug)]
pub struct SettingsSetCmd {
    /// light, dark or system
    #[arg(long)]
    pub theme: Option<Theme>,

    #[arg(long)]
    pub reduce_motion: Option<bool>,

    #[arg(long)]
    pub sidebar_pinned: Option<bool>,
}

impl SettingsSetCmd {
    pub fn is_empty(&self) -> bool {
        self.theme.is_none() && self.reduce_motion.is_none() && self.sidebar_pinned.is_none()
    }
}

/// Display rounding for estimates
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitArg {
    /// 4 decimal places
    Crypto,
    /// 2 decimal places
    Fiat,
}

impl From<UnitArg> for CurrencyUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Crypto => CurrencyUnit::Crypto,
            UnitArg::Fiat => CurrencyUnit::Fiat,
        }
    }
}
