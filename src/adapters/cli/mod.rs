//! CLI Adapter
//!
//! Command-line interface for the rakeback binary.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{
    CliApp, ClaimCmd, Command, EpochCmd, EstimateCmd, SettingsCmd, SettingsSetCmd, StreakCmd,
    TierCmd, UnitArg,
};

/// Parse the process arguments
pub fn init() -> CliApp {
    use clap::Parser;
    CliApp::parse()
}
