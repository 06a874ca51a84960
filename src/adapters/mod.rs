//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Settings: JSON file persistence for UI preferences
//! - Paper claim: simulated claim settlement
//! - CLI: Command-line argument definitions

pub mod cli;
pub mod paper_claim;
pub mod settings_file;

pub use cli::CliApp;
pub use paper_claim::PaperClaimSubmitter;
pub use settings_file::JsonSettingsRepository;
