//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement:
//! - Claim submission (the network call behind a reward claim)
//! - UI settings persistence

pub mod claim;
pub mod settings;
pub mod mocks;

// Re-export main traits and types
pub use claim::{ClaimSubmitter, SubmitError};
pub use settings::{SettingsError, SettingsRepository, Theme, UiSettings};
pub use mocks::{InMemorySettingsRepository, MockClaimSubmitter};
