//! Rakeback - Tiered trading rewards library
//!
//! Volume-based tier resolution, rakeback estimates, the reward cycle
//! countdown and the claim flow.
//!
//! # Modules
//!
//! - `domain`: Core business logic (TierTable, resolver, estimator, epochs, ClaimFlow)
//! - `ports`: Trait abstractions (ClaimSubmitter, SettingsRepository)
//! - `adapters`: External implementations (JSON settings, paper claims, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Claim orchestrator, view state and epoch watcher

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
