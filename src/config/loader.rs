//! Configuration Loader
//!
//! Loads and validates configuration from TOML files. Every section is
//! optional; missing values fall back to the production defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::claim::DEFAULT_NETWORK_FEE;
use crate::domain::epoch::DEFAULT_CYCLE_DAYS;
use crate::domain::rakeback::{RakebackBoost, DEFAULT_BOOST_PCT};
use crate::domain::tier::{Tier, TierTable, TierTableError};

/// Env var overriding the settings file location
pub const SETTINGS_PATH_ENV: &str = "RAKEBACK_SETTINGS_PATH";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure matching config.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tiers: TiersSection,
    pub rakeback: RakebackSection,
    pub epoch: EpochSection,
    pub claim: ClaimSection,
    pub settings: SettingsSection,
    pub logging: LoggingSection,
}

/// Custom tier table; empty means the standard table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TiersSection {
    pub levels: Vec<Tier>,
}

/// Rakeback payout configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RakebackSection {
    /// Apply the payout boost to estimates
    pub boost_enabled: bool,
    /// Boost in percent (15.0 = +15%)
    pub boost_pct: f64,
    /// Price used to express SOL balances in USD
    pub sol_price_usd: f64,
}

impl Default for RakebackSection {
    fn default() -> Self {
        Self {
            boost_enabled: false,
            boost_pct: DEFAULT_BOOST_PCT,
            sol_price_usd: 150.0,
        }
    }
}

/// Epoch cycle configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EpochSection {
    /// Number of the epoch currently running
    pub number: u64,
    /// Cycle length in days
    pub cycle_days: u32,
    /// Countdown refresh interval
    pub tick_interval_ms: u64,
}

impl Default for EpochSection {
    fn default() -> Self {
        Self {
            number: 1,
            cycle_days: DEFAULT_CYCLE_DAYS,
            tick_interval_ms: 1_000,
        }
    }
}

/// Claim simulation configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClaimSection {
    /// Simulated settlement latency
    pub latency_ms: u64,
    /// Probability a simulated claim settles (0-1)
    pub success_probability: f64,
    /// Fee label shown before confirming
    pub network_fee: String,
}

impl Default for ClaimSection {
    fn default() -> Self {
        Self {
            latency_ms: crate::adapters::paper_claim::DEFAULT_LATENCY_MS,
            success_probability: 1.0,
            network_fee: DEFAULT_NETWORK_FEE.to_string(),
        }
    }
}

/// UI settings storage section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SettingsSection {
    /// Settings file path, `~` expanded
    pub path: String,
}

impl Default for SettingsSection {
    fn default() -> Self {
        Self {
            path: "~/.config/rakeback/settings.json".to_string(),
        }
    }
}

impl SettingsSection {
    /// Get settings path with environment variable override
    /// Checks RAKEBACK_SETTINGS_PATH env var first, falls back to config value
    pub fn get_path(&self) -> PathBuf {
        let raw = std::env::var(SETTINGS_PATH_ENV).unwrap_or_else(|_| self.path.clone());
        PathBuf::from(shellexpand::tilde(&raw).to_string())
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid tier table: {0}")]
    TierError(#[from] TierTableError),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load from `path` when given, else use defaults
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tier_table()?;

        if !self.rakeback.boost_pct.is_finite() || self.rakeback.boost_pct < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "boost_pct must be >= 0, got {}",
                self.rakeback.boost_pct
            )));
        }

        if !self.rakeback.sol_price_usd.is_finite() || self.rakeback.sol_price_usd <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "sol_price_usd must be > 0, got {}",
                self.rakeback.sol_price_usd
            )));
        }

        if self.epoch.cycle_days == 0 {
            return Err(ConfigError::ValidationError(
                "cycle_days must be >= 1".to_string(),
            ));
        }

        if self.epoch.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "tick_interval_ms must be > 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.claim.success_probability) {
            return Err(ConfigError::ValidationError(format!(
                "success_probability must be 0-1, got {}",
                self.claim.success_probability
            )));
        }

        if self.settings.path.is_empty() {
            return Err(ConfigError::ValidationError(
                "settings path cannot be empty".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging level must be one of {:?}, got {}",
                LOG_LEVELS, self.logging.level
            )));
        }

        Ok(())
    }

    /// Tier table from `[tiers]`, or the standard table when none is given
    pub fn tier_table(&self) -> Result<TierTable, ConfigError> {
        if self.tiers.levels.is_empty() {
            return Ok(TierTable::standard());
        }
        Ok(TierTable::new(self.tiers.levels.clone())?)
    }

    /// Configured boost, if enabled
    pub fn boost(&self) -> Option<RakebackBoost> {
        self.rakeback.boost_enabled.then(|| RakebackBoost {
            pct: self.rakeback.boost_pct,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tier::TierName;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn create_valid_config() -> String {
        r#"
[rakeback]
boost_enabled = true
boost_pct = 15.0
sol_price_usd = 150.0

[epoch]
number = 47
cycle_days = 3
tick_interval_ms = 1000

[claim]
latency_ms = 2200
success_probability = 0.9
network_fee = "~0.00025 SOL"

[settings]
path = "~/.config/rakeback/settings.json"

[logging]
level = "info"
"#
        .to_string()
    }

    #[test]
    fn test_load_valid_config() {
        let file = write_config(&create_valid_config());
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.epoch.number, 47);
        assert_eq!(config.claim.success_probability, 0.9);
        assert_eq!(config.claim.network_fee, "~0.00025 SOL");
        assert_eq!(config.boost().map(|b| b.pct), Some(15.0));
        assert_eq!(config.tier_table().unwrap(), TierTable::standard());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let file = write_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.epoch.cycle_days, DEFAULT_CYCLE_DAYS);
        assert_eq!(config.rakeback.sol_price_usd, 150.0);
        assert!(config.boost().is_none());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/nonexistent/path/config.toml");
        assert!(matches!(result.unwrap_err(), ConfigError::IoError(_)));
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = load_or_default(None).unwrap();
        assert_eq!(config.epoch.number, 1);
    }

    #[test]
    fn test_malformed_toml() {
        let file = write_config("[epoch\nnumber = ");
        assert!(matches!(load_config(file.path()).unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_custom_tier_table() {
        let file = write_config(
            r#"
[[tiers.levels]]
name = "Bronze"
rakeback_percent = 0.01
volume_threshold = 0.0

[[tiers.levels]]
name = "Gold"
rakeback_percent = 0.05
volume_threshold = 25000.0
"#,
        );
        let config = load_config(file.path()).unwrap();
        let table = config.tier_table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(30_000.0).unwrap().tier.name, TierName::Gold);
    }

    #[test]
    fn test_invalid_tier_table() {
        let file = write_config(
            r#"
[[tiers.levels]]
name = "Bronze"
rakeback_percent = 0.02
volume_threshold = 500.0
"#,
        );
        assert!(matches!(load_config(file.path()).unwrap_err(), ConfigError::TierError(_)));
    }

    #[test]
    fn test_invalid_cycle_days() {
        let file = write_config("[epoch]\ncycle_days = 0\n");
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_invalid_success_probability() {
        let file = write_config("[claim]\nsuccess_probability = 1.5\n");
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_invalid_log_level() {
        let file = write_config("[logging]\nlevel = \"loud\"\n");
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_settings_path_without_tilde() {
        let section = SettingsSection {
            path: "/tmp/rakeback/settings.json".to_string(),
        };
        if std::env::var(SETTINGS_PATH_ENV).is_err() {
            assert_eq!(section.get_path(), PathBuf::from("/tmp/rakeback/settings.json"));
        }
    }
}
