//! Tier Resolver
//!
//! Maps a volume figure onto the tier table: the current tier is the last
//! tier whose threshold does not exceed the volume, and progress is measured
//! linearly between the current and the next threshold.

use serde::Serialize;

use super::error::{ensure_non_negative, RewardsError};
use super::tier::{Tier, TierTable};

/// Result of resolving a volume against a tier table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierResolution {
    pub tier: Tier,
    pub next_tier: Option<Tier>,
    /// Always in [0, 1]; exactly 1 at the top tier
    pub progress_fraction: f64,
    pub volume: f64,
}

impl TierResolution {
    /// Volume still needed to reach the next tier
    pub fn volume_to_next(&self) -> Option<f64> {
        self.next_tier
            .map(|next| (next.volume_threshold - self.volume).max(0.0))
    }

    /// Progress as a percentage for progress bars
    pub fn progress_percent(&self) -> f64 {
        self.progress_fraction * 100.0
    }

    pub fn is_max_tier(&self) -> bool {
        self.next_tier.is_none()
    }
}

/// Resolve `volume` to its tier, next tier and progress fraction.
///
/// Fails with [`RewardsError::InvalidArgument`] for negative or non-finite volume.
pub fn resolve_tier(table: &TierTable, volume: f64) -> Result<TierResolution, RewardsError> {
    let volume = ensure_non_negative("volume", volume)?;

    // Bronze sits at 0, so a match always exists for volume >= 0
    let idx = table
        .tiers()
        .iter()
        .rposition(|t| t.volume_threshold <= volume)
        .unwrap_or(0);

    let tier = table.tiers()[idx];
    let next_tier = table.tiers().get(idx + 1).copied();

    let progress_fraction = match next_tier {
        Some(next) => {
            let span = next.volume_threshold - tier.volume_threshold;
            ((volume - tier.volume_threshold) / span).clamp(0.0, 1.0)
        }
        None => 1.0,
    };

    tracing::debug!(
        "Resolved volume {} to {} ({:.1}% to {})",
        volume,
        tier.name,
        progress_fraction * 100.0,
        next_tier.map_or("max".to_string(), |t| t.name.to_string())
    );

    Ok(TierResolution {
        tier,
        next_tier,
        progress_fraction,
        volume,
    })
}
