//! Rewards Integration Tests
//!
//! Exercise the public API end to end:
//! 1. Volume -> tier resolution -> rakeback estimate
//! 2. Config file -> tier table and boost
//! 3. Claim orchestration through the paper submitter and the earnings ledger
//!    (trader, creator and delegated streams)
//! 4. View state persisted through the JSON settings file
//!
//! All tests are deterministic (no real network calls).

use approx::assert_relative_eq;
use rust_decimal_macros::dec;
use std::io::Write;
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};

use rakeback::adapters::{JsonSettingsRepository, PaperClaimSubmitter};
use rakeback::application::{ClaimOrchestrator, Page, ViewState};
use rakeback::config::load_config;
use rakeback::domain::{
    estimate_rakeback, resolve_tier, ClaimRequest, ClaimStep, CurrencyUnit, CycleRecord,
    EarningStatus, EarningsLedger, EarningsSource, TierName, TierTable,
};
use rakeback::ports::{SettingsRepository, Theme};

// ============================================================================
// Tier resolution and estimates
// ============================================================================

#[test]
fn test_resolution_scenarios() {
    let table = TierTable::standard();

    let zero = resolve_tier(&table, 0.0).unwrap();
    assert_eq!(zero.tier.name, TierName::Bronze);
    assert_eq!(zero.next_tier.map(|t| t.name), Some(TierName::Silver));
    assert_eq!(zero.progress_fraction, 0.0);

    let gold = resolve_tier(&table, 87_500.0).unwrap();
    assert_eq!(gold.tier.name, TierName::Gold);
    assert_eq!(gold.next_tier.map(|t| t.name), Some(TierName::Platinum));
    assert_relative_eq!(gold.progress_fraction, 0.375);

    let boundary = resolve_tier(&table, 150_000.0).unwrap();
    assert_eq!(boundary.tier.name, TierName::Platinum);
    assert_eq!(boundary.next_tier.map(|t| t.name), Some(TierName::Diamond));
    assert_eq!(boundary.progress_fraction, 0.0);

    let master = resolve_tier(&table, 2_000_000.0).unwrap();
    assert_eq!(master.tier.name, TierName::Master);
    assert!(master.next_tier.is_none());
    assert_eq!(master.progress_fraction, 1.0);
}

#[test]
fn test_resolved_tier_feeds_estimate() {
    let table = TierTable::standard();
    let resolution = resolve_tier(&table, 87_500.0).unwrap();

    let raw = estimate_rakeback(87.97, resolution.tier.rakeback_percent).unwrap();
    assert_relative_eq!(raw, 87.97 * 0.04);

    let shown = resolution
        .tier
        .estimate_boosted(87.97, None, CurrencyUnit::Crypto)
        .unwrap();
    assert_eq!(shown, dec!(3.5188));
}

#[test]
fn test_rates_never_decrease_with_volume() {
    let table = TierTable::standard();
    let mut last_rate = 0.0;
    for step in 0..200 {
        let volume = step as f64 * 10_000.0;
        let rate = resolve_tier(&table, volume).unwrap().tier.rakeback_percent;
        assert!(rate >= last_rate, "rate dropped at volume {}", volume);
        last_rate = rate;
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_drives_tiers_and_boost() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"
[rakeback]
boost_enabled = true
boost_pct = 15.0

[[tiers.levels]]
name = "Bronze"
rakeback_percent = 0.02
volume_threshold = 0.0

[[tiers.levels]]
name = "Gold"
rakeback_percent = 0.04
volume_threshold = 50000.0
"#,
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    let table = config.tier_table().unwrap();
    let resolution = table.resolve(60_000.0).unwrap();
    assert_eq!(resolution.tier.name, TierName::Gold);
    assert!(resolution.is_max_tier());

    // 100 * 0.04 * 1.15
    let boosted = resolution
        .tier
        .estimate_boosted(100.0, config.boost(), CurrencyUnit::Fiat)
        .unwrap();
    assert_eq!(boosted, dec!(4.60));
}

// ============================================================================
// Claims
// ============================================================================

#[tokio::test]
async fn test_paper_claim_settles_ledger_cycle() {
    let ledger = EarningsLedger::from_records(vec![
        CycleRecord::trader(46, 2_400_000.0, 0.2950, "SOL").unwrap().claimed(),
        CycleRecord::trader(47, 3_100_000.0, 0.4521, "SOL").unwrap(),
        CycleRecord::creator(47, "MONKDOG", 0.8234, "SOL").unwrap(),
    ])
    .unwrap();
    assert_relative_eq!(ledger.claimable_total(EarningsSource::Trader, "SOL"), 0.4521);

    let request = ClaimRequest::new(EarningsSource::Trader, 0.4521, "SOL")
        .unwrap()
        .for_cycle(47);
    let submitter = PaperClaimSubmitter::new(Duration::ZERO, 1.0);
    let mut orchestrator = ClaimOrchestrator::new(submitter, request).with_ledger(ledger);

    assert_eq!(orchestrator.confirm().await.unwrap(), ClaimStep::Success);
    let receipt = orchestrator.flow().receipt().unwrap();
    assert!(receipt.short_signature().contains("..."));

    let ledger = orchestrator.ledger().unwrap();
    assert_eq!(ledger.eligible(EarningsSource::Trader).count(), 0);
    // Creator fees for the same cycle are a separate stream
    assert_eq!(
        ledger.get(EarningsSource::Creator, 47).unwrap().status,
        EarningStatus::Eligible
    );
}

#[tokio::test]
async fn test_failed_paper_claim_can_retry() {
    let request = ClaimRequest::new(EarningsSource::Creator, 12.5, "USD1").unwrap();
    let mut orchestrator =
        ClaimOrchestrator::new(PaperClaimSubmitter::new(Duration::ZERO, 0.0), request);

    assert_eq!(orchestrator.confirm().await.unwrap(), ClaimStep::Error);
    assert!(orchestrator.flow().last_error().is_some());
    assert!(orchestrator.can_retry());

    orchestrator.retry().unwrap();
    assert_eq!(orchestrator.step(), ClaimStep::Confirm);
}

#[tokio::test]
async fn test_delegated_fees_claimable_after_cycle_closes() {
    let mut ledger = EarningsLedger::from_records(vec![
        CycleRecord::delegated(47, "3bNf...qL7w", "MONKDOG", 0.0412, "SOL").unwrap().pending(),
        CycleRecord::delegated(46, "9xTr...wQ2m", "ApeMonk", 0.061, "SOL").unwrap(),
    ])
    .unwrap();
    assert_relative_eq!(ledger.claimable_total(EarningsSource::Delegated, "SOL"), 0.061);

    ledger.close_cycle(47);
    assert_relative_eq!(
        ledger.claimable_total(EarningsSource::Delegated, "SOL"),
        0.1022,
        epsilon = 1e-12
    );

    let request = ClaimRequest::new(EarningsSource::Delegated, 0.1022, "SOL").unwrap();
    let mut orchestrator =
        ClaimOrchestrator::new(PaperClaimSubmitter::new(Duration::ZERO, 1.0), request)
            .with_ledger(ledger);
    assert_eq!(orchestrator.confirm().await.unwrap(), ClaimStep::Success);

    let ledger = orchestrator.ledger().unwrap();
    assert_eq!(ledger.claimable_total(EarningsSource::Delegated, "SOL"), 0.0);
    assert_relative_eq!(
        ledger.lifetime_total(EarningsSource::Delegated, "SOL"),
        0.1022,
        epsilon = 1e-12
    );
}

// ============================================================================
// View state
// ============================================================================

#[test]
fn test_view_state_persists_across_sessions() {
    let dir = TempDir::new().unwrap();

    {
        let repo = JsonSettingsRepository::in_dir(dir.path());
        let mut view = ViewState::load(repo).unwrap();
        view.open_token("WIF");
        assert_eq!(view.page(), Page::Token);
        view.set_theme(Theme::Dark).unwrap();
        view.set_sidebar_pinned(true).unwrap();
    }

    let repo = JsonSettingsRepository::in_dir(dir.path());
    let stored = repo.load().unwrap();
    assert_eq!(stored.theme, Theme::Dark);
    assert!(stored.sidebar_pinned);

    // Navigation is not persisted
    let view = ViewState::load(repo).unwrap();
    assert_eq!(view.page(), Page::Home);
    assert_eq!(view.settings().theme, Theme::Dark);
}
