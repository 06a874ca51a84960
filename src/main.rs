//! Rakeback - Tiered trading rewards CLI
//!
//! Tier lookup, rakeback estimates, cycle countdown and simulated claims.

use anyhow::{bail, Context, Result};
use chrono::{Local, Utc};
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

use rakeback::adapters::cli::{
    self, ClaimCmd, Command, EpochCmd, EstimateCmd, SettingsCmd, StreakCmd, TierCmd,
};
use rakeback::adapters::{JsonSettingsRepository, PaperClaimSubmitter};
use rakeback::application::{ClaimOrchestrator, EpochWatcher, SystemClock, ViewState};
use rakeback::config::{load_or_default, Config};
use rakeback::domain::claim::{ClaimRequest, ClaimStep};
use rakeback::domain::epoch::EpochSchedule;
use rakeback::domain::rakeback::{CurrencyUnit, RakebackBoost};
use rakeback::domain::streak::TradingStreak;
use rakeback::domain::tier::TierTable;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (RAKEBACK_SETTINGS_PATH may be set there)
    dotenvy::dotenv().ok();

    let app = cli::init();
    let config = load_or_default(app.config.as_deref())
        .context("Failed to load configuration")?;
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    match app.command {
        Command::Tiers => tiers_command(&config),
        Command::Tier(cmd) => tier_command(cmd, &config),
        Command::Estimate(cmd) => estimate_command(cmd, &config),
        Command::Epoch(cmd) => epoch_command(cmd, &config).await,
        Command::Claim(cmd) => claim_command(cmd, &config).await,
        Command::Streak(cmd) => streak_command(cmd),
        Command::Settings(cmd) => settings_command(cmd, &config),
    }
}

fn init_logging(verbose: bool, debug: bool, default_level: &str) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    fmt().with_env_filter(filter).with_target(false).init();
    Ok(())
}

fn tier_table(config: &Config) -> Result<TierTable> {
    config.tier_table().context("Invalid tier table in configuration")
}

fn tiers_command(config: &Config) -> Result<()> {
    let table = tier_table(config)?;

    println!("{:<4} {:<10} {:>9} {:>14}", "", "Tier", "Rakeback", "30d Volume");
    for tier in table.iter() {
        println!(
            "{:<4} {:<10} {:>8.0}% {:>14} {}",
            tier.name.icon(),
            tier.name,
            tier.display_percent(),
            format!("${:.0}", tier.volume_threshold),
            if tier.name.is_vip() { "VIP" } else { "" }
        );
    }
    Ok(())
}

fn tier_command(cmd: TierCmd, config: &Config) -> Result<()> {
    let table = tier_table(config)?;
    let resolution = table.resolve(cmd.volume)?;

    println!("Volume:   ${:.2}", resolution.volume);
    println!("Tier:     {} {}", resolution.tier.name.icon(), resolution.tier);
    match (resolution.next_tier, resolution.volume_to_next()) {
        (Some(next), Some(remaining)) => {
            println!("Next:     {} at ${:.0}", next.name, next.volume_threshold);
            println!("Needed:   ${:.2}", remaining);
            println!("Progress: {:.1}%", resolution.progress_percent());
        }
        _ => println!("Max tier reached"),
    }
    Ok(())
}

fn estimate_command(cmd: EstimateCmd, config: &Config) -> Result<()> {
    let table = tier_table(config)?;

    let tier = match (cmd.tier, cmd.volume) {
        (Some(name), _) => match table.get(name) {
            Some(tier) => *tier,
            None => bail!("Tier {} is not in the configured table", name),
        },
        (None, Some(volume)) => table.resolve(volume)?.tier,
        (None, None) => *table.min_tier(),
    };

    let boost = if cmd.boost {
        Some(RakebackBoost::new(config.rakeback.boost_pct)?)
    } else {
        config.boost()
    };
    let unit = CurrencyUnit::from(cmd.unit);

    let raw = tier.estimate_rakeback(cmd.notional)?;
    let shown = tier.estimate_boosted(cmd.notional, boost, unit)?;

    println!("Tier:      {}", tier);
    println!("Notional:  {}", cmd.notional);
    if let Some(boost) = boost {
        println!("Boost:     +{}%", boost.pct);
    }
    println!("Rakeback:  {}", shown);
    tracing::debug!("Unrounded, unboosted estimate: {}", raw);
    Ok(())
}

async fn epoch_command(cmd: EpochCmd, config: &Config) -> Result<()> {
    let now = Local::now();
    let schedule = EpochSchedule::current(config.epoch.number, &now, config.epoch.cycle_days)?;
    let remaining = schedule.remaining(&now.with_timezone(&Utc));

    println!("Epoch:     #{}", schedule.number());
    println!("Ends:      {}", schedule.ends_at().with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"));
    println!("Remaining: {} ({})", remaining.compact(), remaining.clock());

    if !cmd.watch {
        return Ok(());
    }

    let tick = Duration::from_millis(config.epoch.tick_interval_ms);
    let mut handle = EpochWatcher::new(schedule, SystemClock, tick).spawn();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
            Some(closed) = handle.closed.recv() => {
                println!("Epoch #{} closed at {}", closed.epoch, closed.ended_at);
            }
            changed = handle.status.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = handle.current();
                println!("#{} {}", status.epoch, status.remaining.clock());
            }
        }
    }

    let schedule = handle.shutdown().await.context("Epoch watcher failed")?;
    tracing::info!("Stopped at epoch {}", schedule.number());
    Ok(())
}

async fn claim_command(cmd: ClaimCmd, config: &Config) -> Result<()> {
    let probability = if cmd.fail { 0.0 } else { config.claim.success_probability };
    let submitter = PaperClaimSubmitter::new(Duration::from_millis(config.claim.latency_ms), probability);
    let mut request = ClaimRequest::new(cmd.source, cmd.amount, cmd.currency)?
        .with_network_fee(config.claim.network_fee.clone());
    if let Some(cycle) = cmd.cycle {
        request = request.for_cycle(cycle);
    }

    match request.cycle {
        Some(cycle) => println!(
            "Claim {} {} ({}, cycle #{})",
            request.amount, request.currency, request.source, cycle
        ),
        None => println!("Claim {} {} ({})", request.amount, request.currency, request.source),
    }
    println!("Network fee: {}", request.network_fee);

    let mut orchestrator = ClaimOrchestrator::new(submitter, request);
    let mut retries_left = cmd.retries;

    loop {
        println!("{}", ClaimStep::Processing.description());
        match orchestrator.confirm().await? {
            ClaimStep::Success => break,
            _ if retries_left > 0 && orchestrator.can_retry() => {
                retries_left -= 1;
                println!("Claim failed, retrying ({} left)", retries_left);
                orchestrator.retry()?;
            }
            _ => {
                let reason = orchestrator.flow().last_error().unwrap_or("unknown error");
                bail!("Claim failed after {} attempt(s): {}", orchestrator.flow().attempts(), reason);
            }
        }
    }

    if let Some(receipt) = orchestrator.flow().receipt() {
        println!("{}", ClaimStep::Success.description());
        println!("Signature: {}", receipt.short_signature());
        tracing::info!("Full signature: {}", receipt.signature);
    }
    Ok(())
}

fn streak_command(cmd: StreakCmd) -> Result<()> {
    let today = cmd.today.unwrap_or_else(|| Local::now().date_naive());
    let streak = TradingStreak::from_days(&cmd.days, today);

    println!("Current: {} day(s){}", streak.current, if streak.is_active() { "" } else { " (broken)" });
    println!("Best:    {} day(s)", streak.best);
    let week: Vec<String> = ["M", "T", "W", "T", "F", "S", "S"]
        .iter()
        .zip(streak.week)
        .map(|(label, traded)| if traded { label.to_string() } else { "-".to_string() })
        .collect();
    println!("Week:    {}", week.join(" "));
    Ok(())
}

fn settings_command(cmd: SettingsCmd, config: &Config) -> Result<()> {
    let repo = JsonSettingsRepository::new(config.settings.get_path());
    let path = repo.path().to_path_buf();
    let mut view = ViewState::load(repo)
        .with_context(|| format!("Failed to load settings from {}", path.display()))?;

    match cmd {
        SettingsCmd::Show => {}
        SettingsCmd::Set(set) => {
            if set.is_empty() {
                bail!("Nothing to change; pass --theme, --reduce-motion or --sidebar-pinned");
            }
            if let Some(theme) = set.theme {
                view.set_theme(theme)?;
            }
            if let Some(enabled) = set.reduce_motion {
                view.set_reduce_motion(enabled)?;
            }
            if let Some(pinned) = set.sidebar_pinned {
                view.set_sidebar_pinned(pinned)?;
            }
        }
        SettingsCmd::ToggleTheme { system_dark } => {
            view.toggle_theme(system_dark)?;
        }
    }

    let settings = view.settings();
    println!("Settings: {}", path.display());
    println!("  theme:          {}", settings.theme);
    println!("  reduce_motion:  {}", settings.reduce_motion);
    println!("  sidebar_pinned: {}", settings.sidebar_pinned);
    Ok(())
}
