//! Epoch Watcher
//!
//! Background task that refreshes the cycle countdown on a fixed tick and
//! announces every epoch rollover. The countdown is published on a `watch`
//! channel (latest value wins); closed epochs go out on an unbounded `mpsc`
//! channel so none are dropped and a slow listener never stalls the tick.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::domain::epoch::{EpochClosed, EpochSchedule, TimeRemaining};

/// Source of the current time
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock anchored at a wall-clock instant and advanced by the tokio timer,
/// so it ignores wall-clock jumps and follows paused time in tests.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    anchor: DateTime<Utc>,
    started: Instant,
}

impl MonotonicClock {
    pub fn starting_at(anchor: DateTime<Utc>) -> Self {
        Self {
            anchor,
            started: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.started.elapsed())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.anchor + elapsed
    }
}

/// Countdown snapshot published on every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochStatus {
    pub epoch: u64,
    pub remaining: TimeRemaining,
}

pub struct EpochWatcher<C: Clock> {
    schedule: EpochSchedule,
    clock: C,
    tick: Duration,
}

/// Receivers and controls of a running watcher
pub struct EpochWatcherHandle {
    pub status: watch::Receiver<EpochStatus>,
    pub closed: mpsc::UnboundedReceiver<EpochClosed>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<EpochSchedule>,
}

impl<C: Clock> EpochWatcher<C> {
    pub fn new(schedule: EpochSchedule, clock: C, tick: Duration) -> Self {
        Self {
            schedule,
            clock,
            tick,
        }
    }

    /// Spawn the watcher on the current tokio runtime
    pub fn spawn(self) -> EpochWatcherHandle {
        let now = self.clock.now();
        let initial = EpochStatus {
            epoch: self.schedule.number(),
            remaining: self.schedule.remaining(&now),
        };
        let (status_tx, status_rx) = watch::channel(initial);
        let (closed_tx, closed_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(self.run(status_tx, closed_tx, shutdown_rx));

        EpochWatcherHandle {
            status: status_rx,
            closed: closed_rx,
            shutdown: shutdown_tx,
            task,
        }
    }

    async fn run(
        mut self,
        status_tx: watch::Sender<EpochStatus>,
        closed_tx: mpsc::UnboundedSender<EpochClosed>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> EpochSchedule {
        tracing::info!(
            "Epoch watcher started - epoch {}, tick {:?}",
            self.schedule.number(),
            self.tick
        );

        let mut interval = tokio::time::interval(self.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let now = self.clock.now();
                    while let Some(closed) = self.schedule.poll(&now) {
                        if closed_tx.send(closed).is_err() {
                            tracing::debug!("No listener for epoch {} close", closed.epoch);
                        }
                    }
                    status_tx.send_replace(EpochStatus {
                        epoch: self.schedule.number(),
                        remaining: self.schedule.remaining(&now),
                    });
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Epoch watcher stopped at epoch {}", self.schedule.number());
        self.schedule
    }
}

impl EpochWatcherHandle {
    /// Latest published countdown
    pub fn current(&self) -> EpochStatus {
        *self.status.borrow()
    }

    /// Stop the task and return the schedule as it was left
    pub async fn shutdown(self) -> Result<EpochSchedule, tokio::task::JoinError> {
        let _ = self.shutdown.send(true);
        self.task.await
    }
}
