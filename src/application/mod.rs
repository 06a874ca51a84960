//! Application Layer - Use cases wiring domain logic to ports

pub mod claim_orchestrator;
pub mod epoch_watcher;
pub mod view_state;

pub use claim_orchestrator::ClaimOrchestrator;
pub use epoch_watcher::{
    Clock, EpochStatus, EpochWatcher, EpochWatcherHandle, MonotonicClock, SystemClock,
};
pub use view_state::{Page, ViewState};
