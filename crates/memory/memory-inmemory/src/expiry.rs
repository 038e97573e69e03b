//! Periodic expiry sweep.
//!
//! [`ExpiryScheduler::spawn`] starts a Tokio task that calls
//! [`MemoryStore::sweep_expired`] once per period. The first sweep happens one full
//! period after start, not immediately. The task runs until the returned
//! [`ExpiryHandle`] is stopped or dropped.

use memory_core::{MemoryStore, MAX_EXPIRY_INTERVAL_SECS};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::store::InMemoryMemoryStore;

/// Runs expiry sweeps against a store on a fixed period.
#[derive(Debug)]
pub struct ExpiryScheduler {
    store: InMemoryMemoryStore,
    period: Duration,
}

impl ExpiryScheduler {
    /// `period` is clamped to between one millisecond and [`MAX_EXPIRY_INTERVAL_SECS`].
    pub fn new(store: InMemoryMemoryStore, period: Duration) -> Self {
        Self {
            store,
            period: period.clamp(
                Duration::from_millis(1),
                Duration::from_secs(MAX_EXPIRY_INTERVAL_SECS),
            ),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawns the sweep loop on the current Tokio runtime.
    pub fn spawn(self) -> ExpiryHandle {
        let Self { store, period } = self;
        info!(period_secs = period.as_secs(), "Expiry scheduler started");

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let removed = store.sweep_expired().await;
                debug!(removed, "Expiry tick");
            }
        });

        ExpiryHandle {
            handle: Some(handle),
        }
    }
}

/// Owner's handle on a running expiry scheduler. Dropping it stops the task.
#[derive(Debug)]
pub struct ExpiryHandle {
    handle: Option<JoinHandle<()>>,
}

impl ExpiryHandle {
    /// Stops the sweep loop. Idempotent.
    pub fn stop(&mut self) {
        // Dropping a JoinHandle only detaches the task; it has to be aborted.
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Expiry scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ExpiryHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
