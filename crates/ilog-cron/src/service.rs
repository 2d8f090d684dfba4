//! Rotation service: sleeps until the next scheduled fire, then invokes
//! the tick callback.
//!
//! The callback is the only thing the service knows about rotation; the
//! session supplies one that re-derives the log target under its lock.
//! A failing tick is logged and the loop keeps going, so the next tick
//! retries.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use crate::types::RotationSchedule;

// ─────────────────────────────────────────────
// Callback type
// ─────────────────────────────────────────────

/// Callback invoked on each timer tick.
pub type OnTickFn =
    Arc<dyn Fn() -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>> + Send + Sync>;

// ─────────────────────────────────────────────
// RotationService
// ─────────────────────────────────────────────

/// Periodic timer driving log rotation.
pub struct RotationService {
    /// When to fire.
    schedule: RotationSchedule,
    /// What to run on each fire.
    on_tick: OnTickFn,
    /// Shutdown signal.
    shutdown: Arc<Notify>,
    /// Completed ticks, successful or not.
    ticks: AtomicU64,
}

impl RotationService {
    pub fn new(schedule: RotationSchedule, on_tick: OnTickFn) -> Self {
        Self {
            schedule,
            on_tick,
            shutdown: Arc::new(Notify::new()),
            ticks: AtomicU64::new(0),
        }
    }

    /// Run the timer loop until [`RotationService::stop`] is called.
    ///
    /// A tick that is already running when `stop` arrives completes first;
    /// the loop exits before sleeping again.
    pub async fn start(&self) -> anyhow::Result<()> {
        info!(schedule = ?self.schedule, "rotation timer started");

        loop {
            let Some(delay) = self.schedule.next_delay_from(Utc::now()) else {
                warn!("rotation schedule has no upcoming fire time, timer idle");
                self.shutdown.notified().await;
                info!("rotation timer shutting down");
                return Ok(());
            };

            debug!(sleep_ms = delay.as_millis() as u64, "rotation timer armed");

            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    self.tick().await;
                }
                _ = self.shutdown.notified() => {
                    info!("rotation timer shutting down");
                    return Ok(());
                }
            }
        }
    }

    /// Stop the timer loop.
    ///
    /// Stores a wake-up permit, so a stop issued while a tick is running is
    /// seen as soon as the loop comes back around.
    pub fn stop(&self) {
        debug!("stopping rotation timer");
        self.shutdown.notify_one();
    }

    #[cfg(test)]
    fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    async fn tick(&self) {
        let result = (self.on_tick)().await;
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        match result {
            Ok(()) => debug!(tick, "rotation tick completed"),
            Err(e) => error!(
                tick,
                error = format!("{e:#}"),
                "rotation tick failed, keeping current target"
            ),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
