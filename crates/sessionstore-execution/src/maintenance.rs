//! Periodic registry maintenance.
//!
//! Lookups already sweep opportunistically; this task covers processes that
//! go quiet, and emits regular stats for operators.

use sessionstore_core::SessionRegistry;
use sessionstore_core::registry::RegistryStats;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

/// Result of one maintenance tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceReport {
    pub evicted: usize,
    pub stats: RegistryStats,
}

pub struct MaintenanceScheduler;

impl MaintenanceScheduler {
    /// Runs one sweep with the configured age and logs the resulting stats.
    pub fn run_once(registry: &SessionRegistry) -> MaintenanceReport {
        let evicted = registry.sweep_default();
        let stats = registry.stats();
        if evicted > 0 {
            tracing::info!(target: "session_maintenance", evicted, "Maintenance sweep evicted sessions");
        }
        stats.log();
        MaintenanceReport { evicted, stats }
    }

    /// Spawns the maintenance loop on the current tokio runtime.
    ///
    /// The first tick runs immediately. The loop ends when `cancel` fires or
    /// the registry is shut down.
    pub fn start(
        registry: Arc<SessionRegistry>,
        period: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(
                target: "session_maintenance",
                "Maintenance started ({}ms interval)",
                period.as_millis()
            );

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!(target: "session_maintenance", "Maintenance cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        if !registry.is_running() {
                            tracing::debug!(target: "session_maintenance", "Registry shut down, stopping maintenance");
                            break;
                        }
                        Self::run_once(&registry);
                    }
                }
            }
        })
    }

    /// `start` using the registry's configured interval.
    pub fn start_with_config(
        registry: Arc<SessionRegistry>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let period = Duration::from_secs(registry.config().maintenance_interval_secs);
        Self::start(registry, period, cancel)
    }
}
