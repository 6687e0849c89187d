use anyhow::Result;
use sessionstore_core::SessionRegistry;
use sessionstore_core::config::RegistryConfig;
use sessionstore_core::session_id::RequestSessionIdProvider;
use sessionstore_execution::MaintenanceScheduler;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Fills a registry with throwaway server sessions, lets the maintenance
/// loop run for `duration_ms`, then prints the final stats.
pub async fn run(
    mut config: RegistryConfig,
    requests: usize,
    interval_ms: u64,
    duration_ms: u64,
    max_age_ms: Option<i64>,
) -> Result<()> {
    if let Some(max_age_ms) = max_age_ms {
        config.max_age_ms = max_age_ms;
    }

    let registry = SessionRegistry::builder()
        .with_config(config)
        .with_session_ids(Arc::new(RequestSessionIdProvider::new()))
        .init()?;

    for _ in 0..requests {
        registry.get_store()?;
    }

    let cancel = CancellationToken::new();
    let handle = MaintenanceScheduler::start(
        registry.clone(),
        Duration::from_millis(interval_ms.max(1)),
        cancel.clone(),
    );

    tokio::time::sleep(Duration::from_millis(duration_ms)).await;
    cancel.cancel();
    handle.await?;

    println!("{}", serde_json::to_string_pretty(&registry.stats())?);
    registry.shutdown();
    Ok(())
}
