use anyhow::Result;
use serde_json::json;
use sessionstore_core::SessionRegistry;
use sessionstore_core::config::RegistryConfig;
use sessionstore_core::session_id::RequestSessionIdProvider;
use std::sync::Arc;

/// Simulates `sessions` server renders and prints the registry diagnostics.
pub fn run(config: RegistryConfig, sessions: usize) -> Result<()> {
    let registry = SessionRegistry::builder()
        .with_config(config)
        .with_session_ids(Arc::new(RequestSessionIdProvider::new()))
        .init()?;

    for _ in 0..sessions {
        registry.get_store()?;
    }

    let stats = registry.stats();
    stats.log();

    let report = json!({
        "stats": stats,
        "sessions": registry.list_sessions(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    registry.shutdown();
    Ok(())
}
