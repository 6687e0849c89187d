use anyhow::{Context, Result};
use serde_json::json;
use sessionstore_application::HydrationUseCase;
use sessionstore_core::SessionRegistry;
use sessionstore_core::config::RegistryConfig;
use sessionstore_core::session_id::{BrowserSessionIdProvider, RequestSessionIdProvider};
use sessionstore_core::state::{Action, ThemeMode};
use sessionstore_execution::RegistryEvent;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Runs one server render and one client mount, then prints what happened.
pub fn run(
    config: RegistryConfig,
    favorites: &[String],
    dark: bool,
    events: Option<UnboundedReceiver<RegistryEvent>>,
) -> Result<()> {
    // Composition roots: one registry per execution context.
    let server = HydrationUseCase::new(
        SessionRegistry::builder()
            .with_config(config.clone())
            .with_session_ids(Arc::new(RequestSessionIdProvider::new()))
            .init()?,
    );
    let client = HydrationUseCase::new(
        SessionRegistry::builder()
            .with_config(config)
            .with_session_ids(Arc::new(BrowserSessionIdProvider::new()))
            .init()?,
    );

    let page = server.server_render(|store| {
        for id in favorites {
            store.dispatch(Action::AddFavorite(id.clone()));
        }
        if dark {
            store.dispatch(Action::SetTheme(ThemeMode::Dark));
        }
    })?;

    let store = client.client_mount(page.payload.as_ref())?;
    let client_session = client.registry().current_session();

    let report = json!({
        "server": {
            "session": page.session,
            "payload": page.payload.as_ref().map(|p| p.as_str()),
            "stats": server.registry().stats(),
        },
        "client": {
            "session": client_session,
            "storeId": store.id(),
            "state": store.state(),
            "stats": client.registry().stats(),
        },
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to render report")?
    );

    if let Some(mut receiver) = events {
        while let Ok(event) = receiver.try_recv() {
            println!("{}", serde_json::to_string(&event)?);
        }
    }

    server.registry().shutdown();
    client.registry().shutdown();
    Ok(())
}
