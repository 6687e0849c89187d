//! Log subscriber setup.

use anyhow::{Result, anyhow};
use sessionstore_execution::{RegistryEvent, RegistryEventLayer};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Level used before the configured one is known.
const BOOTSTRAP_LEVEL: &str = "info";

/// Runs `f` under a temporary stderr subscriber.
///
/// Config loading logs before `init` can install the configured subscriber.
pub fn bootstrap<T>(json: bool, f: impl FnOnce() -> T) -> T {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(BOOTSTRAP_LEVEL));
    bootstrap_with_writer(filter, json, std::io::stderr, f)
}

fn bootstrap_with_writer<W, T>(
    filter: EnvFilter,
    json: bool,
    writer: W,
    f: impl FnOnce() -> T,
) -> T
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = if json {
        Box::new(tracing_subscriber::fmt::layer().json().with_writer(writer))
    } else {
        Box::new(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(writer),
        )
    };

    let subscriber = tracing_subscriber::registry().with(fmt_layer).with(filter);
    tracing::subscriber::with_default(subscriber, f)
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `default_level`. Logs go to stderr so command output
/// on stdout stays machine-readable. With `capture_events`, registry events
/// are also forwarded to the returned receiver.
pub fn init(
    default_level: &str,
    json: bool,
    capture_events: bool,
) -> Result<Option<UnboundedReceiver<RegistryEvent>>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("Invalid log level '{}': {}", default_level, e))?;

    let (event_layer, receiver) = if capture_events {
        let (layer, receiver) = RegistryEventLayer::channel();
        (Some(layer), Some(receiver))
    } else {
        (None, None)
    };

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(event_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(receiver)
}
