//! Custom tracing layer for streaming registry events to a consumer
//!
//! Captures events whose target starts with `session_` (the registry,
//! sweeper, serializer, and maintenance targets) and forwards them through
//! a tokio channel, e.g. to a dashboard or the CLI's event dump.

use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Target prefix shared by every registry log event.
pub const REGISTRY_TARGET_PREFIX: &str = "session_";

/// Event data sent to the consumer
#[derive(Debug, Clone, serde::Serialize)]
pub struct RegistryEvent {
    /// Event target (e.g., "session_sweeper")
    pub target: String,
    /// Log level (INFO, DEBUG, WARN, ERROR)
    pub level: String,
    pub message: String,
    /// Structured fields from the event, excluding `message`
    pub fields: HashMap<String, Value>,
    pub timestamp: String,
}

/// A tracing layer that sends registry events to a channel
pub struct RegistryEventLayer {
    sender: mpsc::UnboundedSender<RegistryEvent>,
}

impl RegistryEventLayer {
    pub fn new(sender: mpsc::UnboundedSender<RegistryEvent>) -> Self {
        Self { sender }
    }

    /// Creates a layer together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RegistryEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl<S> Layer<S> for RegistryEventLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let target = event.metadata().target();
        if !target.starts_with(REGISTRY_TARGET_PREFIX) {
            return;
        }

        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor(&mut fields));

        let message = match fields.remove("message") {
            Some(Value::String(message)) => message,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        let registry_event = RegistryEvent {
            target: target.to_string(),
            level: event.metadata().level().to_string(),
            message,
            fields,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        // Receiver may be gone; events are best-effort
        let _ = self.sender.send(registry_event);
    }
}

/// Field visitor that extracts tracing event fields into a HashMap
struct FieldVisitor<'a>(&'a mut HashMap<String, Value>);

impl tracing::field::Visit for FieldVisitor<'_> {
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(
            field.name().to_string(),
            serde_json::json!(format!("{:?}", value)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sessionstore_core::{SessionKey, SessionRegistry};
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_layer_forwards_registry_events_only() {
        let (layer, mut receiver) = RegistryEventLayer::channel();
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "unrelated", "ignored");
            let registry = SessionRegistry::builder().init().unwrap();
            registry.get_store_for(&SessionKey::from("k")).unwrap();
        });

        let mut events = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            events.push(event);
        }

        assert!(events.iter().all(|e| e.target.starts_with("session_")));
        let created = events
            .iter()
            .find(|e| e.message == "Created session store")
            .expect("creation event");
        assert_eq!(created.level, "INFO");
        assert_eq!(created.fields["session"], "k");
        assert_eq!(created.fields["total"], 1);
    }
}
