//! EventSink implementations.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::DomainEvent;
use crate::ports::{EventSink, EventSinkError};

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

#[async_trait]
impl EventSink for NoopEventSink {
    async fn emit(&self, _event: DomainEvent) -> Result<(), EventSinkError> {
        Ok(())
    }
}

/// Writes each event as a structured log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: DomainEvent) -> Result<(), EventSinkError> {
        match event.announcement() {
            Some(text) => info!(desk = ?event.desk(), announcement = %text, "customer called"),
            None => info!(?event, "queue event"),
        }
        Ok(())
    }
}

/// Keeps every event in order; for tests and for displays that poll.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().await.clone()
    }

    /// Return and forget everything recorded so far.
    pub async fn drain(&self) -> Vec<DomainEvent> {
        std::mem::take(&mut *self.events.lock().await)
    }
}

#[async_trait]
impl EventSink for RecordingEventSink {
    async fn emit(&self, event: DomainEvent) -> Result<(), EventSinkError> {
        self.events.lock().await.push(event);
        Ok(())
    }
}
