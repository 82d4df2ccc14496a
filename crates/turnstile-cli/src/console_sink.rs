//! Presentation sink for the console: prints announcements as they happen.

use async_trait::async_trait;
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::Mutex;
use turnstile_core::domain::DomainEvent;
use turnstile_core::ports::{EventSink, EventSinkError};

pub struct ConsoleEventSink {
    out: Mutex<Stdout>,
}

impl ConsoleEventSink {
    pub fn new() -> Self {
        Self {
            out: Mutex::new(tokio::io::stdout()),
        }
    }
}

#[async_trait]
impl EventSink for ConsoleEventSink {
    async fn emit(&self, event: DomainEvent) -> Result<(), EventSinkError> {
        tracing::debug!(?event, "event");
        let Some(text) = event.announcement() else {
            return Ok(());
        };
        let mut out = self.out.lock().await;
        out.write_all(format!(">> {text}\n").as_bytes())
            .await
            .map_err(|e| EventSinkError(e.to_string()))?;
        out.flush().await.map_err(|e| EventSinkError(e.to_string()))
    }
}
