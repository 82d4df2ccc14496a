//! EventSink port - presentation side of the engine.
//!
//! The engine never renders or announces anything itself. After each
//! committed mutation it hands the resulting events to the sink.

use async_trait::async_trait;

use crate::domain::DomainEvent;

#[derive(Debug, thiserror::Error)]
#[error("event sink failed: {0}")]
pub struct EventSinkError(pub String);

/// EventSink はドメインイベントを受け取る
///
/// Emission happens after commit. A failing sink is logged by the engine and
/// does not undo the operation.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: DomainEvent) -> Result<(), EventSinkError>;
}
