//! turnstile-core
//!
//! Ticket issuing and desk queue engine for a walk-in service counter.
//!
//! # モジュール構成
//! - **domain**: identifiers, customer records, ticket lifecycle, events, errors
//! - **queue**: ticket registry, desk queues, desk selection, engine state
//! - **ports**: StateStore (persistence), EventSink (presentation), Clock
//! - **impls**: in-memory and JSON file stores, event sinks
//! - **app**: configuration, builder, the concurrent `QueueEngine`, status views
//!
//! # Example
//! ```
//! use turnstile_core::app::{EngineBuilder, TicketStatus};
//! use turnstile_core::domain::{DeskId, Identity};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = EngineBuilder::new().desks(&[1, 2]).open().await?;
//!
//! let issued = engine.register_customer("An", "111111111111").await?;
//! assert_eq!(issued.ticket.get(), 1);
//!
//! let called = engine.call_next(DeskId::new(1)).await?;
//! assert_eq!(called.map(|c| c.name), Some("An".to_string()));
//!
//! let status = engine.status_of(&Identity::parse("111111111111")?).await;
//! assert_eq!(status, TicketStatus::InService { desk: DeskId::new(1) });
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod queue;

pub use app::{EngineBuilder, EngineConfig, QueueEngine};
pub use domain::QueueError;
