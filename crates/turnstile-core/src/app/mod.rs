//! App - アプリケーション層
//!
//! Combines the queue state with the ports.
//!
//! # 主要コンポーネント
//! - **EngineConfig**: desks and tie-break policy
//! - **EngineBuilder**: wiring and start-up validation
//! - **QueueEngine**: the atomic public operations
//! - **status**: read-only projections for the presentation side

pub mod builder;
pub mod config;
pub mod engine;
pub mod status;

pub use self::builder::{BuildError, EngineBuilder};
pub use self::config::EngineConfig;
pub use self::engine::QueueEngine;
pub use self::status::{DeskStatus, TicketStatus};
