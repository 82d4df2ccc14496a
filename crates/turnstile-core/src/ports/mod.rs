//! Ports - 抽象化レイヤー
//!
//! The engine's boundary with everything it does not do itself:
//! - **StateStore**: durable mirror of the engine state (persistence port)
//! - **EventSink**: receives committed events for rendering and
//!   announcement (presentation port)
//! - **Clock**: time source for issuance and service timestamps

pub mod clock;
pub mod event_sink;
pub mod state_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::{EventSink, EventSinkError};
pub use self::state_store::{StateStore, StoreError};
