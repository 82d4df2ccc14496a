//! Impls - port implementations.
//!
//! # 含まれる実装
//! - **InMemoryStateStore**: keeps the last saved state in memory (tests, demos)
//! - **JsonFileStateStore**: one JSON document, replaced atomically on save
//! - **NoopEventSink / TracingEventSink / RecordingEventSink**: presentation sinks

pub mod event_sinks;
pub mod inmem_store;
pub mod json_file_store;

pub use self::event_sinks::{NoopEventSink, RecordingEventSink, TracingEventSink};
pub use self::inmem_store::InMemoryStateStore;
pub use self::json_file_store::JsonFileStateStore;
