//! EngineBuilder - engine の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info;

use super::config::EngineConfig;
use super::engine::QueueEngine;
use crate::domain::DeskId;
use crate::impls::{InMemoryStateStore, NoopEventSink};
use crate::ports::{Clock, EventSink, StateStore, StoreError, SystemClock};
use crate::queue::{DeskSelector, EngineState, InvariantViolation, TieBreak};

/// EngineBuilder は QueueEngine を構築
///
/// # 使用例
/// ```ignore
/// let engine = EngineBuilder::new()
///     .desks(&[1, 2])
///     .store(Arc::new(JsonFileStateStore::new("queue.json")))
///     .event_sink(Arc::new(TracingEventSink))
///     .open()
///     .await?;
/// ```
///
/// # Fail-fast 設計
/// - `open()` rejects an empty or duplicated desk list.
/// - A stored state is checked against the invariants and against the
///   configured desks before the engine accepts any request.
pub struct EngineBuilder {
    config: EngineConfig,
    store: Option<Arc<dyn StateStore>>,
    sink: Option<Arc<dyn EventSink>>,
    clock: Option<Arc<dyn Clock>>,
}

/// BuildError は engine 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("at least one desk must be configured")]
    NoDesks,

    #[error("desk {0} is configured more than once")]
    DuplicateDesk(DeskId),

    #[error("stored state has desks {stored:?} but the configuration has {configured:?}")]
    DeskMismatch {
        configured: Vec<DeskId>,
        stored: Vec<DeskId>,
    },

    #[error("stored state is corrupt: {0}")]
    CorruptState(#[from] InvariantViolation),

    #[error("could not load stored state: {0}")]
    Store(#[from] StoreError),
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            store: None,
            sink: None,
            clock: None,
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn desks(mut self, desks: &[u16]) -> Self {
        self.config.desks = desks.iter().copied().map(DeskId::new).collect();
        self
    }

    pub fn tie_break(mut self, tie_break: TieBreak) -> Self {
        self.config.tie_break = tie_break;
        self
    }

    /// Persistence port. Defaults to an [`InMemoryStateStore`].
    pub fn store<S: StateStore + 'static>(mut self, store: Arc<S>) -> Self {
        let store: Arc<dyn StateStore> = store;
        self.store = Some(store);
        self
    }

    /// Presentation port. Defaults to [`NoopEventSink`].
    pub fn event_sink<E: EventSink + 'static>(mut self, sink: Arc<E>) -> Self {
        let sink: Arc<dyn EventSink> = sink;
        self.sink = Some(sink);
        self
    }

    /// Defaults to [`SystemClock`].
    pub fn clock<C: Clock + 'static>(mut self, clock: Arc<C>) -> Self {
        let clock: Arc<dyn Clock> = clock;
        self.clock = Some(clock);
        self
    }

    fn validate(&self) -> Result<Vec<DeskId>, BuildError> {
        if self.config.desks.is_empty() {
            return Err(BuildError::NoDesks);
        }
        let mut seen = BTreeSet::new();
        for desk in &self.config.desks {
            if !seen.insert(*desk) {
                return Err(BuildError::DuplicateDesk(*desk));
            }
        }
        Ok(seen.into_iter().collect())
    }

    /// Validate, load the stored state (or start fresh) and hand back a
    /// ready engine.
    pub async fn open(self) -> Result<QueueEngine, BuildError> {
        let desks = self.validate()?;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryStateStore::new()) as Arc<dyn StateStore>);
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(NoopEventSink) as Arc<dyn EventSink>);
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);

        let state = match store.load().await? {
            Some(stored) => {
                stored.verify()?;
                let stored_desks = stored.desk_ids();
                if stored_desks != desks {
                    return Err(BuildError::DeskMismatch {
                        configured: desks,
                        stored: stored_desks,
                    });
                }
                info!(
                    customers = stored.registry.len(),
                    last_issued = ?stored.registry.last_issued(),
                    "restored queue state"
                );
                stored
            }
            None => {
                info!(desks = ?desks, "starting with empty queues");
                EngineState::new(&desks)
            }
        };

        Ok(QueueEngine::new(
            state,
            DeskSelector::new(self.config.tie_break),
            store,
            sink,
            clock,
        ))
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
