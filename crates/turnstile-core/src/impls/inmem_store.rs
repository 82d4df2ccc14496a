//! InMemoryStateStore - 開発用の StateStore

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::ports::{StateStore, StoreError};
use crate::queue::EngineState;

/// Holds the last saved state.
///
/// Saves can be made to fail on demand, which is how the rollback path is
/// exercised without a real disk.
#[derive(Default)]
pub struct InMemoryStateStore {
    saved: Mutex<Option<EngineState>>,
    failing: AtomicBool,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already saved state.
    pub fn with_state(state: EngineState) -> Self {
        Self {
            saved: Mutex::new(Some(state)),
            failing: AtomicBool::new(false),
        }
    }

    /// While set, every `save` fails with `StoreError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// The last successfully saved state.
    pub async fn saved(&self) -> Option<EngineState> {
        self.saved.lock().await.clone()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn load(&self) -> Result<Option<EngineState>, StoreError> {
        Ok(self.saved.lock().await.clone())
    }

    async fn save(&self, state: &EngineState) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store is set to fail".to_string(),
            ));
        }
        *self.saved.lock().await = Some(state.clone());
        Ok(())
    }
}
