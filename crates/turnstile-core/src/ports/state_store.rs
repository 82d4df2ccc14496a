//! StateStore port - the durable copy of [`EngineState`].
//!
//! Any encoding is acceptable as long as `save` is all-or-nothing: after a
//! failed save the previously saved state must still load.

use async_trait::async_trait;

use crate::queue::EngineState;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// StateStore は engine state の正本を保存する
///
/// # 設計原則
/// - The engine calls `save` while holding its write lock, with the state it
///   is about to commit. It only commits in memory if `save` returned `Ok`.
/// - `load` is called once, when the engine is opened. `Ok(None)` means
///   nothing was ever saved.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self) -> Result<Option<EngineState>, StoreError>;

    async fn save(&self, state: &EngineState) -> Result<(), StoreError>;
}
