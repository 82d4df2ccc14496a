//! JsonFileStateStore - the whole engine state as one JSON file.
//!
//! A save writes a sibling temp file, syncs it, then renames it over the
//! target. Readers therefore see either the old document or the new one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::ports::{StateStore, StoreError};
use crate::queue::EngineState;

pub struct JsonFileStateStore {
    path: PathBuf,
}

impl JsonFileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateStore for JsonFileStateStore {
    async fn load(&self) -> Result<Option<EngineState>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let state = serde_json::from_slice(&bytes)?;
        debug!(path = %self.path.display(), "loaded queue state");
        Ok(Some(state))
    }

    async fn save(&self, state: &EngineState) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        let temp = self.temp_path();

        if let Err(e) = commit(&temp, &self.path, &bytes).await {
            // The commit error is the one reported.
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }
        debug!(path = %self.path.display(), bytes = bytes.len(), "saved queue state");
        Ok(())
    }
}

async fn commit(temp: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(temp).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);
    tokio::fs::rename(temp, target).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeskId, Identity};
    use crate::queue::DeskSelector;
    use chrono::Utc;

    #[tokio::test]
    async fn missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStateStore::new(dir.path().join("queue.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn saved_state_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStateStore::new(dir.path().join("queue.json"));

        let mut state = EngineState::new(&[DeskId::new(1), DeskId::new(2)]);
        state
            .register(
                &DeskSelector::default(),
                Identity::parse("111111111111").unwrap(),
                "An",
                Utc::now(),
            )
            .unwrap();
        store.save(&state).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(state));
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn garbage_file_is_a_codec_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.json");
        std::fs::write(&path, b"not json").unwrap();

        let err = JsonFileStateStore::new(path).load().await.unwrap_err();
        assert!(matches!(err, StoreError::Codec(_)));
    }

    #[tokio::test]
    async fn unwritable_location_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStateStore::new(dir.path().join("missing-dir").join("queue.json"));
        let err = store
            .save(&EngineState::new(&[DeskId::new(1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[tokio::test]
    async fn failed_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.json");
        // A non-empty directory at the target makes the final rename fail.
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();

        let store = JsonFileStateStore::new(&path);
        let state = EngineState::new(&[DeskId::new(1)]);
        assert!(matches!(store.save(&state).await, Err(StoreError::Io(_))));
        assert!(!store.temp_path().exists());
    }
}
