use async_trait::async_trait;
use std::path::{Path, PathBuf};
use taskboard_core::{BoardError, BoardResult};
use taskboard_domain::BoardId;

use super::{cache_key, CachedBoard};
use crate::store::AtomicWriter;
use crate::traits::BoardCache;

/// One JSON file per board slot inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileCache {
    dir: PathBuf,
}

impl JsonFileCache {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self, board_id: BoardId) -> PathBuf {
        self.dir.join(format!("{}.json", cache_key(board_id)))
    }
}

#[async_trait]
impl BoardCache for JsonFileCache {
    async fn save(&self, board_id: BoardId, record: &CachedBoard) -> BoardResult<()> {
        let bytes =
            serde_json::to_vec(record).map_err(|e| BoardError::Serialization(e.to_string()))?;
        AtomicWriter::write_atomic(&self.slot_path(board_id), &bytes).await
    }

    async fn load(&self, board_id: BoardId) -> BoardResult<Option<CachedBoard>> {
        let path = self.slot_path(board_id);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(None);
        }

        let bytes = AtomicWriter::read_all(&path).await?;
        match serde_json::from_slice(&bytes) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                // An unreadable slot is as good as absent.
                tracing::warn!("Discarding unreadable cache slot {}: {}", path.display(), e);
                AtomicWriter::remove(&path).await?;
                Ok(None)
            }
        }
    }

    async fn remove(&self, board_id: BoardId) -> BoardResult<()> {
        AtomicWriter::remove(&self.slot_path(board_id)).await
    }
}
