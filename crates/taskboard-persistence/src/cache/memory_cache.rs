use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use taskboard_core::BoardResult;
use taskboard_domain::BoardId;

use super::{cache_key, CachedBoard};
use crate::traits::BoardCache;

/// Process-local cache slots, keyed like the durable ones.
#[derive(Debug, Default)]
pub struct MemoryCache {
    slots: Mutex<HashMap<String, CachedBoard>>,
    writes: AtomicUsize,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` calls served so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> Vec<String> {
        self.slots.lock().keys().cloned().collect()
    }
}

#[async_trait]
impl BoardCache for MemoryCache {
    async fn save(&self, board_id: BoardId, record: &CachedBoard) -> BoardResult<()> {
        self.slots.lock().insert(cache_key(board_id), record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load(&self, board_id: BoardId) -> BoardResult<Option<CachedBoard>> {
        Ok(self.slots.lock().get(&cache_key(board_id)).cloned())
    }

    async fn remove(&self, board_id: BoardId) -> BoardResult<()> {
        self.slots.lock().remove(&cache_key(board_id));
        Ok(())
    }
}
