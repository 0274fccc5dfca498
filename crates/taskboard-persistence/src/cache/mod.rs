//! Advisory, write-behind board cache.
//!
//! A record mirrors the normalized store under the key `board_{boardId}`
//! so a reload can render before the first fetch completes. It is never
//! consulted during reconciliation.

pub mod debounce;
pub mod json_file_cache;
pub mod memory_cache;

pub use debounce::DebouncedCacheWriter;
pub use json_file_cache::JsonFileCache;
pub use memory_cache::MemoryCache;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use taskboard_core::BoardResult;
use taskboard_domain::{BoardId, Card, CardId, List, ListId, NormalizedStore};

pub fn cache_key(board_id: BoardId) -> String {
    format!("board_{}", board_id)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedCards {
    pub cards: BTreeMap<CardId, Card>,
    pub cards_by_list: BTreeMap<ListId, Vec<CardId>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedBoard {
    pub lists: Vec<List>,
    pub cards: CachedCards,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl CachedBoard {
    pub fn from_store(store: &NormalizedStore) -> Self {
        Self {
            lists: store.lists().to_vec(),
            cards: CachedCards {
                cards: store.cards().clone(),
                cards_by_list: store.cards_by_list().clone(),
            },
            timestamp: Utc::now(),
        }
    }

    /// A record from the future (clock skew) counts as fresh.
    pub fn is_expired(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        match (now - self.timestamp).to_std() {
            Ok(age) => age > max_age,
            Err(_) => false,
        }
    }

    pub fn into_store(self) -> BoardResult<NormalizedStore> {
        NormalizedStore::from_parts(self.lists, self.cards.cards, self.cards.cards_by_list)
    }
}
