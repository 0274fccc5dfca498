use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use taskboard_core::BoardResult;
use taskboard_domain::{
    BoardId, BoardSnapshot, Card, CardId, CardReorderRequest, CardUpdate, List, ListId,
    ListReorderRequest, NewCard,
};
use uuid::Uuid;

use crate::cache::CachedBoard;

/// Metadata for persistence operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceMetadata {
    /// Version of the persistence format
    pub format_version: u32,
    /// ID of the instance that performed the save
    pub instance_id: Uuid,
    /// When this data was saved
    pub saved_at: DateTime<Utc>,
}

impl PersistenceMetadata {
    pub fn new(format_version: u32, instance_id: Uuid) -> Self {
        Self {
            format_version,
            instance_id,
            saved_at: Utc::now(),
        }
    }
}

/// Raw JSON payload plus the metadata it was saved with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub data: Vec<u8>,
    pub metadata: PersistenceMetadata,
}

/// Storage of a whole document (file, database, ...)
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    async fn save(&self, snapshot: StoreSnapshot) -> BoardResult<PersistenceMetadata>;

    async fn load(&self) -> BoardResult<(StoreSnapshot, PersistenceMetadata)>;

    async fn exists(&self) -> bool;

    fn path(&self) -> &Path;
}

/// The authoritative side of the board: `GET /boards/{id}`, the list and
/// card resources, `PATCH /cards/reorder` and `PATCH /lists/reorder`.
///
/// Every call is all-or-nothing: an `Err` means nothing was persisted.
/// Positions handed out by create and left behind by delete may have gaps.
#[async_trait]
pub trait BoardBackend: Send + Sync {
    /// The full board with lists and cards ordered by position.
    async fn fetch_board(&self, board_id: BoardId) -> BoardResult<BoardSnapshot>;

    /// Persist card positions (and list moves); returns the updated cards.
    async fn reorder_cards(&self, request: &CardReorderRequest) -> BoardResult<Vec<Card>>;

    /// Persist list positions; returns every list of the board in order.
    async fn reorder_lists(&self, request: &ListReorderRequest) -> BoardResult<Vec<List>>;

    /// Append a list after the last one of the board.
    async fn create_list(&self, board_id: BoardId, name: String) -> BoardResult<List>;

    async fn rename_list(&self, list_id: ListId, name: String) -> BoardResult<List>;

    /// Delete a list together with its cards.
    async fn delete_list(&self, list_id: ListId) -> BoardResult<()>;

    /// Append a card after the last one of the list.
    async fn create_card(&self, list_id: ListId, card: NewCard) -> BoardResult<Card>;

    async fn update_card(&self, card_id: CardId, updates: CardUpdate) -> BoardResult<Card>;

    async fn delete_card(&self, card_id: CardId) -> BoardResult<()>;
}

/// Durable keyed slots for the advisory board cache.
///
/// Never a source of truth: records only help a fresh start render before
/// the first fetch completes.
#[async_trait]
pub trait BoardCache: Send + Sync {
    async fn save(&self, board_id: BoardId, record: &CachedBoard) -> BoardResult<()>;

    async fn load(&self, board_id: BoardId) -> BoardResult<Option<CachedBoard>>;

    async fn remove(&self, board_id: BoardId) -> BoardResult<()>;

    /// Load a record younger than `max_age`. Older records are purged and
    /// reported as absent.
    async fn load_fresh(
        &self,
        board_id: BoardId,
        max_age: Duration,
    ) -> BoardResult<Option<CachedBoard>> {
        let Some(record) = self.load(board_id).await? else {
            return Ok(None);
        };
        if record.is_expired(Utc::now(), max_age) {
            tracing::info!("Discarding expired cache record for board {}", board_id);
            self.remove(board_id).await?;
            return Ok(None);
        }
        Ok(Some(record))
    }
}
