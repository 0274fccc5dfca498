use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use taskboard_core::{BoardError, BoardResult};
use taskboard_domain::{
    Board, BoardId, BoardSnapshot, Card, CardId, CardReorderRequest, CardUpdate, List, ListId,
    ListReorderRequest, ListSnapshot, NewCard,
};
use tokio::sync::Mutex;

use crate::store::json_file_store::FORMAT_VERSION;
use crate::store::JsonFileStore;
use crate::traits::{BoardBackend, PersistenceMetadata, PersistenceStore, StoreSnapshot};

/// Every board with its lists and cards, as kept in the backing file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardDatabase {
    #[serde(default)]
    pub boards: Vec<BoardSnapshot>,
}

impl BoardDatabase {
    fn board_index(&self, board_id: BoardId) -> Option<usize> {
        self.boards.iter().position(|b| b.board.id == board_id)
    }

    /// (board index, list index)
    fn find_list(&self, list_id: ListId) -> Option<(usize, usize)> {
        self.boards.iter().enumerate().find_map(|(b, board)| {
            board
                .lists
                .iter()
                .position(|l| l.list.id == list_id)
                .map(|l| (b, l))
        })
    }

    /// (board index, list index, card index)
    fn find_card(&self, card_id: CardId) -> Option<(usize, usize, usize)> {
        self.boards.iter().enumerate().find_map(|(b, board)| {
            board.lists.iter().enumerate().find_map(|(l, list)| {
                list.cards
                    .iter()
                    .position(|c| c.id == card_id)
                    .map(|c| (b, l, c))
            })
        })
    }
}

/// Reference backend keeping all boards in one JSON file.
///
/// Every change is validated and applied to a copy of the database, which
/// is then written in a single atomic step; a rejected request leaves the
/// file untouched.
pub struct FileBoardBackend {
    store: JsonFileStore,
    lock: Mutex<()>,
}

impl FileBoardBackend {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            store: JsonFileStore::new(path),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    async fn read(&self) -> BoardResult<BoardDatabase> {
        if !self.store.exists().await {
            return Ok(BoardDatabase::default());
        }
        let (snapshot, _metadata) = self.store.load().await?;
        serde_json::from_slice(&snapshot.data)
            .map_err(|e| BoardError::Serialization(e.to_string()))
    }

    async fn write(&self, db: &BoardDatabase) -> BoardResult<()> {
        let data = serde_json::to_vec(db).map_err(|e| BoardError::Serialization(e.to_string()))?;
        let snapshot = StoreSnapshot {
            data,
            metadata: PersistenceMetadata::new(FORMAT_VERSION, self.store.instance_id()),
        };
        self.store.save(snapshot).await?;
        Ok(())
    }

    pub async fn boards(&self) -> BoardResult<Vec<Board>> {
        let _guard = self.lock.lock().await;
        let db = self.read().await?;
        Ok(db.boards.into_iter().map(|b| b.board).collect())
    }

    pub async fn create_board(&self, name: String, color: Option<String>) -> BoardResult<Board> {
        let name = required(name, "Board name is required")?;
        let _guard = self.lock.lock().await;
        let mut db = self.read().await?;

        let board = Board::new(name, color);
        db.boards.push(BoardSnapshot::new(board.clone()));
        self.write(&db).await?;

        tracing::info!("Created board '{}' ({})", board.name, board.id);
        Ok(board)
    }

    /// The board holding a list.
    pub async fn board_of_list(&self, list_id: ListId) -> BoardResult<BoardId> {
        let _guard = self.lock.lock().await;
        let db = self.read().await?;
        let (b, _) = db
            .find_list(list_id)
            .ok_or_else(|| BoardError::NotFound(format!("List {} not found", list_id)))?;
        Ok(db.boards[b].board.id)
    }

    /// The board holding a card.
    pub async fn board_of_card(&self, card_id: CardId) -> BoardResult<BoardId> {
        let _guard = self.lock.lock().await;
        let db = self.read().await?;
        let (b, _, _) = db
            .find_card(card_id)
            .ok_or_else(|| BoardError::NotFound(format!("Card {} not found", card_id)))?;
        Ok(db.boards[b].board.id)
    }
}

#[async_trait]
impl BoardBackend for FileBoardBackend {
    async fn fetch_board(&self, board_id: BoardId) -> BoardResult<BoardSnapshot> {
        let _guard = self.lock.lock().await;
        let db = self.read().await?;

        let mut snapshot = db
            .boards
            .into_iter()
            .find(|b| b.board.id == board_id)
            .ok_or_else(|| BoardError::NotFound(format!("Board {} not found", board_id)))?;
        snapshot.lists.sort_by_key(|l| l.list.position);
        for list in &mut snapshot.lists {
            list.cards.sort_by_key(|c| c.position);
        }

        tracing::debug!(
            "Fetched board {} ({} lists, {} cards)",
            board_id,
            snapshot.lists.len(),
            snapshot.card_count()
        );
        Ok(snapshot)
    }

    async fn reorder_cards(&self, request: &CardReorderRequest) -> BoardResult<Vec<Card>> {
        if request.cards.is_empty() {
            return Err(BoardError::Validation("Cards array is required".to_string()));
        }
        let mut seen = HashSet::new();
        for entry in &request.cards {
            if !seen.insert(entry.id) {
                return Err(BoardError::Validation(format!(
                    "Card {} appears more than once",
                    entry.id
                )));
            }
            if entry.position < 0 {
                return Err(BoardError::Validation(format!(
                    "Card {} has negative position {}",
                    entry.id, entry.position
                )));
            }
        }

        let _guard = self.lock.lock().await;
        let mut db = self.read().await?;
        let now = Utc::now();
        let mut touched = BTreeSet::new();
        let mut updated = Vec::with_capacity(request.cards.len());

        for entry in &request.cards {
            let (b, l, c) = db
                .find_card(entry.id)
                .ok_or_else(|| BoardError::NotFound(format!("Card {} not found", entry.id)))?;
            let target = match entry.list_id {
                None => l,
                Some(list_id) => {
                    let (tb, tl) = db.find_list(list_id).ok_or_else(|| {
                        BoardError::NotFound(format!("List {} not found", list_id))
                    })?;
                    if tb != b {
                        return Err(BoardError::Validation(format!(
                            "Card {} cannot move to list {} of another board",
                            entry.id, list_id
                        )));
                    }
                    tl
                }
            };

            let board = &mut db.boards[b];
            let mut card = board.lists[l].cards.remove(c);
            card.position = entry.position;
            card.list_id = board.lists[target].list.id;
            card.updated_at = now;
            updated.push(card.clone());
            board.lists[target].cards.push(card);
            touched.insert((b, l));
            touched.insert((b, target));
        }

        for (b, l) in touched {
            db.boards[b].lists[l].cards.sort_by_key(|c| c.position);
        }
        self.write(&db).await?;

        tracing::info!("Persisted positions of {} cards", updated.len());
        Ok(updated)
    }

    async fn reorder_lists(&self, request: &ListReorderRequest) -> BoardResult<Vec<List>> {
        if request.lists.is_empty() {
            return Err(BoardError::Validation("Lists array is required".to_string()));
        }

        let _guard = self.lock.lock().await;
        let mut db = self.read().await?;
        let now = Utc::now();
        let mut board_index = None;

        for entry in &request.lists {
            let (b, l) = db
                .find_list(entry.id)
                .ok_or_else(|| BoardError::NotFound(format!("List {} not found", entry.id)))?;
            if *board_index.get_or_insert(b) != b {
                return Err(BoardError::Validation(
                    "Lists must belong to a single board".to_string(),
                ));
            }
            if entry.position < 0 {
                return Err(BoardError::Validation(format!(
                    "List {} has negative position {}",
                    entry.id, entry.position
                )));
            }
            let list = &mut db.boards[b].lists[l].list;
            list.position = entry.position;
            list.updated_at = now;
        }

        let Some(b) = board_index else {
            return Ok(Vec::new());
        };
        db.boards[b].lists.sort_by_key(|l| l.list.position);
        let lists = db.boards[b].lists.iter().map(|l| l.list.clone()).collect();
        self.write(&db).await?;

        tracing::info!("Persisted positions of {} lists", request.lists.len());
        Ok(lists)
    }

    async fn create_list(&self, board_id: BoardId, name: String) -> BoardResult<List> {
        let name = required(name, "List name is required")?;
        let _guard = self.lock.lock().await;
        let mut db = self.read().await?;

        let b = db
            .board_index(board_id)
            .ok_or_else(|| BoardError::NotFound(format!("Board {} not found", board_id)))?;
        let board = &mut db.boards[b];
        let position = next_position(board.lists.iter().map(|l| l.list.position));
        let list = List::new(board_id, name, position);
        board.lists.push(ListSnapshot {
            list: list.clone(),
            cards: Vec::new(),
        });
        self.write(&db).await?;

        tracing::info!("Created list '{}' on board {}", list.name, board_id);
        Ok(list)
    }

    async fn rename_list(&self, list_id: ListId, name: String) -> BoardResult<List> {
        let name = required(name, "List name is required")?;
        let _guard = self.lock.lock().await;
        let mut db = self.read().await?;

        let (b, l) = db
            .find_list(list_id)
            .ok_or_else(|| BoardError::NotFound(format!("List {} not found", list_id)))?;
        let list = &mut db.boards[b].lists[l].list;
        list.rename(name);
        let list = list.clone();
        self.write(&db).await?;

        tracing::info!("Renamed list {} to '{}'", list_id, list.name);
        Ok(list)
    }

    async fn delete_list(&self, list_id: ListId) -> BoardResult<()> {
        let _guard = self.lock.lock().await;
        let mut db = self.read().await?;

        let (b, l) = db
            .find_list(list_id)
            .ok_or_else(|| BoardError::NotFound(format!("List {} not found", list_id)))?;
        let removed = db.boards[b].lists.remove(l);
        self.write(&db).await?;

        tracing::info!(
            "Deleted list {} with {} cards",
            list_id,
            removed.cards.len()
        );
        Ok(())
    }

    async fn create_card(&self, list_id: ListId, mut card: NewCard) -> BoardResult<Card> {
        card.title = required(card.title, "Card title is required")?;
        card.description = card
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let _guard = self.lock.lock().await;
        let mut db = self.read().await?;

        let (b, l) = db
            .find_list(list_id)
            .ok_or_else(|| BoardError::NotFound(format!("List {} not found", list_id)))?;
        let list = &mut db.boards[b].lists[l];
        let position = next_position(list.cards.iter().map(|c| c.position));
        let card = card.into_card(list_id, position);
        list.cards.push(card.clone());
        self.write(&db).await?;

        tracing::info!("Created card '{}' in list {}", card.title, list_id);
        Ok(card)
    }

    async fn update_card(&self, card_id: CardId, mut updates: CardUpdate) -> BoardResult<Card> {
        if let Some(title) = updates.title.take() {
            updates.title = Some(required(title, "Card title cannot be empty")?);
        }
        let _guard = self.lock.lock().await;
        let mut db = self.read().await?;

        let (b, l, c) = db
            .find_card(card_id)
            .ok_or_else(|| BoardError::NotFound(format!("Card {} not found", card_id)))?;
        let card = &mut db.boards[b].lists[l].cards[c];
        card.update(updates);
        let card = card.clone();
        self.write(&db).await?;

        tracing::info!("Updated card {}", card_id);
        Ok(card)
    }

    async fn delete_card(&self, card_id: CardId) -> BoardResult<()> {
        let _guard = self.lock.lock().await;
        let mut db = self.read().await?;

        let (b, l, c) = db
            .find_card(card_id)
            .ok_or_else(|| BoardError::NotFound(format!("Card {} not found", card_id)))?;
        // Remaining positions keep their gap
        db.boards[b].lists[l].cards.remove(c);
        self.write(&db).await?;

        tracing::info!("Deleted card {}", card_id);
        Ok(())
    }
}

/// Trimmed `value`, or a validation error when nothing is left.
fn required(value: String, message: &str) -> BoardResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BoardError::Validation(message.to_string()));
    }
    Ok(value.to_string())
}

/// One past the highest position in use, zero for an empty container.
fn next_position(positions: impl Iterator<Item = i32>) -> i32 {
    positions.max().map_or(0, |max| max + 1)
}
