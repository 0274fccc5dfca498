//! One open board: load, optimistic drags, persistence and reconciliation.
//!
//! Creates, renames, updates and deletes are not optimistic: they go to the
//! backend first and the accepted record is then folded into the store.
//!
//! The store is mutated synchronously under a short lock and never while a
//! backend call is pending. Every optimistic mutation and every hydration
//! bumps a generation counter; a persistence response is only folded back
//! into the store when the generation it was issued at is still current.

use parking_lot::Mutex;
use std::time::Duration;
use taskboard_core::{BoardError, BoardResult};
use taskboard_domain::{
    BoardId, Card, CardId, CardUpdate, DragGesture, List, ListId, NewCard, NormalizedStore,
    ReorderRequest,
};
use taskboard_persistence::{BoardBackend, BoardCache, CachedBoard, DebouncedCacheWriter};
use tokio::sync::broadcast;

use crate::events::{SaveEvent, SaveNotifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// The gesture did not ask for a change.
    Ignored,
    /// The backend accepted the new positions.
    Saved,
    /// The backend rejected the save; the store was re-fetched.
    RolledBack { reason: String },
}

/// What the backend echoed for a persisted reorder.
enum Confirmed {
    Cards(Vec<Card>),
    Lists(Vec<List>),
}

#[derive(Debug, Default)]
struct SessionState {
    store: NormalizedStore,
    generation: u64,
}

pub struct BoardSession<B: BoardBackend> {
    board_id: BoardId,
    backend: B,
    state: Mutex<SessionState>,
    notifier: SaveNotifier,
    cache_writer: Option<DebouncedCacheWriter>,
}

impl<B: BoardBackend> BoardSession<B> {
    pub fn new(board_id: BoardId, backend: B) -> Self {
        Self {
            board_id,
            backend,
            state: Mutex::new(SessionState::default()),
            notifier: SaveNotifier::default(),
            cache_writer: None,
        }
    }

    /// Mirror the store to the advisory cache after every optimistic change.
    pub fn with_cache_writer(mut self, writer: DebouncedCacheWriter) -> Self {
        self.cache_writer = Some(writer);
        self
    }

    pub fn board_id(&self) -> BoardId {
        self.board_id
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// A copy of the current store.
    pub fn store(&self) -> NormalizedStore {
        self.state.lock().store.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SaveEvent> {
        self.notifier.subscribe()
    }

    /// Fetch the board and hydrate the store from it.
    pub async fn load(&self) -> BoardResult<()> {
        let snapshot = self.backend.fetch_board(self.board_id).await?;
        let lists = snapshot.lists.len();
        let cards = snapshot.card_count();

        let mut state = self.state.lock();
        state.store.hydrate(snapshot);
        state.generation += 1;
        tracing::info!(
            "Loaded board {} ({} lists, {} cards)",
            self.board_id,
            lists,
            cards
        );
        Ok(())
    }

    /// Hydrate from a fresh cache record while nothing has been loaded yet.
    ///
    /// Returns whether the cache was used. Cache problems are logged and
    /// reported as a miss.
    pub async fn warm_start(&self, cache: &dyn BoardCache, max_age: Duration) -> bool {
        if !self.state.lock().store.is_empty() {
            return false;
        }

        let record = match cache.load_fresh(self.board_id, max_age).await {
            Ok(Some(record)) => record,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!("Cache read for board {} failed: {}", self.board_id, e);
                return false;
            }
        };
        let store = match record.into_store() {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(
                    "Ignoring inconsistent cache record for board {}: {}",
                    self.board_id,
                    e
                );
                return false;
            }
        };

        let mut state = self.state.lock();
        // A fetch may have completed while the cache was being read
        if !state.store.is_empty() {
            return false;
        }
        state.store = store;
        state.generation += 1;
        tracing::info!("Warm-started board {} from cache", self.board_id);
        true
    }

    /// Apply a finished drag optimistically and persist it.
    ///
    /// A rejected save always triggers a full refetch. If that refetch fails
    /// as well, the optimistic store is left in place and
    /// `BoardError::Reconciliation` is returned.
    pub async fn handle_drag(&self, gesture: DragGesture) -> BoardResult<DragOutcome> {
        let Some(intent) = gesture.interpret() else {
            tracing::debug!("Ignoring no-op drag of {}", gesture.item_id);
            return Ok(DragOutcome::Ignored);
        };

        let (request, issued_at, record) = {
            let mut state = self.state.lock();
            intent.execute(&mut state.store)?;
            state.generation += 1;
            let request = intent.persistence_request(&state.store);
            (request, state.generation, self.cache_record(&state.store))
        };
        tracing::debug!("Applied {}", intent.description());
        self.schedule_cache(record);

        self.notifier.emit(SaveEvent::Started {
            board_id: self.board_id,
        });
        match self.persist(&request).await {
            Ok(confirmed) => {
                self.apply_confirmation(confirmed, issued_at);
                self.notifier.emit(SaveEvent::Succeeded {
                    board_id: self.board_id,
                });
                Ok(DragOutcome::Saved)
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!(
                    "Save of {} items on board {} rejected ({}): {}",
                    request.len(),
                    self.board_id,
                    e.category(),
                    reason
                );
                self.notifier.emit(SaveEvent::Failed {
                    board_id: self.board_id,
                    message: reason.clone(),
                });

                match self.reconcile().await {
                    Ok(()) => Ok(DragOutcome::RolledBack { reason }),
                    Err(refetch) => {
                        tracing::error!(
                            "Reconciliation of board {} failed: {}",
                            self.board_id,
                            refetch
                        );
                        Err(BoardError::Reconciliation {
                            reason,
                            source: Box::new(refetch),
                        })
                    }
                }
            }
        }
    }

    /// Throw the local state away and re-hydrate from the backend.
    pub async fn reconcile(&self) -> BoardResult<()> {
        let snapshot = self.backend.fetch_board(self.board_id).await?;

        let record = {
            let mut state = self.state.lock();
            state.store.hydrate(snapshot);
            state.generation += 1;
            self.cache_record(&state.store)
        };
        self.schedule_cache(record);

        tracing::info!("Reconciled board {} with the backend", self.board_id);
        Ok(())
    }

    /// Append a list to the board, then to the store.
    pub async fn create_list(&self, name: String) -> BoardResult<List> {
        let list = self.backend.create_list(self.board_id, name).await?;
        let local = list.clone();
        self.apply_accepted("new list", move |store| store.insert_list(local))
            .await?;
        Ok(list)
    }

    pub async fn rename_list(&self, list_id: ListId, name: String) -> BoardResult<List> {
        let list = self.backend.rename_list(list_id, name).await?;
        let name = list.name.clone();
        self.apply_accepted("list rename", move |store| {
            store.rename_list(list_id, name).map(|_| ())
        })
        .await?;
        Ok(list)
    }

    /// Delete a list and its cards.
    pub async fn delete_list(&self, list_id: ListId) -> BoardResult<()> {
        self.backend.delete_list(list_id).await?;
        self.apply_accepted("list removal", move |store| {
            store.remove_list(list_id).map(|_| ())
        })
        .await
    }

    /// Append a card to a list, then to the store.
    pub async fn create_card(&self, list_id: ListId, card: NewCard) -> BoardResult<Card> {
        let card = self.backend.create_card(list_id, card).await?;
        let local = card.clone();
        self.apply_accepted("new card", move |store| store.insert_card(local))
            .await?;
        Ok(card)
    }

    pub async fn update_card(&self, card_id: CardId, updates: CardUpdate) -> BoardResult<Card> {
        let card = self.backend.update_card(card_id, updates).await?;
        let local = card.clone();
        self.apply_accepted("card update", move |store| store.apply_confirmed_card(local))
            .await?;
        Ok(card)
    }

    pub async fn delete_card(&self, card_id: CardId) -> BoardResult<()> {
        self.backend.delete_card(card_id).await?;
        self.apply_accepted("card removal", move |store| {
            store.remove_card(card_id).map(|_| ())
        })
        .await
    }

    /// Stop the cache writer, flushing its pending record.
    pub async fn shutdown(self) {
        if let Some(writer) = self.cache_writer {
            writer.shutdown().await;
        }
    }

    async fn persist(&self, request: &ReorderRequest) -> BoardResult<Confirmed> {
        match request {
            ReorderRequest::Cards(cards) => {
                self.backend.reorder_cards(cards).await.map(Confirmed::Cards)
            }
            ReorderRequest::Lists(lists) => {
                self.backend.reorder_lists(lists).await.map(Confirmed::Lists)
            }
        }
    }

    fn apply_confirmation(&self, confirmed: Confirmed, issued_at: u64) {
        let record = {
            let mut state = self.state.lock();
            if state.generation != issued_at {
                tracing::debug!(
                    "Dropping stale confirmation for board {} (issued at {}, now {})",
                    self.board_id,
                    issued_at,
                    state.generation
                );
                return;
            }
            match confirmed {
                Confirmed::Cards(cards) => match state.store.apply_confirmed_cards(cards) {
                    Ok(applied) => tracing::debug!("Applied {} confirmed cards", applied),
                    Err(e) => {
                        tracing::warn!("Could not apply confirmed cards: {}", e);
                        return;
                    }
                },
                Confirmed::Lists(lists) => {
                    tracing::debug!("Applied {} confirmed lists", lists.len());
                    state.store.set_lists(lists);
                }
            }
            self.cache_record(&state.store)
        };
        self.schedule_cache(record);
    }

    /// Fold a change the backend already accepted into the store.
    ///
    /// If the store cannot take it, the board is re-fetched instead.
    async fn apply_accepted(
        &self,
        change: &str,
        apply: impl FnOnce(&mut NormalizedStore) -> BoardResult<()>,
    ) -> BoardResult<()> {
        let applied = {
            let mut state = self.state.lock();
            match apply(&mut state.store) {
                Ok(()) => {
                    state.generation += 1;
                    Ok(self.cache_record(&state.store))
                }
                Err(e) => Err(e),
            }
        };
        match applied {
            Ok(record) => {
                tracing::debug!("Applied {} to board {}", change, self.board_id);
                self.schedule_cache(record);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    "Could not apply {} to board {} ({}), reloading",
                    change,
                    self.board_id,
                    e
                );
                self.reconcile().await
            }
        }
    }

    fn cache_record(&self, store: &NormalizedStore) -> Option<CachedBoard> {
        self.cache_writer
            .as_ref()
            .map(|_| CachedBoard::from_store(store))
    }

    fn schedule_cache(&self, record: Option<CachedBoard>) {
        if let (Some(writer), Some(record)) = (&self.cache_writer, record) {
            writer.schedule(self.board_id, record);
        }
    }
}
