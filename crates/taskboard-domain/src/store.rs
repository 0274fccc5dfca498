//! Normalized, client-side copy of one board.
//!
//! Cards are owned once, in `cards`. `cards_by_list` is an ordering index
//! over them: every id it holds is a key of `cards`, and each card's
//! `list_id` names the one sequence containing it. Every mutation that
//! changes a sequence rewrites `position` of its cards to the sequence
//! index, so the two never drift.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use taskboard_core::{BoardError, BoardResult};

use crate::{
    board::{Board, BoardId, BoardSnapshot, ListSnapshot},
    card::{Card, CardId},
    list::{List, ListId},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedStore {
    #[serde(default)]
    board: Option<Board>,
    #[serde(default)]
    lists: Vec<List>,
    #[serde(default)]
    cards: BTreeMap<CardId, Card>,
    #[serde(default)]
    cards_by_list: BTreeMap<ListId, Vec<CardId>>,
}

impl NormalizedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        let mut store = Self::new();
        store.hydrate(snapshot);
        store
    }

    /// Rebuild a store from previously cached parts. Board metadata is not
    /// part of the cache, so `board()` stays empty until the next fetch.
    pub fn from_parts(
        lists: Vec<List>,
        cards: BTreeMap<CardId, Card>,
        cards_by_list: BTreeMap<ListId, Vec<CardId>>,
    ) -> BoardResult<Self> {
        let store = Self {
            board: None,
            lists,
            cards,
            cards_by_list,
        };
        store.validate()?;
        Ok(store)
    }

    /// Replace the whole store with a board fetch.
    ///
    /// Servers hand out `max + 1` on create and leave holes on delete, so
    /// positions are only trusted for ordering and renumbered from zero.
    pub fn hydrate(&mut self, snapshot: BoardSnapshot) {
        let BoardSnapshot { board, mut lists } = snapshot;
        lists.sort_by_key(|l| l.list.position);

        self.clear();
        self.board = Some(board);
        for (list_index, ListSnapshot { mut list, mut cards }) in lists.into_iter().enumerate() {
            cards.sort_by_key(|c| c.position);
            list.position = list_index as i32;
            let ids = cards.iter().map(|c| c.id).collect();
            self.cards_by_list.insert(list.id, ids);
            for (index, mut card) in cards.into_iter().enumerate() {
                card.position = index as i32;
                self.cards.insert(card.id, card);
            }
            self.lists.push(list);
        }
    }

    pub fn clear(&mut self) {
        self.board = None;
        self.lists.clear();
        self.cards.clear();
        self.cards_by_list.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty() && self.cards.is_empty()
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn board_id(&self) -> Option<BoardId> {
        self.board
            .as_ref()
            .map(|b| b.id)
            .or_else(|| self.lists.first().map(|l| l.board_id))
    }

    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    pub fn list(&self, id: ListId) -> Option<&List> {
        self.lists.iter().find(|l| l.id == id)
    }

    pub fn locate_list(&self, id: ListId) -> Option<usize> {
        self.lists.iter().position(|l| l.id == id)
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    pub fn cards(&self) -> &BTreeMap<CardId, Card> {
        &self.cards
    }

    pub fn cards_by_list(&self) -> &BTreeMap<ListId, Vec<CardId>> {
        &self.cards_by_list
    }

    pub fn card_ids(&self, list_id: ListId) -> Option<&[CardId]> {
        self.cards_by_list.get(&list_id).map(Vec::as_slice)
    }

    /// Cards of a list in render order.
    pub fn cards_in_list(&self, list_id: ListId) -> Vec<&Card> {
        self.card_ids(list_id)
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.cards.get(id))
            .collect()
    }

    /// The list holding a card and the card's index within it.
    pub fn locate_card(&self, id: CardId) -> Option<(ListId, usize)> {
        let card = self.cards.get(&id)?;
        let index = self
            .cards_by_list
            .get(&card.list_id)?
            .iter()
            .position(|c| *c == id)?;
        Some((card.list_id, index))
    }

    /// Rebuild the nested board shape, e.g. for comparisons with a fetch.
    pub fn to_snapshot(&self) -> Option<BoardSnapshot> {
        let board = self.board.clone()?;
        let lists = self
            .lists
            .iter()
            .map(|list| ListSnapshot {
                list: list.clone(),
                cards: self.cards_in_list(list.id).into_iter().cloned().collect(),
            })
            .collect();
        Some(BoardSnapshot { board, lists })
    }

    /// Swap in new card sequences as one step.
    ///
    /// Every list and card referenced is checked before anything is written,
    /// so an error leaves the store untouched. Positions of each replaced
    /// sequence are renumbered from zero; `reparent` moves one card's
    /// `list_id` to the given list.
    pub(crate) fn commit_card_sequences(
        &mut self,
        sequences: Vec<(ListId, Vec<CardId>)>,
        reparent: Option<(CardId, ListId)>,
    ) -> BoardResult<()> {
        for (list_id, ids) in &sequences {
            if !self.cards_by_list.contains_key(list_id) {
                return Err(BoardError::NotFound(format!("List {}", list_id)));
            }
            if let Some(missing) = ids.iter().find(|id| !self.cards.contains_key(id)) {
                return Err(BoardError::NotFound(format!("Card {}", missing)));
            }
        }
        if let Some((card_id, list_id)) = reparent {
            if !self.cards.contains_key(&card_id) {
                return Err(BoardError::NotFound(format!("Card {}", card_id)));
            }
            if !sequences.iter().any(|(id, _)| *id == list_id) {
                return Err(BoardError::Internal(format!(
                    "Reparent target {} is not among the committed lists",
                    list_id
                )));
            }
        }

        if let Some((card_id, list_id)) = reparent {
            if let Some(card) = self.cards.get_mut(&card_id) {
                card.list_id = list_id;
            }
        }
        for (list_id, ids) in sequences {
            self.renumber_cards(&ids);
            self.cards_by_list.insert(list_id, ids);
        }
        Ok(())
    }

    /// Swap in a new list order, renumbering list positions from zero.
    pub(crate) fn commit_list_order(&mut self, mut lists: Vec<List>) {
        for (index, list) in lists.iter_mut().enumerate() {
            list.position = index as i32;
        }
        self.lists = lists;
    }

    fn renumber_cards(&mut self, ids: &[CardId]) {
        for (index, id) in ids.iter().enumerate() {
            if let Some(card) = self.cards.get_mut(id) {
                card.position = index as i32;
            }
        }
    }

    /// Append a newly created card to the end of its list.
    pub fn insert_card(&mut self, mut card: Card) -> BoardResult<()> {
        let ids = self
            .cards_by_list
            .get_mut(&card.list_id)
            .ok_or_else(|| BoardError::NotFound(format!("List {}", card.list_id)))?;
        if ids.contains(&card.id) {
            return Err(BoardError::Validation(format!("Card {} already exists", card.id)));
        }
        card.position = ids.len() as i32;
        ids.push(card.id);
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Remove a card; the cards after it close the gap.
    pub fn remove_card(&mut self, id: CardId) -> BoardResult<Card> {
        let card = self
            .cards
            .remove(&id)
            .ok_or_else(|| BoardError::NotFound(format!("Card {}", id)))?;
        if let Some(ids) = self.cards_by_list.get_mut(&card.list_id) {
            ids.retain(|c| *c != id);
            let ids = ids.clone();
            self.renumber_cards(&ids);
        }
        Ok(card)
    }

    /// Apply a server-confirmed card, replacing the record wholesale.
    ///
    /// Within an unchanged list the card keeps its local position, since the
    /// server's numbering may have gaps. A changed `list_id` re-homes the id,
    /// ordered by the confirmed position.
    pub fn apply_confirmed_card(&mut self, mut card: Card) -> BoardResult<()> {
        let previous = self
            .cards
            .get(&card.id)
            .ok_or_else(|| BoardError::NotFound(format!("Card {}", card.id)))?;
        if !self.cards_by_list.contains_key(&card.list_id) {
            return Err(BoardError::NotFound(format!("List {}", card.list_id)));
        }
        if previous.list_id == card.list_id {
            card.position = previous.position;
            self.cards.insert(card.id, card);
            return Ok(());
        }
        self.apply_confirmed_cards(vec![card]).map(|_| ())
    }

    /// Apply server-confirmed cards, e.g. the body of a reorder response.
    ///
    /// Sequences touched by the update are re-sorted by the confirmed
    /// positions and renumbered. Cards or lists the store does not know are
    /// skipped; the number of applied cards is returned.
    pub fn apply_confirmed_cards(&mut self, cards: Vec<Card>) -> BoardResult<usize> {
        let mut touched = HashSet::new();
        let mut applied = 0;

        for card in cards {
            let Some(previous) = self.cards.get(&card.id) else {
                continue;
            };
            if !self.cards_by_list.contains_key(&card.list_id) {
                continue;
            }
            let previous_list = previous.list_id;
            if previous_list != card.list_id {
                if let Some(ids) = self.cards_by_list.get_mut(&previous_list) {
                    ids.retain(|c| *c != card.id);
                }
                if let Some(ids) = self.cards_by_list.get_mut(&card.list_id) {
                    ids.push(card.id);
                }
                touched.insert(previous_list);
            }
            touched.insert(card.list_id);
            self.cards.insert(card.id, card);
            applied += 1;
        }

        for list_id in touched {
            let cards = &self.cards;
            let Some(ids) = self.cards_by_list.get_mut(&list_id) else {
                continue;
            };
            ids.sort_by_key(|id| cards.get(id).map(|c| c.position).unwrap_or(i32::MAX));
            let ids = ids.clone();
            self.renumber_cards(&ids);
        }
        Ok(applied)
    }

    /// Append a newly created list.
    pub fn insert_list(&mut self, mut list: List) -> BoardResult<()> {
        if self.cards_by_list.contains_key(&list.id) {
            return Err(BoardError::Validation(format!("List {} already exists", list.id)));
        }
        if let Some(board_id) = self.board_id() {
            if list.board_id != board_id {
                return Err(BoardError::Validation(format!(
                    "List {} belongs to board {}, not {}",
                    list.id, list.board_id, board_id
                )));
            }
        }
        list.position = self.lists.len() as i32;
        self.cards_by_list.insert(list.id, Vec::new());
        self.lists.push(list);
        Ok(())
    }

    pub fn rename_list(&mut self, id: ListId, name: String) -> BoardResult<&List> {
        let list = self
            .lists
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| BoardError::NotFound(format!("List {}", id)))?;
        list.rename(name);
        Ok(list)
    }

    /// Remove a list together with its cards.
    pub fn remove_list(&mut self, id: ListId) -> BoardResult<List> {
        let index = self
            .locate_list(id)
            .ok_or_else(|| BoardError::NotFound(format!("List {}", id)))?;
        let mut remaining = self.lists.clone();
        let list = remaining.remove(index);
        for card_id in self.cards_by_list.remove(&id).unwrap_or_default() {
            self.cards.remove(&card_id);
        }
        self.commit_list_order(remaining);
        Ok(list)
    }

    /// Replace list records, e.g. after the server confirmed a list reorder.
    /// Lists that are new to the store get an empty card sequence; lists
    /// that disappeared lose their cards. Positions are renumbered.
    pub fn set_lists(&mut self, mut lists: Vec<List>) {
        lists.sort_by_key(|l| l.position);
        let keep: HashSet<ListId> = lists.iter().map(|l| l.id).collect();
        let dropped: Vec<ListId> = self
            .cards_by_list
            .keys()
            .filter(|id| !keep.contains(id))
            .copied()
            .collect();
        for list_id in dropped {
            for card_id in self.cards_by_list.remove(&list_id).unwrap_or_default() {
                self.cards.remove(&card_id);
            }
        }
        for list in &lists {
            self.cards_by_list.entry(list.id).or_default();
        }
        self.commit_list_order(lists);
    }

    /// Check the store invariants, reporting the first violation found.
    pub fn validate(&self) -> BoardResult<()> {
        let violation = |message: String| Err(BoardError::Internal(message));

        let list_ids: HashSet<ListId> = self.lists.iter().map(|l| l.id).collect();
        if list_ids.len() != self.lists.len() {
            return violation("duplicate list ids".to_string());
        }
        for (index, list) in self.lists.iter().enumerate() {
            if list.position != index as i32 {
                return violation(format!(
                    "list {} has position {} at index {}",
                    list.id, list.position, index
                ));
            }
            if !self.cards_by_list.contains_key(&list.id) {
                return violation(format!("list {} has no card sequence", list.id));
            }
        }

        let mut seen = HashSet::new();
        for (list_id, ids) in &self.cards_by_list {
            if !list_ids.contains(list_id) {
                return violation(format!("card sequence for unknown list {}", list_id));
            }
            for (index, id) in ids.iter().enumerate() {
                let Some(card) = self.cards.get(id) else {
                    return violation(format!("list {} references missing card {}", list_id, id));
                };
                if !seen.insert(*id) {
                    return violation(format!("card {} appears in more than one place", id));
                }
                if card.list_id != *list_id {
                    return violation(format!(
                        "card {} claims list {} but sits in {}",
                        id, card.list_id, list_id
                    ));
                }
                if card.position != index as i32 {
                    return violation(format!(
                        "card {} has position {} at index {}",
                        id, card.position, index
                    ));
                }
            }
        }
        if seen.len() != self.cards.len() {
            return violation(format!(
                "{} cards are not in any list",
                self.cards.len() - seen.len()
            ));
        }
        Ok(())
    }
}
