use super::{reposition, Command};
use crate::{card::CardId, list::ListId, store::NormalizedStore};
use taskboard_core::{BoardError, BoardResult};

/// Move a card to another index of the same list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderCards {
    pub card_id: CardId,
    pub list_id: ListId,
    pub from_index: usize,
    pub to_index: usize,
}

impl Command for ReorderCards {
    fn execute(&self, store: &mut NormalizedStore) -> BoardResult<()> {
        let ids = store
            .card_ids(self.list_id)
            .ok_or_else(|| BoardError::NotFound(format!("List {}", self.list_id)))?;
        let reordered = reposition(ids, self.card_id, self.from_index, self.to_index).ok_or_else(
            || BoardError::NotFound(format!("Card {} in list {}", self.card_id, self.list_id)),
        )?;

        store.commit_card_sequences(vec![(self.list_id, reordered)], None)
    }

    fn description(&self) -> String {
        format!("Move card {} to index {}", self.card_id, self.to_index)
    }
}

/// Move a card into another list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCard {
    pub card_id: CardId,
    pub from_list: ListId,
    pub from_index: usize,
    pub to_list: ListId,
    pub to_index: usize,
}

impl Command for MoveCard {
    fn execute(&self, store: &mut NormalizedStore) -> BoardResult<()> {
        if self.from_list == self.to_list {
            return ReorderCards {
                card_id: self.card_id,
                list_id: self.from_list,
                from_index: self.from_index,
                to_index: self.to_index,
            }
            .execute(store);
        }

        let source = store
            .card_ids(self.from_list)
            .ok_or_else(|| BoardError::NotFound(format!("List {}", self.from_list)))?;
        let dest = store
            .card_ids(self.to_list)
            .ok_or_else(|| BoardError::NotFound(format!("List {}", self.to_list)))?;

        let index = super::locate(source, self.card_id, self.from_index).ok_or_else(|| {
            BoardError::NotFound(format!("Card {} in list {}", self.card_id, self.from_list))
        })?;
        let mut new_source = source.to_vec();
        new_source.remove(index);
        let mut new_dest = dest.to_vec();
        new_dest.insert(self.to_index.min(new_dest.len()), self.card_id);

        store.commit_card_sequences(
            vec![(self.from_list, new_source), (self.to_list, new_dest)],
            Some((self.card_id, self.to_list)),
        )
    }

    fn description(&self) -> String {
        format!(
            "Move card {} to list {} at index {}",
            self.card_id, self.to_list, self.to_index
        )
    }
}
