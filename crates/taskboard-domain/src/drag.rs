//! Translation of a finished drag gesture into a store mutation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    board::BoardId,
    card::CardId,
    commands::{MoveCard, ReorderCards, ReorderIntent, ReorderLists},
    list::ListId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    List,
    Card,
}

/// A container and an index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropLocation {
    pub container_id: Uuid,
    pub index: usize,
}

impl DropLocation {
    pub fn new(container_id: Uuid, index: usize) -> Self {
        Self {
            container_id,
            index,
        }
    }
}

/// A completed drag. `destination` is `None` when the item was released
/// outside any drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragGesture {
    pub item_id: Uuid,
    pub kind: ItemKind,
    pub source: DropLocation,
    pub destination: Option<DropLocation>,
}

impl DragGesture {
    pub fn card(card_id: CardId, source: DropLocation, destination: Option<DropLocation>) -> Self {
        Self {
            item_id: card_id,
            kind: ItemKind::Card,
            source,
            destination,
        }
    }

    /// A list drag. Lists only ever move within their own board, so both
    /// ends use the board as container.
    pub fn list(list_id: ListId, board_id: BoardId, from: usize, to: Option<usize>) -> Self {
        Self {
            item_id: list_id,
            kind: ItemKind::List,
            source: DropLocation::new(board_id, from),
            destination: to.map(|index| DropLocation::new(board_id, index)),
        }
    }

    /// The mutation this gesture asks for, or `None` for a no-op drop.
    pub fn interpret(&self) -> Option<ReorderIntent> {
        let destination = self.destination?;
        let same_container = self.source.container_id == destination.container_id;

        match self.kind {
            // Container ids are ignored: there is a single list sequence.
            ItemKind::List => {
                if self.source.index == destination.index {
                    return None;
                }
                Some(ReorderIntent::Lists(ReorderLists {
                    list_id: self.item_id,
                    from_index: self.source.index,
                    to_index: destination.index,
                }))
            }
            ItemKind::Card if same_container => {
                if self.source.index == destination.index {
                    return None;
                }
                Some(ReorderIntent::Cards(ReorderCards {
                    card_id: self.item_id,
                    list_id: self.source.container_id,
                    from_index: self.source.index,
                    to_index: destination.index,
                }))
            }
            ItemKind::Card => Some(ReorderIntent::Move(MoveCard {
                card_id: self.item_id,
                from_list: self.source.container_id,
                from_index: self.source.index,
                to_list: destination.container_id,
                to_index: destination.index,
            })),
        }
    }
}
