//! Request bodies persisting a completed drag.
//!
//! `PATCH /cards/reorder` takes [`CardReorderRequest`] and
//! `PATCH /lists/reorder` takes [`ListReorderRequest`]. Both carry the
//! post-mutation position of every affected item and are applied by the
//! backend all-or-nothing.

use serde::{Deserialize, Serialize};

use crate::{card::CardId, list::ListId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPosition {
    pub id: CardId,
    pub position: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<ListId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardReorderRequest {
    pub cards: Vec<CardPosition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPosition {
    pub id: ListId,
    pub position: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListReorderRequest {
    pub lists: Vec<ListPosition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderRequest {
    Cards(CardReorderRequest),
    Lists(ListReorderRequest),
}

impl ReorderRequest {
    pub fn len(&self) -> usize {
        match self {
            Self::Cards(request) => request.cards.len(),
            Self::Lists(request) => request.lists.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
