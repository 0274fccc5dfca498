use taskboard_core::BoardResult;

use crate::{
    list::ListId,
    reorder::{CardPosition, CardReorderRequest, ListPosition, ListReorderRequest, ReorderRequest},
    store::NormalizedStore,
};

pub mod card_commands;
pub mod list_commands;

pub use card_commands::*;
pub use list_commands::*;

/// A mutation of the normalized store.
///
/// Implementations validate everything up front and then swap new
/// sequences in, so a failed command leaves the store as it was.
pub trait Command: Send + Sync {
    fn execute(&self, store: &mut NormalizedStore) -> BoardResult<()>;

    /// Human-readable description of what this command does
    fn description(&self) -> String;
}

/// The store mutation a drag gesture resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderIntent {
    Lists(ReorderLists),
    Cards(ReorderCards),
    Move(MoveCard),
}

impl ReorderIntent {
    pub fn command(&self) -> &dyn Command {
        match self {
            Self::Lists(cmd) => cmd,
            Self::Cards(cmd) => cmd,
            Self::Move(cmd) => cmd,
        }
    }

    pub fn execute(&self, store: &mut NormalizedStore) -> BoardResult<()> {
        self.command().execute(store)
    }

    pub fn description(&self) -> String {
        self.command().description()
    }

    /// The backend request persisting this intent, read from the store
    /// after the intent was applied.
    pub fn persistence_request(&self, store: &NormalizedStore) -> ReorderRequest {
        match self {
            Self::Lists(_) => ReorderRequest::Lists(list_positions(store)),
            Self::Cards(cmd) => {
                ReorderRequest::Cards(card_positions(store, &[cmd.list_id], false))
            }
            Self::Move(cmd) => {
                ReorderRequest::Cards(card_positions(store, &[cmd.from_list, cmd.to_list], true))
            }
        }
    }
}

fn list_positions(store: &NormalizedStore) -> ListReorderRequest {
    ListReorderRequest {
        lists: store
            .lists()
            .iter()
            .map(|list| ListPosition {
                id: list.id,
                position: list.position,
            })
            .collect(),
    }
}

fn card_positions(
    store: &NormalizedStore,
    lists: &[ListId],
    with_list_id: bool,
) -> CardReorderRequest {
    let cards = lists
        .iter()
        .flat_map(|list_id| store.cards_in_list(*list_id))
        .map(|card| CardPosition {
            id: card.id,
            position: card.position,
            list_id: with_list_id.then_some(card.list_id),
        })
        .collect();
    CardReorderRequest { cards }
}

/// Move the item to `to`. The item is looked up at `from` first and by
/// identity otherwise; `to` past the end appends. Returns `None` when the
/// item is not in `sequence`.
pub(crate) fn reposition<T: Copy + PartialEq>(
    sequence: &[T],
    item: T,
    from: usize,
    to: usize,
) -> Option<Vec<T>> {
    let mut reordered = sequence.to_vec();
    let index = locate(sequence, item, from)?;
    reordered.remove(index);
    let to = to.min(reordered.len());
    reordered.insert(to, item);
    Some(reordered)
}

pub(crate) fn locate<T: Copy + PartialEq>(sequence: &[T], item: T, hint: usize) -> Option<usize> {
    if sequence.get(hint) == Some(&item) {
        Some(hint)
    } else {
        sequence.iter().position(|candidate| *candidate == item)
    }
}
