use super::{reposition, Command};
use crate::{list::ListId, store::NormalizedStore};
use taskboard_core::{BoardError, BoardResult};

/// Move a list to another index of the board's list sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderLists {
    pub list_id: ListId,
    pub from_index: usize,
    pub to_index: usize,
}

impl Command for ReorderLists {
    fn execute(&self, store: &mut NormalizedStore) -> BoardResult<()> {
        let order: Vec<ListId> = store.lists().iter().map(|l| l.id).collect();
        let reordered = reposition(&order, self.list_id, self.from_index, self.to_index)
            .ok_or_else(|| BoardError::NotFound(format!("List {}", self.list_id)))?;

        let lists = reordered
            .iter()
            .filter_map(|id| store.list(*id).cloned())
            .collect();
        store.commit_list_order(lists);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Move list {} to index {}", self.list_id, self.to_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, BoardSnapshot, List, ListSnapshot};

    fn board_with_lists(count: usize) -> (NormalizedStore, Vec<ListId>) {
        let board = Board::new("Alpha".to_string(), None);
        let mut snapshot = BoardSnapshot::new(board.clone());
        for position in 0..count {
            let list = List::new(board.id, format!("List {}", position), position as i32);
            snapshot.lists.push(ListSnapshot {
                list,
                cards: vec![],
            });
        }
        let ids = snapshot.lists.iter().map(|l| l.list.id).collect();
        (NormalizedStore::from_snapshot(snapshot), ids)
    }

    #[test]
    fn test_reorder_lists_rewrites_positions() {
        let (mut store, ids) = board_with_lists(3);

        ReorderLists {
            list_id: ids[2],
            from_index: 2,
            to_index: 0,
        }
        .execute(&mut store)
        .unwrap();

        let order: Vec<_> = store.lists().iter().map(|l| (l.id, l.position)).collect();
        assert_eq!(order, vec![(ids[2], 0), (ids[0], 1), (ids[1], 2)]);
        store.validate().unwrap();
    }

    #[test]
    fn test_reorder_lists_to_end() {
        let (mut store, ids) = board_with_lists(3);

        ReorderLists {
            list_id: ids[0],
            from_index: 0,
            to_index: 3,
        }
        .execute(&mut store)
        .unwrap();

        assert_eq!(store.lists().last().unwrap().id, ids[0]);
        store.validate().unwrap();
    }

    #[test]
    fn test_reorder_unknown_list_leaves_store_alone() {
        let (mut store, _) = board_with_lists(2);
        let before = store.clone();

        let result = ReorderLists {
            list_id: uuid::Uuid::new_v4(),
            from_index: 0,
            to_index: 1,
        }
        .execute(&mut store);

        assert!(matches!(result, Err(BoardError::NotFound(_))));
        assert_eq!(store, before);
    }
}
