use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{card::Card, list::List};

pub type BoardId = Uuid;

const DEFAULT_BOARD_COLOR: &str = "#0079BF";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_color() -> String {
    DEFAULT_BOARD_COLOR.to_string()
}

impl Board {
    pub fn new(name: String, color: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            color: color.unwrap_or_else(default_color),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A list as returned inside a board fetch, carrying its cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSnapshot {
    #[serde(flatten)]
    pub list: List,
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// The full board body of `GET /boards/{id}`: board fields plus nested
/// lists and cards, both ordered by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(flatten)]
    pub board: Board,
    #[serde(default)]
    pub lists: Vec<ListSnapshot>,
}

impl BoardSnapshot {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            lists: Vec::new(),
        }
    }

    pub fn id(&self) -> BoardId {
        self.board.id
    }

    pub fn list(&self, id: Uuid) -> Option<&ListSnapshot> {
        self.lists.iter().find(|l| l.list.id == id)
    }

    pub fn card_count(&self) -> usize {
        self.lists.iter().map(|l| l.cards.len()).sum()
    }
}
