use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{board::BoardId, field_update::FieldUpdate, list::ListId};

pub type CardId = Uuid;
pub type LabelId = Uuid;
pub type UserId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: LabelId,
    pub name: String,
    pub color: String,
    pub board_id: BoardId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardLabel {
    pub id: Uuid,
    pub card_id: CardId,
    pub label_id: LabelId,
    pub label: Label,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMember {
    pub id: Uuid,
    pub card_id: CardId,
    pub user_id: UserId,
    pub user: MemberUser,
}

/// Urgency of a card's due date, as shown on its badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DueStatus {
    Overdue,
    Urgent,
    Soon,
    Normal,
}

/// A card as the reordering core sees it. `position` and `list_id` are the
/// only fields drag operations touch; everything else is carried through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub list_id: ListId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub position: i32,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: Vec<CardLabel>,
    #[serde(default)]
    pub members: Vec<CardMember>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A card to be created; the server assigns id and position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCard {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewCard {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Materialize at `position` of `list_id`.
    pub fn into_card(self, list_id: ListId, position: i32) -> Card {
        let mut card = Card::new(list_id, self.title, position);
        card.description = self.description;
        card.due_date = self.due_date;
        card
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardUpdate {
    pub title: Option<String>,
    pub description: FieldUpdate<String>,
    pub due_date: FieldUpdate<DateTime<Utc>>,
}

impl CardUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && !self.description.is_change() && !self.due_date.is_change()
    }
}

impl Card {
    pub fn new(list_id: ListId, title: String, position: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            list_id,
            title,
            description: None,
            position,
            due_date: None,
            labels: Vec::new(),
            members: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update(&mut self, updates: CardUpdate) {
        if let Some(title) = updates.title {
            self.title = title;
        }
        updates.description.apply_to(&mut self.description);
        updates.due_date.apply_to(&mut self.due_date);
        self.updated_at = Utc::now();
    }

    pub fn due_status(&self, now: DateTime<Utc>) -> Option<DueStatus> {
        const DAY_MS: i64 = 24 * 60 * 60 * 1000;

        let due = self.due_date?;
        let remaining_ms = (due - now).num_milliseconds();
        // Whole days left, rounded towards the future.
        let days =
            remaining_ms.div_euclid(DAY_MS) + i64::from(remaining_ms.rem_euclid(DAY_MS) != 0);

        Some(if days < 0 {
            DueStatus::Overdue
        } else if days <= 1 {
            DueStatus::Urgent
        } else if days <= 3 {
            DueStatus::Soon
        } else {
            DueStatus::Normal
        })
    }
}
