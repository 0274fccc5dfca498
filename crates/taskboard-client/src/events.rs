//! Save-status signals for observers that should not see the store.

use serde::Serialize;
use taskboard_domain::BoardId;
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SaveEvent {
    #[serde(rename_all = "camelCase")]
    Started { board_id: BoardId },
    #[serde(rename_all = "camelCase")]
    Succeeded { board_id: BoardId },
    #[serde(rename_all = "camelCase")]
    Failed { board_id: BoardId, message: String },
}

impl SaveEvent {
    pub fn board_id(&self) -> BoardId {
        match self {
            Self::Started { board_id }
            | Self::Succeeded { board_id }
            | Self::Failed { board_id, .. } => *board_id,
        }
    }
}

/// What a save indicator shows, folded from the event stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Error(String),
}

impl SaveStatus {
    pub fn apply(&mut self, event: &SaveEvent) {
        *self = match event {
            SaveEvent::Started { .. } => Self::Saving,
            SaveEvent::Succeeded { .. } => Self::Saved,
            SaveEvent::Failed { message, .. } => Self::Error(message.clone()),
        };
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Idle => "",
            Self::Saving => "Saving...",
            Self::Saved => "Saved",
            Self::Error(message) => message,
        }
    }
}

/// Publishes save events to any number of subscribers.
#[derive(Debug, Clone)]
pub struct SaveNotifier {
    tx: broadcast::Sender<SaveEvent>,
}

impl SaveNotifier {
    /// Slow subscribers lag once more than `capacity` events are queued.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SaveEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: SaveEvent) {
        // No subscriber is fine
        if self.tx.send(event).is_err() {
            tracing::trace!("Save event dropped, no subscribers");
        }
    }
}

impl Default for SaveNotifier {
    fn default() -> Self {
        Self::new(16)
    }
}
