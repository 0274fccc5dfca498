pub mod board;
pub mod cache;
pub mod card;
pub mod list;

use crate::output;
use serde::Serialize;
use taskboard_client::{BoardSession, DragOutcome, SaveEvent, SaveStatus};
use taskboard_core::BoardResult;
use taskboard_domain::{BoardSnapshot, DragGesture};
use taskboard_persistence::FileBoardBackend;

#[derive(Serialize)]
struct DragReport {
    outcome: &'static str,
    status: String,
    events: Vec<SaveEvent>,
    board: Option<BoardSnapshot>,
}

/// Run a gesture through the session and report the result.
///
/// The session is shut down before reporting so the cache record is on disk.
pub async fn run_drag(session: BoardSession<FileBoardBackend>, gesture: DragGesture) {
    let mut rx = session.subscribe();
    let result = session.handle_drag(gesture).await;
    let store = session.store();
    session.shutdown().await;

    let mut status = SaveStatus::default();
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        status.apply(&event);
        events.push(event);
    }

    let outcome = match result {
        Ok(DragOutcome::Ignored) => "ignored",
        Ok(DragOutcome::Saved) => "saved",
        Ok(DragOutcome::RolledBack { reason }) => {
            output::output_error(&format!("Save rejected, board reloaded: {}", reason))
        }
        Err(e) => output::output_failure(&e.into()),
    };
    output::output_success(DragReport {
        outcome,
        status: status.label().to_string(),
        events,
        board: store.to_snapshot(),
    });
}

/// Shut the session down so its cache record is on disk, then report
/// the result of an edit.
pub async fn finish<T: Serialize>(
    session: BoardSession<FileBoardBackend>,
    result: BoardResult<T>,
) -> anyhow::Result<()> {
    session.shutdown().await;
    output::output_success(result?);
    Ok(())
}
