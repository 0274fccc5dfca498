use std::sync::Arc;
use std::time::Duration;
use taskboard_domain::BoardId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::CachedBoard;
use crate::traits::BoardCache;

type PendingWrite = (BoardId, CachedBoard);

/// Collapses bursts of cache writes into one write per quiet window.
///
/// Each `schedule` replaces the pending record and restarts the window;
/// the record is written once no newer one arrived for `window`.
pub struct DebouncedCacheWriter {
    tx: mpsc::UnboundedSender<PendingWrite>,
    handle: JoinHandle<()>,
}

impl DebouncedCacheWriter {
    pub fn spawn(cache: Arc<dyn BoardCache>, window: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(cache, window, rx));
        Self { tx, handle }
    }

    pub fn schedule(&self, board_id: BoardId, record: CachedBoard) {
        if self.tx.send((board_id, record)).is_err() {
            tracing::warn!("Cache writer stopped, dropping record for board {}", board_id);
        }
    }

    /// Stop the writer, flushing a pending record first.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.handle.await {
            tracing::error!("Cache writer task failed: {}", e);
        }
    }
}

async fn run(
    cache: Arc<dyn BoardCache>,
    window: Duration,
    mut rx: mpsc::UnboundedReceiver<PendingWrite>,
) {
    let mut pending: Option<PendingWrite> = None;
    let deadline = tokio::time::sleep(window);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(write) => {
                    pending = Some(write);
                    deadline.as_mut().reset(Instant::now() + window);
                }
                None => {
                    if let Some(write) = pending.take() {
                        flush(cache.as_ref(), write).await;
                    }
                    break;
                }
            },
            () = &mut deadline, if pending.is_some() => {
                if let Some(write) = pending.take() {
                    flush(cache.as_ref(), write).await;
                }
            }
        }
    }

    tracing::debug!("Cache writer stopped");
}

async fn flush(cache: &dyn BoardCache, (board_id, record): PendingWrite) {
    // The cache is advisory; a failed write only costs a slower warm start.
    match cache.save(board_id, &record).await {
        Ok(()) => tracing::debug!("Cached board {}", board_id),
        Err(e) => tracing::warn!("Failed to cache board {}: {}", board_id, e),
    }
}
