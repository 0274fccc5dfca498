use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use taskboard_client::BoardSession;
use taskboard_core::{AppConfig, BoardResult};
use taskboard_domain::{BoardId, CardId, ListId};
use taskboard_persistence::{DebouncedCacheWriter, FileBoardBackend, JsonFileCache};

pub struct CliContext {
    file: PathBuf,
    cache_dir: PathBuf,
    config: AppConfig,
}

impl CliContext {
    pub fn new(file: PathBuf, cache_dir: Option<PathBuf>, config: AppConfig) -> Self {
        let cache_dir = cache_dir.unwrap_or_else(|| config.effective_cache_dir());
        tracing::debug!(
            "Using board file {} and cache directory {}",
            file.display(),
            cache_dir.display()
        );
        Self {
            file,
            cache_dir,
            config,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn backend(&self) -> FileBoardBackend {
        FileBoardBackend::new(&self.file)
    }

    pub fn cache(&self) -> JsonFileCache {
        JsonFileCache::new(&self.cache_dir)
    }

    pub fn cache_retention(&self) -> Duration {
        self.config.cache_retention()
    }

    /// A loaded session whose drags are mirrored to the local cache.
    pub async fn open_session(
        &self,
        board_id: BoardId,
    ) -> BoardResult<BoardSession<FileBoardBackend>> {
        let writer =
            DebouncedCacheWriter::spawn(Arc::new(self.cache()), self.config.save_debounce());
        let session = BoardSession::new(board_id, self.backend()).with_cache_writer(writer);
        session.load().await?;
        Ok(session)
    }

    /// `open_session` for the board holding `list_id`.
    pub async fn open_list_session(
        &self,
        list_id: ListId,
    ) -> BoardResult<BoardSession<FileBoardBackend>> {
        let board_id = self.backend().board_of_list(list_id).await?;
        self.open_session(board_id).await
    }

    /// `open_session` for the board holding `card_id`.
    pub async fn open_card_session(
        &self,
        card_id: CardId,
    ) -> BoardResult<BoardSession<FileBoardBackend>> {
        let board_id = self.backend().board_of_card(card_id).await?;
        self.open_session(board_id).await
    }
}
