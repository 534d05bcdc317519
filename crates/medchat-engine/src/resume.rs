use async_trait::async_trait;
use medchat_types::{HistoryEntry, Session};

use crate::error::SessionInitError;

/// Turns a history entry back into a live session.
///
/// Resuming from the history list is not wired end to end yet; the engine
/// ships with [`NoopResumer`]. A real implementation returns the session to
/// install, or `None` to leave the live session alone.
#[async_trait]
pub trait SessionResumer: Send + Sync {
    async fn resume(&self, entry: &HistoryEntry) -> Result<Option<Session>, SessionInitError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResumer;

#[async_trait]
impl SessionResumer for NoopResumer {
    async fn resume(&self, entry: &HistoryEntry) -> Result<Option<Session>, SessionInitError> {
        tracing::debug!(entry_id = %entry.id, "Resume from history is not supported");
        Ok(None)
    }
}
