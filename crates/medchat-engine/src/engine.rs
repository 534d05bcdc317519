use chrono::{DateTime, TimeZone};
use medchat_types::{HistoryEntry, Message, Pagination, Session};
use std::fmt;
use std::sync::Arc;

use crate::autoscroll::{Autoscroll, AutoscrollHandle, ScrollTarget};
use crate::builder::ChatEngineBuilder;
use crate::config::EngineConfig;
use crate::error::{HistoryLoadError, SendError, SessionInitError};
use crate::history::{HistoryListItem, HistoryPaginator, PageOutcome, ScrollMetrics};
use crate::resume::SessionResumer;
use crate::session::{ChatSession, InitOutcome};

/// Surface exposed to the chat and history screens
pub struct ChatEngine {
    session: Arc<ChatSession>,
    history: Arc<HistoryPaginator>,
    resumer: Arc<dyn SessionResumer>,
    config: EngineConfig,
}

impl ChatEngine {
    pub(crate) fn new(
        session: Arc<ChatSession>,
        history: Arc<HistoryPaginator>,
        resumer: Arc<dyn SessionResumer>,
        config: EngineConfig,
    ) -> Self {
        Self {
            session,
            history,
            resumer,
            config,
        }
    }

    pub fn builder() -> ChatEngineBuilder {
        ChatEngineBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<ChatSession> {
        &self.session
    }

    pub fn history(&self) -> &Arc<HistoryPaginator> {
        &self.history
    }

    // ---- live session -------------------------------------------------

    /// Create (or resume) the live session; inert without a credential
    pub async fn mount(&self) -> Result<InitOutcome, SessionInitError> {
        self.session.create_or_resume().await
    }

    /// Start a new conversation
    pub async fn new_conversation(&self) -> Result<InitOutcome, SessionInitError> {
        self.session.replace().await
    }

    pub async fn send_message(&self, text: &str) -> Result<Message, SendError> {
        self.session.send(text).await
    }

    pub fn current_log(&self) -> Vec<Message> {
        self.session.current_log()
    }

    pub fn is_session_ready(&self) -> bool {
        self.session.is_session_ready()
    }

    pub fn is_pending(&self) -> bool {
        self.session.is_pending()
    }

    /// Keep `target` scrolled to the newest message while the handle lives
    pub fn attach_autoscroll(&self, target: Arc<dyn ScrollTarget>) -> AutoscrollHandle {
        Autoscroll::new(self.config.autoscroll_delay()).spawn(self.session.subscribe_log_len(), target)
    }

    /// Make a history entry the live session, if the resumer supports it
    pub async fn resume_from_history(&self, entry: &HistoryEntry) -> Result<Option<Session>, SessionInitError> {
        let Some(session) = self.resumer.resume(entry).await? else {
            return Ok(None);
        };
        if self.session.adopt(session.clone()) {
            Ok(Some(session))
        } else {
            tracing::debug!(entry_id = %entry.id, "Resume skipped: session creation in progress");
            Ok(None)
        }
    }

    // ---- history ------------------------------------------------------

    pub async fn load_first_page(&self) -> Result<PageOutcome, HistoryLoadError> {
        self.history.load_first_page().await
    }

    pub async fn refresh_history(&self) -> Result<PageOutcome, HistoryLoadError> {
        self.history.refresh().await
    }

    pub async fn load_next_page(&self) -> Result<PageOutcome, HistoryLoadError> {
        self.history.load_next_page().await
    }

    pub async fn on_history_scroll_settled(&self, metrics: ScrollMetrics) -> Result<PageOutcome, HistoryLoadError> {
        self.history.on_scroll_settled(metrics).await
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.history.entries()
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.history.pagination()
    }

    pub fn history_items<Tz>(&self, now: &DateTime<Tz>) -> Vec<HistoryListItem>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.history.items(now)
    }

    pub fn is_loading(&self) -> bool {
        self.history.is_loading()
    }

    pub fn is_refreshing(&self) -> bool {
        self.history.is_refreshing()
    }
}
