//! Paginated list of past conversations
//!
//! Independent of the live session. Pages are appended in order; a first
//! page load (initial or refresh) replaces the list and cursor wholesale and
//! starts a new generation, so responses from an older generation are
//! dropped instead of being appended out of order.

mod scroll;

pub use scroll::{should_load_more, ScrollMetrics};

use chrono::{DateTime, TimeZone};
use medchat_client::{AuthState, ChatApi, HistoryQuery};
use medchat_types::{ChatEvent, HistoryEntry, Pagination, SessionId};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::EngineConfig;
use crate::error::HistoryLoadError;
use crate::events::EventSink;
use crate::format::{self, TimeLabelFormats};

const LOAD_FAILED_NOTICE: &str = "Could not load your conversation history. Pull to refresh to try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No first page yet
    NotLoaded,
    NoMorePages,
    LoadInFlight,
    NotNearBottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Loaded { received: usize, accumulated: usize },
    Skipped(SkipReason),
    /// Superseded by a newer first-page load; the response was dropped
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FirstPageMode {
    Initial,
    Refresh,
}

#[derive(Debug, Default)]
struct HistoryState {
    entries: Vec<HistoryEntry>,
    cursor: Option<Pagination>,
    first_load: Option<FirstPageMode>,
    /// Generation of the in-flight next-page load
    next_load: Option<u64>,
    generation: u64,
    last_error: Option<String>,
}

/// One row of the history list, ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryListItem {
    pub id: SessionId,
    pub title: String,
    pub preview: Option<String>,
    pub time_label: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy)]
enum LoadKind {
    First,
    Next,
}

/// Clears the in-flight flag if a load future is dropped before resolving
struct LoadGuard<'a> {
    paginator: &'a HistoryPaginator,
    kind: LoadKind,
    generation: u64,
    armed: bool,
}

impl LoadGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.paginator.lock();
        match self.kind {
            LoadKind::First if state.generation == self.generation => state.first_load = None,
            LoadKind::Next if state.next_load == Some(self.generation) => state.next_load = None,
            _ => {}
        }
    }
}

pub struct HistoryPaginator {
    api: Arc<dyn ChatApi>,
    auth: AuthState,
    config: EngineConfig,
    events: EventSink,
    state: Mutex<HistoryState>,
}

impl HistoryPaginator {
    pub fn new(api: Arc<dyn ChatApi>, auth: AuthState, config: EngineConfig, events: EventSink) -> Self {
        Self {
            api,
            auth,
            config,
            events,
            state: Mutex::new(HistoryState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HistoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch offset 0 on mount; replaces the list and cursor
    pub async fn load_first_page(&self) -> Result<PageOutcome, HistoryLoadError> {
        self.fetch_first(FirstPageMode::Initial).await
    }

    /// Same as [`load_first_page`](Self::load_first_page), reported through `is_refreshing`
    pub async fn refresh(&self) -> Result<PageOutcome, HistoryLoadError> {
        self.fetch_first(FirstPageMode::Refresh).await
    }

    /// Append the page after the current cursor.
    ///
    /// A no-op (never an error) when there are no more pages or a load is
    /// already running.
    pub async fn load_next_page(&self) -> Result<PageOutcome, HistoryLoadError> {
        let (query, generation) = {
            let mut state = self.lock();
            let Some(cursor) = state.cursor else {
                return Ok(PageOutcome::Skipped(SkipReason::NotLoaded));
            };
            if !cursor.has_more {
                return Ok(PageOutcome::Skipped(SkipReason::NoMorePages));
            }
            if state.first_load.is_some() || state.next_load.is_some() {
                return Ok(PageOutcome::Skipped(SkipReason::LoadInFlight));
            }

            let limit = if cursor.limit == 0 {
                self.config.history_page_size
            } else {
                cursor.limit
            };
            let Some(offset) = (Pagination { limit, ..cursor }).next_offset() else {
                tracing::warn!(offset = cursor.offset, limit, "History cursor is at the end of the offset range");
                return Ok(PageOutcome::Skipped(SkipReason::NoMorePages));
            };
            state.next_load = Some(state.generation);
            (HistoryQuery::new(limit, offset), state.generation)
        };

        tracing::debug!(offset = query.offset, limit = query.limit, "Loading next history page");
        let guard = LoadGuard {
            paginator: self,
            kind: LoadKind::Next,
            generation,
            armed: true,
        };
        let result = self.api.list_history(query).await;
        guard.disarm();

        let mut state = self.lock();
        if state.next_load == Some(generation) {
            state.next_load = None;
        }
        if state.generation != generation {
            tracing::debug!(offset = query.offset, "Dropping history page from before a refresh");
            return Ok(PageOutcome::Stale);
        }

        match result {
            Ok(page) => {
                let received = page.entries.len();
                let mut cursor = page.pagination;
                let previous = state.cursor.map(|c| c.offset);
                if previous.is_some_and(|prev| cursor.offset <= prev) {
                    tracing::warn!(
                        returned = cursor.offset,
                        requested = query.offset,
                        "History cursor did not advance; using requested offset"
                    );
                    cursor.offset = query.offset;
                }

                state.entries.extend(page.entries);
                state.cursor = Some(cursor);
                state.last_error = None;
                Ok(self.loaded(&state, received))
            }
            Err(e) => {
                self.record_failure(&mut state, &e.to_string());
                Err(e.into())
            }
        }
    }

    /// Load the next page if the settled scroll position is near the bottom
    pub async fn on_scroll_settled(&self, metrics: ScrollMetrics) -> Result<PageOutcome, HistoryLoadError> {
        if !should_load_more(&metrics, self.config.load_more_threshold) {
            return Ok(PageOutcome::Skipped(SkipReason::NotNearBottom));
        }
        self.load_next_page().await
    }

    async fn fetch_first(&self, mode: FirstPageMode) -> Result<PageOutcome, HistoryLoadError> {
        if !self.auth.is_authenticated() {
            return Err(HistoryLoadError::Unauthenticated);
        }

        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.first_load = Some(mode);
            state.generation
        };

        tracing::debug!(?mode, generation, "Loading first history page");
        let guard = LoadGuard {
            paginator: self,
            kind: LoadKind::First,
            generation,
            armed: true,
        };
        let query = HistoryQuery::first_page(self.config.history_page_size);
        let result = self.api.list_history(query).await;
        guard.disarm();

        let mut state = self.lock();
        if state.generation != generation {
            return Ok(PageOutcome::Stale);
        }
        state.first_load = None;

        match result {
            Ok(page) => {
                let received = page.entries.len();
                state.entries = page.entries;
                state.cursor = Some(page.pagination);
                state.last_error = None;
                Ok(self.loaded(&state, received))
            }
            Err(e) => {
                self.record_failure(&mut state, &e.to_string());
                Err(e.into())
            }
        }
    }

    fn loaded(&self, state: &HistoryState, received: usize) -> PageOutcome {
        let has_more = state.cursor.is_some_and(|c| c.has_more);
        tracing::info!(
            received,
            accumulated = state.entries.len(),
            has_more,
            "History page loaded"
        );
        self.events.emit(ChatEvent::HistoryUpdated {
            entries: state.entries.len(),
            has_more,
        });
        PageOutcome::Loaded {
            received,
            accumulated: state.entries.len(),
        }
    }

    fn record_failure(&self, state: &mut HistoryState, error: &str) {
        tracing::warn!(error, "History load failed");
        state.last_error = Some(error.to_string());
        self.events.emit(ChatEvent::error_notice(LOAD_FAILED_NOTICE));
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.lock().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.lock().cursor
    }

    pub fn has_more(&self) -> bool {
        self.lock().cursor.is_some_and(|c| c.has_more)
    }

    /// Initial first-page load in flight
    pub fn is_loading(&self) -> bool {
        self.lock().first_load == Some(FirstPageMode::Initial)
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock().first_load == Some(FirstPageMode::Refresh)
    }

    pub fn is_loading_more(&self) -> bool {
        self.lock().next_load.is_some()
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    /// Display rows for the accumulated entries, labelled relative to `now`
    pub fn items<Tz>(&self, now: &DateTime<Tz>) -> Vec<HistoryListItem>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let formats = TimeLabelFormats {
            time: self.config.time_format.clone(),
            date: self.config.date_format.clone(),
        };
        self.lock()
            .entries
            .iter()
            .map(|entry| HistoryListItem {
                id: entry.id.clone(),
                title: entry.title.clone(),
                preview: format::preview(entry, self.config.preview_chars),
                time_label: format::relative_label(now, entry.last_activity, &formats),
                is_active: entry.is_active,
            })
            .collect()
    }
}
