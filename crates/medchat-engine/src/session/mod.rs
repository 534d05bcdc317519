//! Live conversation: session store and message dispatcher
//!
//! Both halves share one state cell. The lock is never held across an
//! await; suspension points are exactly the remote calls.

mod send;
mod store;

use medchat_client::{AuthState, ChatApi};
use medchat_types::{Message, Session, SessionId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use crate::config::EngineConfig;
use crate::dispatch::DispatchState;
use crate::events::EventSink;

pub use store::InitOutcome;

/// Lifecycle of session creation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Nothing requested yet (or the last attempt was abandoned)
    #[default]
    Uninitialized,
    Creating,
    Ready,
    /// Last attempt failed; the view should offer a retry
    Failed { message: String },
}

#[derive(Debug, Default)]
struct LiveState {
    session: Option<Session>,
    status: SessionStatus,
    dispatch: DispatchState,
    draft: String,
    /// Bumped whenever the live session is swapped out
    epoch: u64,
}

/// Live chat session owned by one screen
pub struct ChatSession {
    api: Arc<dyn ChatApi>,
    auth: AuthState,
    config: EngineConfig,
    events: EventSink,
    state: Mutex<LiveState>,
    log_len: watch::Sender<usize>,
}

impl ChatSession {
    pub fn new(api: Arc<dyn ChatApi>, auth: AuthState, config: EngineConfig, events: EventSink) -> Self {
        let (log_len, _) = watch::channel(0);
        Self {
            api,
            auth,
            config,
            events,
            state: Mutex::new(LiveState::default()),
            log_len,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LiveState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish the current log length to observers (autoscroll)
    fn publish_log_len(&self, len: usize) {
        self.log_len.send_replace(len);
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Sending is possible only once a session id exists
    pub fn is_session_ready(&self) -> bool {
        self.lock().session.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().dispatch.is_pending()
    }

    pub fn status(&self) -> SessionStatus {
        self.lock().status.clone()
    }

    pub fn dispatch_state(&self) -> DispatchState {
        self.lock().dispatch.clone()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.lock().session.as_ref().map(|s| s.id().clone())
    }

    pub fn session(&self) -> Option<Session> {
        self.lock().session.clone()
    }

    pub fn current_log(&self) -> Vec<Message> {
        self.lock()
            .session
            .as_ref()
            .map(|s| s.log().to_vec())
            .unwrap_or_default()
    }

    pub fn log_len(&self) -> usize {
        self.lock().session.as_ref().map_or(0, Session::len)
    }

    /// Receiver notified on every log mutation with the new length
    pub fn subscribe_log_len(&self) -> watch::Receiver<usize> {
        self.log_len.subscribe()
    }

    pub fn draft(&self) -> String {
        self.lock().draft.clone()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        self.lock().draft = text.into();
    }
}
