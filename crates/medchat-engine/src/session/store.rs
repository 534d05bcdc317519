use medchat_client::CreateSessionRequest;
use medchat_types::{ChatEvent, Session};

use super::{ChatSession, LiveState, SessionStatus};
use crate::error::SessionInitError;

const INIT_FAILED_NOTICE: &str = "Could not start a conversation. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum InitOutcome {
    /// The session now live
    Ready(Session),
    /// A creation was already running; this call did nothing
    InProgress,
}

/// Resets `Creating` if the creation future is dropped before it resolves
struct CreationGuard<'a> {
    session: &'a ChatSession,
    armed: bool,
}

impl CreationGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CreationGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.session.lock();
        if state.status == SessionStatus::Creating {
            tracing::debug!("Session creation abandoned");
            state.status = SessionStatus::Uninitialized;
        }
    }
}

impl ChatSession {
    /// Create a session on the remote and make it the live one.
    ///
    /// Whatever log the remote returns replaces the local one wholesale.
    /// Without a credential nothing is requested.
    pub async fn create_or_resume(&self) -> Result<InitOutcome, SessionInitError> {
        self.start_session(false).await
    }

    /// Discard the live session and start a new one.
    ///
    /// Calls made while a creation is running are no-ops.
    pub async fn replace(&self) -> Result<InitOutcome, SessionInitError> {
        self.start_session(true).await
    }

    /// Install a session obtained elsewhere. Refused while a creation is running.
    pub fn adopt(&self, session: Session) -> bool {
        let mut state = self.lock();
        if state.status == SessionStatus::Creating {
            return false;
        }
        self.install_locked(&mut state, session);
        true
    }

    async fn start_session(&self, discard_current: bool) -> Result<InitOutcome, SessionInitError> {
        if !self.auth.is_authenticated() {
            tracing::debug!("Session start skipped: not authenticated");
            return Err(SessionInitError::Unauthenticated);
        }

        {
            let mut state = self.lock();
            if state.status == SessionStatus::Creating {
                tracing::debug!("Session creation already in progress");
                return Ok(InitOutcome::InProgress);
            }
            state.status = SessionStatus::Creating;
            if discard_current {
                self.discard_locked(&mut state);
            }
        }

        let guard = CreationGuard { session: self, armed: true };
        let request = CreateSessionRequest::new(self.config.default_session_title.clone());
        let result = self.api.create_session(request).await;
        guard.disarm();

        let mut state = self.lock();
        match result {
            Ok(session) => Ok(InitOutcome::Ready(self.install_locked(&mut state, session))),
            Err(e) => {
                tracing::warn!(error = %e, "Session creation failed");
                state.status = SessionStatus::Failed {
                    message: e.to_string(),
                };
                self.events.emit(ChatEvent::SessionInitFailed {
                    message: e.to_string(),
                });
                self.events.emit(ChatEvent::error_notice(INIT_FAILED_NOTICE));
                Err(e.into())
            }
        }
    }

    /// Drop the live session; any in-flight send becomes stale
    fn discard_locked(&self, state: &mut LiveState) {
        if let Some(old) = state.session.take() {
            tracing::info!(session_id = %old.id(), "Discarding chat session");
        }
        self.retire_locked(state);
        state.draft.clear();
        self.publish_log_len(0);
    }

    fn install_locked(&self, state: &mut LiveState, session: Session) -> Session {
        if state.session.is_some() {
            self.retire_locked(state);
        }

        tracing::info!(
            session_id = %session.id(),
            messages = session.len(),
            "Chat session ready"
        );

        let len = session.len();
        self.events.emit(ChatEvent::SessionReady {
            session_id: session.id().to_string(),
            title: session.title().to_string(),
            log_len: len,
        });
        state.session = Some(session.clone());
        state.status = SessionStatus::Ready;
        self.publish_log_len(len);
        session
    }

    fn retire_locked(&self, state: &mut LiveState) {
        state.epoch += 1;
        if state.dispatch.is_pending() {
            self.events.emit(ChatEvent::PendingChanged { pending: false });
        }
        state.dispatch.reset();
    }
}
