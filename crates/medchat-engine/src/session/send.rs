use medchat_client::SendMessageRequest;
use medchat_types::{ChatEvent, Message, MessageId, Sender};

use super::{ChatSession, LiveState};
use crate::error::SendError;

const SEND_FAILED_NOTICE: &str = "Your message could not be sent. Please try again.";

/// Rolls the optimistic entry back if the send future is dropped mid-flight
struct PendingGuard<'a> {
    session: &'a ChatSession,
    message_id: MessageId,
    epoch: u64,
    armed: bool,
}

impl PendingGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut guard = self.session.lock();
        let state = &mut *guard;
        if state.epoch != self.epoch || state.dispatch.in_flight() != Some(&self.message_id) {
            return;
        }
        tracing::debug!(message_id = %self.message_id, "Send abandoned before completion");
        state.dispatch.fail(&self.message_id, "abandoned");
        self.session.rollback_locked(state, &self.message_id);
        self.session.events.emit(ChatEvent::PendingChanged { pending: false });
    }
}

impl ChatSession {
    /// Send `text` with optimistic apply.
    ///
    /// The user message is appended and the draft cleared before any network
    /// activity. On success the assistant reply is appended and returned; on
    /// failure exactly the optimistic entry is removed. The pending gate is
    /// released on every path, including when this future is dropped.
    pub async fn send(&self, text: &str) -> Result<Message, SendError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SendError::EmptyMessage);
        }

        let (request, message_id, epoch) = self.apply_optimistic(text)?;
        let guard = PendingGuard {
            session: self,
            message_id: message_id.clone(),
            epoch,
            armed: true,
        };

        let result = self.api.send_message(request).await;
        guard.disarm();

        let mut locked = self.lock();
        let state = &mut *locked;
        if state.epoch != epoch {
            tracing::debug!(message_id = %message_id, "Discarding reply for a replaced session");
            return Err(SendError::SessionReplaced);
        }

        match result {
            Ok(reply) => {
                let Some(session) = state.session.as_mut() else {
                    return Err(SendError::SessionReplaced);
                };
                let mut reply = reply.into_message();
                if session.contains(&reply.id) {
                    reply = reply.with_id(MessageId::generate());
                }

                state.dispatch.deliver(&message_id, reply.id.clone());
                session.push(reply.clone());
                let len = session.len();

                tracing::debug!(message_id = %message_id, reply_id = %reply.id, "Message delivered");
                self.events.emit(ChatEvent::MessageAppended {
                    message_id: reply.id.clone(),
                    sender: reply.sender,
                    log_len: len,
                });
                self.events.emit(ChatEvent::PendingChanged { pending: false });
                self.publish_log_len(len);
                Ok(reply)
            }
            Err(source) => {
                tracing::warn!(message_id = %message_id, error = %source, "Send failed, rolling back");
                state.dispatch.fail(&message_id, source.to_string());
                self.rollback_locked(state, &message_id);
                self.events.emit(ChatEvent::error_notice(SEND_FAILED_NOTICE));
                self.events.emit(ChatEvent::PendingChanged { pending: false });
                Err(SendError::Delivery {
                    message_id,
                    text: text.to_string(),
                    source,
                })
            }
        }
    }

    /// Send whatever is in the draft buffer
    pub async fn submit_draft(&self) -> Result<Message, SendError> {
        let draft = self.draft();
        self.send(&draft).await
    }

    /// Append the user message and enter `Sending` in one critical section
    fn apply_optimistic(&self, text: &str) -> Result<(SendMessageRequest, MessageId, u64), SendError> {
        let mut guard = self.lock();
        let state = &mut *guard;

        let session = state.session.as_mut().ok_or(SendError::SessionNotReady)?;
        let message = Message::user(text);
        let message_id = message.id.clone();
        state.dispatch.begin(message_id.clone())?;

        let request = SendMessageRequest::new(session.id().clone(), text)
            .with_idempotency_key(message_id.to_string());
        session.push(message);
        state.draft.clear();
        let len = session.len();

        tracing::debug!(session_id = %session.id(), message_id = %message_id, "Optimistic append");
        self.events.emit(ChatEvent::MessageAppended {
            message_id: message_id.clone(),
            sender: Sender::User,
            log_len: len,
        });
        self.events.emit(ChatEvent::PendingChanged { pending: true });
        self.publish_log_len(len);

        Ok((request, message_id, state.epoch))
    }

    fn rollback_locked(&self, state: &mut LiveState, message_id: &MessageId) {
        let Some(session) = state.session.as_mut() else {
            return;
        };
        if session.remove(message_id).is_some() {
            let len = session.len();
            self.events.emit(ChatEvent::MessageRolledBack {
                message_id: message_id.clone(),
                log_len: len,
            });
            self.publish_log_len(len);
        }
    }
}
