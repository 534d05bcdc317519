use medchat_types::MessageId;

use crate::error::SendError;

/// Send lifecycle of the live session
///
/// `Idle -> Sending -> {Delivered, Failed}`. The settled states gate like
/// `Idle` (a new send may start from them) and keep the outcome of the last
/// round trip for the view. Only one message can be `Sending` at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DispatchState {
    #[default]
    Idle,
    Sending {
        message_id: MessageId,
    },
    Delivered {
        message_id: MessageId,
        reply_id: MessageId,
    },
    Failed {
        message_id: MessageId,
        reason: String,
    },
}

impl DispatchState {
    pub fn is_pending(&self) -> bool {
        matches!(self, DispatchState::Sending { .. })
    }

    pub fn in_flight(&self) -> Option<&MessageId> {
        match self {
            DispatchState::Sending { message_id } => Some(message_id),
            _ => None,
        }
    }

    /// Enter `Sending`; refused while another send is in flight
    pub fn begin(&mut self, message_id: MessageId) -> Result<(), SendError> {
        if self.is_pending() {
            return Err(SendError::AlreadyPending);
        }
        *self = DispatchState::Sending { message_id };
        Ok(())
    }

    /// `Sending(message_id) -> Delivered`. False if `message_id` is not the one in flight.
    pub fn deliver(&mut self, message_id: &MessageId, reply_id: MessageId) -> bool {
        if self.in_flight() != Some(message_id) {
            return false;
        }
        *self = DispatchState::Delivered {
            message_id: message_id.clone(),
            reply_id,
        };
        true
    }

    /// `Sending(message_id) -> Failed`. False if `message_id` is not the one in flight.
    pub fn fail(&mut self, message_id: &MessageId, reason: impl Into<String>) -> bool {
        if self.in_flight() != Some(message_id) {
            return false;
        }
        *self = DispatchState::Failed {
            message_id: message_id.clone(),
            reason: reason.into(),
        };
        true
    }

    pub fn reset(&mut self) {
        *self = DispatchState::Idle;
    }
}
