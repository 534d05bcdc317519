use serde::{Deserialize, Serialize};

use crate::message::{MessageId, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// State changes published by the engine for the surrounding views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A session was created (or resumed) and sending is enabled
    SessionReady {
        session_id: String,
        title: String,
        log_len: usize,
    },

    /// Session creation failed; the view should offer a retry
    SessionInitFailed {
        message: String,
    },

    /// A message was appended to the live log
    MessageAppended {
        message_id: MessageId,
        sender: Sender,
        log_len: usize,
    },

    /// An optimistic message was removed after its send failed
    MessageRolledBack {
        message_id: MessageId,
        log_len: usize,
    },

    /// The pending gate opened or closed
    PendingChanged {
        pending: bool,
    },

    /// Something the user should be told about
    Notice {
        level: NoticeLevel,
        message: String,
    },

    /// The accumulated history list changed
    HistoryUpdated {
        entries: usize,
        has_more: bool,
    },
}

impl ChatEvent {
    pub fn error_notice(message: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
