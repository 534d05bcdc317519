use async_trait::async_trait;
use chrono::{DateTime, Utc};
use medchat_types::{HistoryPage, Message, MessageId, MessageKind, MessageMetadata, Session, SessionId};

use crate::error::Result;

/// Remote conversation API consumed by the engine
///
/// Implementations must refuse to issue any request when no credential is
/// available (returning `ApiError::Unauthenticated`).
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Create a conversation; the remote may hand back an existing log
    async fn create_session(&self, request: CreateSessionRequest) -> Result<Session>;

    /// Deliver one user message and return the assistant's reply
    async fn send_message(&self, request: SendMessageRequest) -> Result<AssistantReply>;

    /// Fetch one page of closed conversations
    async fn list_history(&self, query: HistoryQuery) -> Result<HistoryPage>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSessionRequest {
    pub title: String,
}

impl CreateSessionRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageRequest {
    pub session_id: SessionId,
    pub message: String,
    pub kind: MessageKind,
    pub idempotency_key: Option<String>,
}

impl SendMessageRequest {
    pub fn new(session_id: SessionId, message: impl Into<String>) -> Self {
        Self {
            session_id,
            message: message.into(),
            kind: MessageKind::Text,
            idempotency_key: None,
        }
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    pub limit: u32,
    pub offset: u64,
}

impl HistoryQuery {
    pub fn new(limit: u32, offset: u64) -> Self {
        Self { limit, offset }
    }

    pub fn first_page(limit: u32) -> Self {
        Self { limit, offset: 0 }
    }
}

/// Assistant reply as returned by the send endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    /// Remote id, when the server assigns one
    pub id: Option<MessageId>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: Option<MessageMetadata>,
}

impl AssistantReply {
    pub fn new(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: None,
            content: content.into(),
            timestamp,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Log entry for this reply; the id is derived locally if the remote sent none
    pub fn into_message(self) -> Message {
        let mut message = Message::assistant(self.content, self.timestamp);
        if let Some(id) = self.id {
            message = message.with_id(id);
        }
        if let Some(metadata) = self.metadata {
            message = message.with_metadata(metadata);
        }
        message
    }
}
