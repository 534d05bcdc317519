// Request/response bodies of the conversation API

use chrono::{DateTime, Utc};
use medchat_types::{
    HistoryEntry, HistoryPage, Message, MessageId, MessageKind, MessageMetadata, Pagination,
    Sender, Session,
};
use serde::{Deserialize, Serialize};

use crate::traits::AssistantReply;

#[derive(Debug, Serialize)]
pub(crate) struct CreateSessionBody<'a> {
    pub title: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendMessageBody<'a> {
    pub session_id: &'a str,
    pub message: &'a str,
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateSessionResponse {
    pub chat_session: WireSession,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireSession {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(alias = "role")]
    pub sender: Sender,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    #[serde(default)]
    pub metadata: Option<MessageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendMessageResponse {
    pub ai_message: WireAiMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireAiMessage {
    #[serde(default)]
    pub id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Option<MessageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryResponse {
    #[serde(default)]
    pub chat_sessions: Vec<WireHistoryEntry>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireHistoryEntry {
    pub id: String,
    pub title: String,
    #[serde(alias = "updatedAt")]
    pub last_activity: DateTime<Utc>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub messages: Vec<WireMessage>,
}

// Missing ids and timestamps are derived at receipt time
impl From<WireMessage> for Message {
    fn from(wire: WireMessage) -> Self {
        let id = wire.id.map(MessageId::from).unwrap_or_else(MessageId::generate);
        let message = Message {
            id,
            sender: wire.sender,
            content: wire.content,
            timestamp: wire.timestamp.unwrap_or_else(Utc::now),
            kind: wire.kind,
            metadata: None,
        };
        match wire.metadata {
            Some(metadata) => message.with_metadata(metadata),
            None => message,
        }
    }
}

impl From<WireSession> for Session {
    fn from(wire: WireSession) -> Self {
        let log = wire.messages.into_iter().map(Message::from).collect();
        Session::new(wire.id, wire.title).with_log(log)
    }
}

impl From<WireAiMessage> for AssistantReply {
    fn from(wire: WireAiMessage) -> Self {
        Self {
            id: wire.id.map(MessageId::from),
            content: wire.content,
            timestamp: wire.timestamp.unwrap_or_else(Utc::now),
            metadata: wire.metadata,
        }
    }
}

impl From<WireHistoryEntry> for HistoryEntry {
    fn from(wire: WireHistoryEntry) -> Self {
        Self {
            id: wire.id.into(),
            title: wire.title,
            last_activity: wire.last_activity,
            is_active: wire.is_active,
            messages: wire.messages.into_iter().map(Message::from).collect(),
        }
    }
}

impl From<HistoryResponse> for HistoryPage {
    fn from(wire: HistoryResponse) -> Self {
        Self {
            entries: wire.chat_sessions.into_iter().map(HistoryEntry::from).collect(),
            pagination: wire.pagination,
        }
    }
}
