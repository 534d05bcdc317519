use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::message::{Message, MessageId};

/// Identifier assigned by the remote when a conversation is created
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The live conversation.
///
/// The log only grows by `push`; the single permitted removal is the
/// rollback of an optimistic entry by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    id: SessionId,
    title: String,
    log: Vec<Message>,
    last_activity: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(id: impl Into<SessionId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            log: Vec::new(),
            last_activity: None,
        }
    }

    /// Seed the log with messages the remote already tracks for this session
    pub fn with_log(mut self, log: Vec<Message>) -> Self {
        self.last_activity = log.last().map(|m| m.timestamp);
        self.log = log;
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn log(&self) -> &[Message] {
        &self.log
    }

    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_activity
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.log.last()
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.log.iter().any(|m| &m.id == id)
    }

    pub fn push(&mut self, message: Message) {
        self.last_activity = Some(message.timestamp);
        self.log.push(message);
    }

    /// Remove exactly the entry with `id`, keeping the order of the rest
    pub fn remove(&mut self, id: &MessageId) -> Option<Message> {
        let index = self.log.iter().position(|m| &m.id == id)?;
        let removed = self.log.remove(index);
        self.last_activity = self.log.last().map(|m| m.timestamp);
        Some(removed)
    }
}
