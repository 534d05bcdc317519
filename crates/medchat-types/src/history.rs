use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::session::SessionId;

/// A previously created conversation as listed by the history endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: SessionId,
    pub title: String,
    pub last_activity: DateTime<Utc>,
    #[serde(default)]
    pub is_active: bool,
    /// Full log; only used to derive the list preview
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl HistoryEntry {
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Pagination cursor returned with every history page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub limit: u32,
    pub offset: u64,
    /// Authoritative continuation flag
    pub has_more: bool,
}

impl Pagination {
    /// Offset of the page following this one; `None` past `u64::MAX`
    pub fn next_offset(&self) -> Option<u64> {
        self.offset.checked_add(u64::from(self.limit))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub entries: Vec<HistoryEntry>,
    pub pagination: Pagination,
}
