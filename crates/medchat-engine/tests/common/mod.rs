#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use medchat_client::{
    ApiError, AssistantReply, AuthState, ChatApi, CreateSessionRequest, HistoryQuery,
    SendMessageRequest,
};
use medchat_engine::{ChatEngine, EngineConfig};
use medchat_types::{HistoryEntry, HistoryPage, Message, Pagination, Session};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

type ApiResult<T> = Result<T, ApiError>;

enum Gate<T> {
    Ready(T),
    Deferred(oneshot::Receiver<T>),
}

/// In-memory `ChatApi` answering from queued scripts.
///
/// Deferred answers are released through the returned oneshot sender, which
/// lets a test observe the engine while a call is suspended.
#[derive(Default)]
pub struct ScriptedApi {
    sessions: Mutex<VecDeque<Gate<ApiResult<Session>>>>,
    replies: Mutex<VecDeque<Gate<ApiResult<AssistantReply>>>>,
    pages: Mutex<VecDeque<Gate<ApiResult<HistoryPage>>>>,
    pub sent: Mutex<Vec<SendMessageRequest>>,
    pub history_queries: Mutex<Vec<HistoryQuery>>,
    pub session_titles: Mutex<Vec<String>>,
    session_calls: AtomicUsize,
}

async fn open<T>(gate: Option<Gate<ApiResult<T>>>) -> ApiResult<T> {
    match gate {
        Some(Gate::Ready(result)) => result,
        Some(Gate::Deferred(rx)) => rx.await.unwrap_or_else(|_| {
            Err(ApiError::Status {
                status: 503,
                body: "script dropped".to_string(),
            })
        }),
        None => Err(ApiError::Status {
            status: 500,
            body: "unscripted call".to_string(),
        }),
    }
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_session(&self, result: ApiResult<Session>) {
        self.sessions.lock().unwrap().push_back(Gate::Ready(result));
    }

    pub fn defer_session(&self) -> oneshot::Sender<ApiResult<Session>> {
        let (tx, rx) = oneshot::channel();
        self.sessions.lock().unwrap().push_back(Gate::Deferred(rx));
        tx
    }

    pub fn push_reply(&self, result: ApiResult<AssistantReply>) {
        self.replies.lock().unwrap().push_back(Gate::Ready(result));
    }

    pub fn defer_reply(&self) -> oneshot::Sender<ApiResult<AssistantReply>> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Gate::Deferred(rx));
        tx
    }

    pub fn push_page(&self, result: ApiResult<HistoryPage>) {
        self.pages.lock().unwrap().push_back(Gate::Ready(result));
    }

    pub fn defer_page(&self) -> oneshot::Sender<ApiResult<HistoryPage>> {
        let (tx, rx) = oneshot::channel();
        self.pages.lock().unwrap().push_back(Gate::Deferred(rx));
        tx
    }

    pub fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn query_offsets(&self) -> Vec<u64> {
        self.history_queries.lock().unwrap().iter().map(|q| q.offset).collect()
    }
}

#[async_trait]
impl ChatApi for ScriptedApi {
    async fn create_session(&self, request: CreateSessionRequest) -> ApiResult<Session> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        self.session_titles.lock().unwrap().push(request.title);
        let gate = self.sessions.lock().unwrap().pop_front();
        open(gate).await
    }

    async fn send_message(&self, request: SendMessageRequest) -> ApiResult<AssistantReply> {
        self.sent.lock().unwrap().push(request);
        let gate = self.replies.lock().unwrap().pop_front();
        open(gate).await
    }

    async fn list_history(&self, query: HistoryQuery) -> ApiResult<HistoryPage> {
        self.history_queries.lock().unwrap().push(query);
        let gate = self.pages.lock().unwrap().pop_front();
        open(gate).await
    }
}

pub fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        body: "internal error".to_string(),
    }
}

pub fn reply(content: &str) -> AssistantReply {
    AssistantReply::new(content, Utc::now())
}

pub fn engine(api: Arc<ScriptedApi>) -> ChatEngine {
    ChatEngine::builder()
        .api(api)
        .auth(AuthState::authenticated("test-token"))
        .config(EngineConfig::default())
        .build()
        .unwrap()
}

/// Engine with a live, empty session
pub async fn mounted_engine(api: Arc<ScriptedApi>) -> ChatEngine {
    api.push_session(Ok(Session::new("sess-1", "New Chat")));
    let engine = engine(api);
    engine.mount().await.unwrap();
    engine
}

pub fn entry(index: u64) -> HistoryEntry {
    let last_activity = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() - Duration::hours(index as i64);
    HistoryEntry {
        id: format!("hist-{}", index).into(),
        title: format!("Conversation {}", index),
        last_activity,
        is_active: false,
        messages: vec![Message::user(format!("question {}", index))],
    }
}

/// Page of `count` entries starting at `offset`
pub fn page(offset: u64, count: u64, total: u64, limit: u32, has_more: bool) -> HistoryPage {
    HistoryPage {
        entries: (offset..offset + count).map(entry).collect(),
        pagination: Pagination {
            total,
            limit,
            offset,
            has_more,
        },
    }
}
