//! # MedChat
//!
//! Client-side engine for a medical-assistant chat: one live conversation
//! with optimistic sends, plus a paginated list of past conversations.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use medchat::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = ChatEngine::builder()
//!         .client_config(ClientConfig::new("https://chat.example.com/api"))
//!         .auth(AuthState::authenticated(std::env::var("MEDCHAT_TOKEN")?))
//!         .build()?;
//!
//!     engine.mount().await?;
//!     let reply = engine.send_message("I have had a headache for two days").await?;
//!     println!("{}", reply.content);
//!
//!     engine.load_first_page().await?;
//!     for item in engine.history_items(&chrono::Local::now()) {
//!         println!("{} ({})", item.title, item.time_label);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`medchat-types`**: messages, sessions, history pages and engine events
//! - **`medchat-client`**: the [`ChatApi`] seam and its HTTP implementation
//! - **`medchat-engine`**: session store, message dispatcher, history paginator
//!
//! Without a credential the engine is inert: nothing is requested and
//! sending stays disabled.

pub mod prelude;

pub use async_trait::async_trait;

pub use medchat_types::{
    ChatEvent, HistoryEntry, HistoryPage, Message, MessageId, MessageKind, MessageMetadata,
    NoticeLevel, Pagination, Sender, Session, SessionId,
};

pub use medchat_client::{
    ApiError, AssistantReply, AuthState, ChatApi, ClientConfig, ClientFactory, Credential,
    CreateSessionRequest, HistoryQuery, HttpChatApi, SendMessageRequest,
};

pub use medchat_engine::{
    AutoscrollHandle, ChatEngine, ChatEngineBuilder, ChatSession, DispatchState, EngineConfig,
    EngineError, HistoryListItem, HistoryLoadError, HistoryPaginator, InitOutcome, NoopResumer,
    PageOutcome, ScrollMetrics, ScrollTarget, SendError, SessionInitError, SessionResumer,
    SessionStatus, SkipReason,
};
