//! Prelude module for convenient imports
//!
//! ```rust
//! use medchat::prelude::*;
//! ```

pub use crate::{
    AuthState, ChatApi, ChatEngine, ChatEvent, ClientConfig, EngineConfig, HistoryEntry,
    HistoryListItem, Message, PageOutcome, ScrollMetrics, ScrollTarget, SendError, Sender,
    Session, SessionResumer,
};
