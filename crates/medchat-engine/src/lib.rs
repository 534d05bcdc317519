//! Chat session and message synchronization engine.
//!
//! - [`ChatSession`]: creates/resumes the live conversation and sends
//!   messages with optimistic apply and exact rollback
//! - [`HistoryPaginator`]: offset-paginated list of past conversations
//! - [`Autoscroll`]: keeps the log view at its newest entry
//! - [`ChatEngine`]: the facade screens talk to, built with [`ChatEngineBuilder`]

pub mod autoscroll;
pub mod builder;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod events;
pub mod format;
pub mod history;
pub mod resume;
pub mod session;

pub use autoscroll::{Autoscroll, AutoscrollHandle, ScrollTarget};
pub use builder::ChatEngineBuilder;
pub use config::EngineConfig;
pub use dispatch::DispatchState;
pub use engine::ChatEngine;
pub use error::{EngineError, HistoryLoadError, SendError, SessionInitError};
pub use events::{EventSender, EventSink};
pub use format::{is_valid_format, preview, relative_label, truncate_preview, TimeLabelFormats};
pub use history::{
    should_load_more, HistoryListItem, HistoryPaginator, PageOutcome, ScrollMetrics, SkipReason,
};
pub use resume::{NoopResumer, SessionResumer};
pub use session::{ChatSession, InitOutcome, SessionStatus};
