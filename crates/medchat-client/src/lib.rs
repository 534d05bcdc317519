pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod traits;

pub use auth::{AuthState, Credential};
pub use config::{ClientConfig, ClientFactory};
pub use error::ApiError;
pub use http::HttpChatApi;
pub use traits::{AssistantReply, ChatApi, CreateSessionRequest, HistoryQuery, SendMessageRequest};
