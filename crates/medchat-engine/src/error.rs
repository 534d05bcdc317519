use medchat_client::ApiError;
use medchat_types::MessageId;
use thiserror::Error;

/// Creating or resuming the live session failed; sending stays disabled
#[derive(Error, Debug)]
pub enum SessionInitError {
    #[error("Cannot start a session without a credential")]
    Unauthenticated,

    #[error("Session creation failed: {0}")]
    Api(#[from] ApiError),
}

/// A send was refused or its round trip failed
#[derive(Error, Debug)]
pub enum SendError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("No active session")]
    SessionNotReady,

    #[error("Another message is still being sent")]
    AlreadyPending,

    /// The session was replaced while the message was in flight
    #[error("Session was replaced before the reply arrived")]
    SessionReplaced,

    /// The optimistic entry `message_id` has been removed from the log
    #[error("Failed to deliver message {message_id}: {source}")]
    Delivery {
        message_id: MessageId,
        text: String,
        #[source]
        source: ApiError,
    },
}

impl SendError {
    pub fn is_retryable(&self) -> bool {
        match self {
            SendError::Delivery { source, .. } => source.is_retryable(),
            SendError::AlreadyPending => true,
            _ => false,
        }
    }

    /// Text the user typed, for restoring the input after a rollback
    pub fn unsent_text(&self) -> Option<&str> {
        match self {
            SendError::Delivery { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// A history page could not be fetched; the accumulated list is untouched
#[derive(Error, Debug)]
pub enum HistoryLoadError {
    #[error("Cannot load history without a credential")]
    Unauthenticated,

    #[error("History load failed: {0}")]
    Api(#[from] ApiError),
}

impl HistoryLoadError {
    pub fn is_retryable(&self) -> bool {
        match self {
            HistoryLoadError::Api(e) => e.is_retryable(),
            HistoryLoadError::Unauthenticated => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    SessionInit(#[from] SessionInitError),

    #[error(transparent)]
    Send(#[from] SendError),

    #[error(transparent)]
    HistoryLoad(#[from] HistoryLoadError),

    #[error("Client error: {0}")]
    Client(#[from] ApiError),

    #[error("Invalid engine configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
