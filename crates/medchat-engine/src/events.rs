use medchat_types::ChatEvent;
use tokio::sync::mpsc;

pub type EventSender = mpsc::Sender<ChatEvent>;

/// Optional publisher of `ChatEvent`s
///
/// Emission never blocks; when the receiver lags and the buffer is full the
/// event is dropped with a warning.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<EventSender>,
}

impl EventSink {
    pub fn new(tx: EventSender) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: ChatEvent) {
        if let Some(tx) = &self.tx {
            if let Err(e) = tx.try_send(event) {
                tracing::warn!("Dropping chat event: {}", e);
            }
        }
    }
}
