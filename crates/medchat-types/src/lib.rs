pub mod events;
pub mod history;
pub mod message;
pub mod session;

pub use events::{ChatEvent, NoticeLevel};
pub use history::{HistoryEntry, HistoryPage, Pagination};
pub use message::{Message, MessageId, MessageKind, MessageMetadata, Sender};
pub use session::{Session, SessionId};
