use medchat::{ChatSession, Sender, SessionId};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Default)]
struct Rendered {
    session: Option<SessionId>,
    count: usize,
}

/// Prints the live log to stdout as it grows
///
/// Driven by the engine's autoscroll task: every settled log change prints
/// the messages not yet on screen.
pub struct TerminalView {
    session: Arc<ChatSession>,
    rendered: Mutex<Rendered>,
}

impl TerminalView {
    pub fn new(session: Arc<ChatSession>) -> Self {
        Self {
            session,
            rendered: Mutex::new(Rendered::default()),
        }
    }
}

impl medchat::ScrollTarget for TerminalView {
    fn scroll_to_end(&self) {
        let current = self.session.session_id();
        let log = self.session.current_log();
        let mut rendered = self.rendered.lock().unwrap_or_else(PoisonError::into_inner);

        if rendered.session != current {
            rendered.session = current;
            rendered.count = 0;
        }
        // a rolled-back message was already printed; just resync
        if log.len() < rendered.count {
            rendered.count = log.len();
            return;
        }

        for message in &log[rendered.count..] {
            let who = match message.sender {
                Sender::User => "you",
                Sender::Assistant => "assistant",
            };
            println!("{:>9}> {}", who, message.content);
        }
        rendered.count = log.len();
    }
}
