/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    /// Resend the text kept after a failed send
    Retry,
    New,
    History,
    More,
    Refresh,
    /// Resume the history entry at this (1-based) position
    Open(usize),
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Send(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        match name {
            "retry" => Command::Retry,
            "new" => Command::New,
            "history" | "h" => Command::History,
            "more" => Command::More,
            "refresh" => Command::Refresh,
            "open" => match parts.next().and_then(|n| n.parse().ok()) {
                Some(index) if index > 0 => Command::Open(index),
                _ => Command::Unknown(line.to_string()),
            },
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

pub const HELP: &str = "\
Type a message and press enter to send it.
  /new          start a new conversation
  /retry        resend the last message that failed
  /history      show past conversations
  /more         load the next page of history
  /refresh      reload history from the first page
  /open <n>     resume conversation n from the history list
  /quit         exit";
