mod command;
mod config;
mod view;

use medchat::{
    AuthState, ChatEngine, ChatEvent, NoticeLevel, PageOutcome, SendError, SkipReason,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::command::{Command, HELP};
use crate::config::{AppConfig, LoggingConfig};
use crate::view::TerminalView;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config.logging);

    tracing::info!(base_url = %config.client.base_url, "Starting MedChat");

    let auth = AuthState::from_token(config.token.clone());
    if !auth.is_authenticated() {
        tracing::warn!("MEDCHAT_TOKEN is not set; the chat stays disabled");
    }

    let (engine, events) = ChatEngine::builder()
        .client_config(config.client.clone())
        .auth(auth)
        .config(config.engine.clone())
        .build_with_events()?;

    let notices = tokio::spawn(report_events(events));
    let view = Arc::new(TerminalView::new(Arc::clone(engine.session())));
    let autoscroll = engine.attach_autoscroll(view);

    if let Err(e) = engine.mount().await {
        tracing::warn!(error = %e, "Could not start a session");
    }
    println!("{}", HELP);

    run_repl(&engine).await?;

    drop(autoscroll);
    notices.abort();
    tracing::info!("Bye");
    Ok(())
}

async fn run_repl(engine: &ChatEngine) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Send(text) => send(engine, &text).await,
            Command::Retry => {
                let draft = engine.session().draft();
                if draft.is_empty() {
                    println!("Nothing to retry.");
                } else {
                    send(engine, &draft).await;
                }
            }
            Command::New => {
                if let Err(e) = engine.new_conversation().await {
                    eprintln!("! {}", e);
                }
            }
            Command::History => {
                if engine.pagination().is_none() {
                    load(engine.load_first_page().await);
                }
                print_history(engine);
            }
            Command::More => {
                if load(engine.load_next_page().await) {
                    print_history(engine);
                }
            }
            Command::Refresh => {
                if load(engine.refresh_history().await) {
                    print_history(engine);
                }
            }
            Command::Open(index) => open(engine, index).await,
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
            Command::Unknown(input) => println!("Unknown command: {} (try /help)", input),
        }
    }

    Ok(())
}

async fn send(engine: &ChatEngine, text: &str) {
    match engine.send_message(text).await {
        Ok(_) => {}
        Err(SendError::EmptyMessage) => {}
        Err(e) => {
            eprintln!("! {}", e);
            if let Some(text) = e.unsent_text() {
                engine.session().set_draft(text);
                println!("Your message was kept; type /retry to send it again.");
            }
        }
    }
}

/// Report a history load; true when the list changed
fn load(result: Result<PageOutcome, medchat::HistoryLoadError>) -> bool {
    match result {
        Ok(PageOutcome::Loaded { .. }) => true,
        Ok(PageOutcome::Skipped(SkipReason::NoMorePages)) => {
            println!("No more conversations.");
            false
        }
        Ok(outcome) => {
            tracing::debug!(?outcome, "History load skipped");
            false
        }
        Err(e) => {
            eprintln!("! {}", e);
            false
        }
    }
}

fn print_history(engine: &ChatEngine) {
    let items = engine.history_items(&chrono::Local::now());
    if items.is_empty() {
        println!("No conversations yet.");
        return;
    }

    for (i, item) in items.iter().enumerate() {
        let marker = if item.is_active { "*" } else { " " };
        println!("{}{:>3}. {}  [{}]", marker, i + 1, item.title, item.time_label);
        if let Some(preview) = &item.preview {
            println!("       {}", preview);
        }
    }
    if engine.history().has_more() {
        println!("(/more for older conversations)");
    }
}

async fn open(engine: &ChatEngine, index: usize) {
    let Some(entry) = engine.entries().into_iter().nth(index - 1) else {
        println!("No conversation {} in the list.", index);
        return;
    };
    match engine.resume_from_history(&entry).await {
        Ok(Some(session)) => println!("Resumed \"{}\".", session.title()),
        Ok(None) => println!("Resuming past conversations is not available yet."),
        Err(e) => eprintln!("! {}", e),
    }
}

async fn report_events(mut events: mpsc::Receiver<ChatEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            ChatEvent::Notice {
                level: NoticeLevel::Error,
                message,
            } => eprintln!("! {}", message),
            ChatEvent::Notice { message, .. } => println!("{}", message),
            ChatEvent::SessionReady { title, log_len, .. } => {
                println!("-- {} ({} messages) --", title, log_len)
            }
            other => tracing::trace!(event = ?other, "Engine event"),
        }
    }
}

fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // stdout belongs to the conversation
    match config.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
