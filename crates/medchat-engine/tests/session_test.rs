mod common;

use async_trait::async_trait;
use chrono::Utc;
use common::{engine, entry, mounted_engine, reply, server_error, ScriptedApi};
use medchat_client::AuthState;
use medchat_engine::{
    ChatEngine, InitOutcome, SendError, SessionInitError, SessionResumer, SessionStatus,
};
use medchat_types::{HistoryEntry, Message, Session};
use std::sync::Arc;
use tokio_test::{assert_pending, assert_ready, task};

#[tokio::test]
async fn test_unauthenticated_engine_makes_no_requests() {
    let api = ScriptedApi::new();
    let engine = ChatEngine::builder()
        .api(api.clone())
        .auth(AuthState::Unauthenticated)
        .build()
        .unwrap();

    let err = engine.mount().await.unwrap_err();
    assert!(matches!(err, SessionInitError::Unauthenticated));
    assert!(engine.load_first_page().await.is_err());

    assert_eq!(api.session_calls(), 0);
    assert!(api.history_queries.lock().unwrap().is_empty());
    assert!(!engine.is_session_ready());
}

#[tokio::test]
async fn test_mount_adopts_remote_log_wholesale() {
    let api = ScriptedApi::new();
    let remote = vec![
        Message::user("Is ibuprofen safe with coffee?"),
        Message::assistant("Generally yes, in moderate amounts.", Utc::now()),
    ];
    api.push_session(Ok(Session::new("sess-9", "Earlier").with_log(remote.clone())));
    let engine = engine(api.clone());

    let outcome = engine.mount().await.unwrap();

    assert!(matches!(outcome, InitOutcome::Ready(ref s) if s.id().as_str() == "sess-9"));
    assert_eq!(engine.current_log(), remote);
    assert_eq!(engine.session().log_len(), 2);
    assert!(engine.is_session_ready());
    assert_eq!(api.session_titles.lock().unwrap()[0], "New Chat");
}

#[tokio::test]
async fn test_failed_creation_disables_sending_until_retry() {
    let api = ScriptedApi::new();
    api.push_session(Err(server_error()));
    let engine = engine(api.clone());

    assert!(matches!(engine.mount().await, Err(SessionInitError::Api(_))));
    assert!(matches!(engine.session().status(), SessionStatus::Failed { .. }));
    assert!(!engine.is_session_ready());
    assert!(matches!(engine.send_message("hello").await, Err(SendError::SessionNotReady)));

    api.push_session(Ok(Session::new("sess-2", "New Chat")));
    assert!(matches!(engine.mount().await, Ok(InitOutcome::Ready(_))));
    assert!(engine.is_session_ready());
}

#[tokio::test]
async fn test_new_conversation_while_creating_is_noop() {
    let api = ScriptedApi::new();
    let engine = mounted_engine(api.clone()).await;
    let gate = api.defer_session();

    let mut first = task::spawn(engine.new_conversation());
    assert_pending!(first.poll());
    assert!(!engine.is_session_ready());
    assert!(engine.current_log().is_empty());

    let second = engine.new_conversation().await.unwrap();
    assert_eq!(second, InitOutcome::InProgress);
    assert_eq!(api.session_calls(), 2);

    gate.send(Ok(Session::new("sess-2", "New Chat"))).unwrap();
    assert!(matches!(assert_ready!(first.poll()), Ok(InitOutcome::Ready(_))));
    assert_eq!(engine.session().session_id().unwrap().as_str(), "sess-2");
}

#[tokio::test]
async fn test_reply_for_replaced_session_is_discarded() {
    let api = ScriptedApi::new();
    let engine = mounted_engine(api.clone()).await;
    let gate = api.defer_reply();

    let mut send = task::spawn(engine.send_message("hello"));
    assert_pending!(send.poll());

    api.push_session(Ok(Session::new("sess-2", "New Chat")));
    engine.new_conversation().await.unwrap();
    assert!(!engine.is_pending());
    assert!(engine.current_log().is_empty());

    gate.send(Ok(reply("late reply"))).unwrap();
    let err = assert_ready!(send.poll()).unwrap_err();
    assert!(matches!(err, SendError::SessionReplaced));
    assert!(engine.current_log().is_empty());
    assert_eq!(engine.session().session_id().unwrap().as_str(), "sess-2");
}

#[tokio::test]
async fn test_new_conversation_clears_draft() {
    let api = ScriptedApi::new();
    let engine = mounted_engine(api.clone()).await;
    engine.session().set_draft("half typed");

    api.push_session(Ok(Session::new("sess-2", "New Chat")));
    engine.new_conversation().await.unwrap();

    assert!(engine.session().draft().is_empty());
}

#[tokio::test]
async fn test_resume_from_history_defaults_to_noop() {
    let api = ScriptedApi::new();
    let engine = mounted_engine(api.clone()).await;

    let resumed = engine.resume_from_history(&entry(3)).await.unwrap();

    assert!(resumed.is_none());
    assert_eq!(engine.session().session_id().unwrap().as_str(), "sess-1");
    assert_eq!(api.session_calls(), 1);
}

struct EntryResumer;

#[async_trait]
impl SessionResumer for EntryResumer {
    async fn resume(&self, entry: &HistoryEntry) -> Result<Option<Session>, SessionInitError> {
        Ok(Some(
            Session::new(entry.id.clone(), entry.title.clone()).with_log(entry.messages.clone()),
        ))
    }
}

#[tokio::test]
async fn test_custom_resumer_installs_history_session() {
    let api = ScriptedApi::new();
    api.push_session(Ok(Session::new("sess-1", "New Chat")));
    let engine = ChatEngine::builder()
        .api(api.clone())
        .auth(AuthState::authenticated("test-token"))
        .resumer(Arc::new(EntryResumer))
        .build()
        .unwrap();
    engine.mount().await.unwrap();

    let target = entry(2);
    let resumed = engine.resume_from_history(&target).await.unwrap().unwrap();

    assert_eq!(resumed.id(), &target.id);
    assert_eq!(engine.current_log(), target.messages);
    assert!(engine.is_session_ready());
}
