mod common;

use chrono::{TimeZone, Utc};
use common::{engine, entry, page, server_error, ScriptedApi};
use medchat_engine::{HistoryLoadError, PageOutcome, ScrollMetrics, SkipReason};
use medchat_types::{HistoryPage, Pagination};
use tokio_test::{assert_pending, assert_ready, task};

#[tokio::test]
async fn test_first_page_replaces_list_and_cursor() {
    let api = ScriptedApi::new();
    api.push_page(Ok(page(0, 10, 25, 10, true)));
    let engine = engine(api.clone());

    let outcome = engine.load_first_page().await.unwrap();

    assert_eq!(outcome, PageOutcome::Loaded { received: 10, accumulated: 10 });
    assert_eq!(engine.entries().len(), 10);
    assert_eq!(engine.pagination().unwrap().offset, 0);
    let query = api.history_queries.lock().unwrap()[0];
    assert_eq!((query.limit, query.offset), (10, 0));
    assert!(!engine.is_loading());
}

#[tokio::test]
async fn test_next_page_is_noop_without_more_pages() {
    let api = ScriptedApi::new();
    api.push_page(Ok(page(0, 10, 10, 10, false)));
    let engine = engine(api.clone());
    engine.load_first_page().await.unwrap();
    let before = engine.entries();

    let outcome = engine.load_next_page().await.unwrap();

    assert_eq!(outcome, PageOutcome::Skipped(SkipReason::NoMorePages));
    assert_eq!(engine.entries(), before);
    assert_eq!(
        engine.pagination(),
        Some(Pagination { total: 10, limit: 10, offset: 0, has_more: false })
    );
    assert_eq!(api.query_offsets(), vec![0]);
}

#[tokio::test]
async fn test_next_page_before_first_page_is_noop() {
    let api = ScriptedApi::new();
    let engine = engine(api.clone());

    let outcome = engine.load_next_page().await.unwrap();

    assert_eq!(outcome, PageOutcome::Skipped(SkipReason::NotLoaded));
    assert!(api.query_offsets().is_empty());
}

#[tokio::test]
async fn test_pages_accumulate_with_increasing_offsets() {
    let api = ScriptedApi::new();
    api.push_page(Ok(page(0, 10, 25, 10, true)));
    api.push_page(Ok(page(10, 10, 25, 10, true)));
    api.push_page(Ok(page(20, 5, 25, 10, false)));
    let engine = engine(api.clone());

    engine.load_first_page().await.unwrap();
    engine.load_next_page().await.unwrap();
    let last = engine.load_next_page().await.unwrap();

    assert_eq!(last, PageOutcome::Loaded { received: 5, accumulated: 25 });
    assert_eq!(api.query_offsets(), vec![0, 10, 20]);
    let ids: Vec<String> = engine.entries().iter().map(|e| e.id.to_string()).collect();
    assert_eq!(ids.first().map(String::as_str), Some("hist-0"));
    assert_eq!(ids.last().map(String::as_str), Some("hist-24"));
    assert_eq!(
        engine.load_next_page().await.unwrap(),
        PageOutcome::Skipped(SkipReason::NoMorePages)
    );
}

#[tokio::test]
async fn test_cursor_at_end_of_offset_range_stops_paging() {
    let api = ScriptedApi::new();
    api.push_page(Ok(HistoryPage {
        entries: vec![entry(0)],
        pagination: Pagination { total: u64::MAX, limit: 10, offset: u64::MAX - 5, has_more: true },
    }));
    let engine = engine(api.clone());
    engine.load_first_page().await.unwrap();

    let outcome = engine.load_next_page().await.unwrap();

    assert_eq!(outcome, PageOutcome::Skipped(SkipReason::NoMorePages));
    assert_eq!(engine.entries().len(), 1);
    assert_eq!(api.query_offsets(), vec![0]);
    assert!(!engine.history().is_loading_more());
}

#[tokio::test]
async fn test_cursor_that_does_not_advance_uses_requested_offset() {
    let api = ScriptedApi::new();
    api.push_page(Ok(page(0, 10, 30, 10, true)));
    // server echoes the first page's offset for the second page
    api.push_page(Ok(HistoryPage {
        entries: (10..20).map(entry).collect(),
        pagination: Pagination { total: 30, limit: 10, offset: 0, has_more: true },
    }));
    api.push_page(Ok(page(20, 10, 30, 10, false)));
    let engine = engine(api.clone());
    engine.load_first_page().await.unwrap();

    engine.load_next_page().await.unwrap();
    assert_eq!(engine.pagination().unwrap().offset, 10);
    assert_eq!(engine.entries().len(), 20);

    engine.load_next_page().await.unwrap();
    assert_eq!(api.query_offsets(), vec![0, 10, 20]);
    assert_eq!(engine.entries().len(), 30);
}

#[tokio::test]
async fn test_next_page_while_loading_is_noop() {
    let api = ScriptedApi::new();
    api.push_page(Ok(page(0, 10, 30, 10, true)));
    let engine = engine(api.clone());
    engine.load_first_page().await.unwrap();
    let gate = api.defer_page();

    let mut next = task::spawn(engine.load_next_page());
    assert_pending!(next.poll());
    assert!(engine.history().is_loading_more());

    let outcome = engine.load_next_page().await.unwrap();
    assert_eq!(outcome, PageOutcome::Skipped(SkipReason::LoadInFlight));
    assert_eq!(api.query_offsets(), vec![0, 10]);

    gate.send(Ok(page(10, 10, 30, 10, true))).unwrap();
    assert_eq!(
        assert_ready!(next.poll()).unwrap(),
        PageOutcome::Loaded { received: 10, accumulated: 20 }
    );
    assert!(!engine.history().is_loading_more());
}

#[tokio::test]
async fn test_failed_page_keeps_accumulated_list() {
    let api = ScriptedApi::new();
    api.push_page(Ok(page(0, 10, 30, 10, true)));
    api.push_page(Err(server_error()));
    api.push_page(Ok(page(10, 10, 30, 10, true)));
    let engine = engine(api.clone());
    engine.load_first_page().await.unwrap();
    let before = engine.entries();
    let cursor = engine.pagination();

    let err = engine.load_next_page().await.unwrap_err();

    assert!(matches!(err, HistoryLoadError::Api(_)));
    assert_eq!(engine.entries(), before);
    assert_eq!(engine.pagination(), cursor);
    assert!(engine.history().last_error().is_some());

    engine.load_next_page().await.unwrap();
    assert_eq!(engine.entries().len(), 20);
    assert!(engine.history().last_error().is_none());
    assert_eq!(api.query_offsets(), vec![0, 10, 10]);
}

#[tokio::test]
async fn test_refresh_resets_to_first_page() {
    let api = ScriptedApi::new();
    api.push_page(Ok(page(0, 10, 30, 10, true)));
    api.push_page(Ok(page(10, 10, 30, 10, true)));
    api.push_page(Ok(page(0, 10, 31, 10, true)));
    let engine = engine(api.clone());
    engine.load_first_page().await.unwrap();
    engine.load_next_page().await.unwrap();
    assert_eq!(engine.entries().len(), 20);

    engine.refresh_history().await.unwrap();

    assert_eq!(engine.entries().len(), 10);
    assert_eq!(engine.pagination().unwrap().offset, 0);
    assert_eq!(engine.pagination().unwrap().total, 31);
}

#[tokio::test]
async fn test_refresh_in_flight_is_reported_separately() {
    let api = ScriptedApi::new();
    api.push_page(Ok(page(0, 10, 30, 10, true)));
    let engine = engine(api.clone());
    engine.load_first_page().await.unwrap();
    let gate = api.defer_page();

    let mut refresh = task::spawn(engine.refresh_history());
    assert_pending!(refresh.poll());
    assert!(engine.is_refreshing());
    assert!(!engine.is_loading());

    gate.send(Ok(page(0, 10, 30, 10, true))).unwrap();
    assert_ready!(refresh.poll()).unwrap();
    assert!(!engine.is_refreshing());
}

#[tokio::test]
async fn test_page_from_before_refresh_is_dropped() {
    let api = ScriptedApi::new();
    api.push_page(Ok(page(0, 10, 30, 10, true)));
    let engine = engine(api.clone());
    engine.load_first_page().await.unwrap();

    let gate = api.defer_page();
    let mut next = task::spawn(engine.load_next_page());
    assert_pending!(next.poll());

    api.push_page(Ok(page(0, 8, 8, 10, false)));
    engine.refresh_history().await.unwrap();
    assert_eq!(engine.entries().len(), 8);

    gate.send(Ok(page(10, 10, 30, 10, true))).unwrap();
    assert_eq!(assert_ready!(next.poll()).unwrap(), PageOutcome::Stale);
    assert_eq!(engine.entries().len(), 8);
    assert!(!engine.pagination().unwrap().has_more);
    assert!(!engine.history().is_loading_more());
}

#[tokio::test]
async fn test_scroll_near_bottom_loads_next_page() {
    let api = ScriptedApi::new();
    api.push_page(Ok(page(0, 10, 20, 10, true)));
    api.push_page(Ok(page(10, 10, 20, 10, false)));
    let engine = engine(api.clone());
    engine.load_first_page().await.unwrap();

    let far = ScrollMetrics::new(0.0, 600.0, 1500.0);
    assert_eq!(
        engine.on_history_scroll_settled(far).await.unwrap(),
        PageOutcome::Skipped(SkipReason::NotNearBottom)
    );

    let near = ScrollMetrics::new(850.0, 600.0, 1500.0);
    assert_eq!(
        engine.on_history_scroll_settled(near).await.unwrap(),
        PageOutcome::Loaded { received: 10, accumulated: 20 }
    );
}

#[tokio::test]
async fn test_history_items_carry_preview_and_label() {
    let api = ScriptedApi::new();
    api.push_page(Ok(page(0, 2, 2, 10, false)));
    let engine = engine(api.clone());
    engine.load_first_page().await.unwrap();

    let now = Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap();
    let items = engine.history_items(&now);

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Conversation 0");
    assert_eq!(items[0].preview.as_deref(), Some("You: question 0"));
    assert_eq!(items[0].time_label, "12:00");
    assert_eq!(items[1].time_label, "11:00");
}
