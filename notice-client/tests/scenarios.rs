//! End-to-end scenarios for a notice list session against an in-memory store.

use std::time::Duration;

use noticeboard_client::{FetchOrchestrator, FetchOutcome, MemoryStore, QueryConfig};
use notice_core::{PageBounds, PaginationCursor, QueryStatus, UpperBound, View};
use notice_types::{Notice, StoreError, Timestamp};

/// Twelve notices, one per day, plus two that share a publication date.
fn fixture() -> Vec<Notice> {
    let mut notices: Vec<Notice> = (1..=12)
        .map(|day| {
            Notice::new(
                format!("n-{:02}", day),
                format!("Notice {:02}", day),
                Timestamp::from_secs(1_700_000_000 + day * 86_400),
            )
        })
        .collect();
    notices.push(Notice::new(
        "road-1",
        "Road Closure",
        Timestamp::from_secs(1_700_000_000 + 5 * 86_400),
    ));
    notices.push(Notice::new(
        "bridge-1",
        "Bridge Notice",
        Timestamp::from_secs(1_700_000_000 + 5 * 86_400),
    ));
    notices
}

/// Config whose initial search never fires within a test.
fn manual() -> QueryConfig {
    QueryConfig::default().with_debounce(Duration::from_secs(3_600))
}

fn session(config: QueryConfig) -> FetchOrchestrator<MemoryStore> {
    let store = MemoryStore::with_notices("notices", fixture());
    FetchOrchestrator::new(store, &config).expect("valid config")
}

fn item_ids(orchestrator: &FetchOrchestrator<MemoryStore>) -> Vec<String> {
    orchestrator
        .state()
        .items()
        .iter()
        .map(|n| n.id.to_string())
        .collect()
}

// ===========================================
// Debounce
// ===========================================

#[tokio::test(start_paused = true)]
async fn typing_burst_triggers_one_fetch_for_last_value() {
    let orchestrator = session(QueryConfig::default());
    let mut states = orchestrator.subscribe();

    for raw in ["R", "Ro", "Roa", "Road"] {
        orchestrator.search(raw).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
    }

    states
        .wait_for(|state| state.status() == QueryStatus::Success)
        .await
        .unwrap();

    // Let any further emission happen
    tokio::time::sleep(Duration::from_secs(2)).await;

    let executed = orchestrator.store().executed_queries();
    assert_eq!(executed.len(), 1);
    assert_eq!(executed[0].range().map(|r| r.start.as_str()), Some("Road"));
    assert_eq!(orchestrator.state().filter(), "Road");
}

#[tokio::test(start_paused = true)]
async fn pauses_longer_than_quiet_period_fetch_each_value() {
    let orchestrator = session(QueryConfig::default().with_debounce(Duration::from_millis(300)));

    orchestrator.search("Road").await.unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;
    orchestrator.search("").await.unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;

    let filters: Vec<Option<String>> = orchestrator
        .store()
        .executed_queries()
        .iter()
        .map(|q| q.range().map(|r| r.start.clone()))
        .collect();
    assert_eq!(filters, vec![Some("Road".to_string()), None]);
}

// ===========================================
// Pagination
// ===========================================

#[test]
fn cursor_tracks_first_and_last_of_page() {
    let page = fixture();
    let mut cursor = PaginationCursor::new();

    cursor.update(&page);
    assert!(cursor.first_visible().unwrap().points_at(&page[0]));
    assert!(cursor.last_visible().unwrap().points_at(&page[page.len() - 1]));

    cursor.update(&[]);
    assert_eq!(cursor.first_visible(), None);
    assert_eq!(cursor.last_visible(), None);
    assert_eq!(cursor.bounds(), &PageBounds::Empty);
}

#[tokio::test]
async fn previous_after_next_returns_prior_page() {
    let orchestrator = session(manual().with_page_size(4));

    orchestrator.fetch("").await;
    let first = item_ids(&orchestrator);

    orchestrator.next_page().await;
    let second = item_ids(&orchestrator);
    orchestrator.next_page().await;
    assert_ne!(item_ids(&orchestrator), second);

    orchestrator.previous_page().await;
    assert_eq!(item_ids(&orchestrator), second);

    orchestrator.previous_page().await;
    assert_eq!(item_ids(&orchestrator), first);
}

#[tokio::test]
async fn paging_visits_every_notice_once_across_ties() {
    let orchestrator = session(manual().with_page_size(3));
    orchestrator.fetch("").await;

    let mut seen = item_ids(&orchestrator);
    while orchestrator.next_page().await.is_loaded() {
        let page = item_ids(&orchestrator);
        if page.is_empty() {
            break;
        }
        seen.extend(page);
    }

    let mut unique = seen.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(seen.len(), 14);
    assert_eq!(unique.len(), 14);
}

#[tokio::test]
async fn next_page_without_cursor_is_a_no_op() {
    let orchestrator = session(manual());
    let before = orchestrator.state();

    let outcome = orchestrator.next_page().await;

    assert_eq!(outcome, FetchOutcome::Skipped);
    assert_eq!(orchestrator.store().execute_count(), 0);
    assert_eq!(orchestrator.state(), before);
}

// ===========================================
// Staleness
// ===========================================

#[tokio::test]
async fn later_request_wins_when_earlier_resolves_last() {
    let orchestrator = session(manual());
    let hold_a = orchestrator.store().hold_next();

    // A: issued first, held inside the store
    let a = tokio::spawn({
        let orchestrator = orchestrator.clone();
        async move { orchestrator.fetch("Notice").await }
    });
    while orchestrator.store().execute_count() < 1 {
        tokio::task::yield_now().await;
    }

    // B: issued second, resolves first
    let b = orchestrator.fetch("Road").await;
    assert!(b.is_loaded());

    hold_a.release();
    let a = a.await.unwrap();

    assert!(matches!(a, FetchOutcome::Stale(_)));
    let state = orchestrator.state();
    assert_eq!(state.status(), QueryStatus::Success);
    assert_eq!(state.filter(), "Road");
    assert_eq!(item_ids(&orchestrator), vec!["road-1"]);
}

// ===========================================
// Filtering
// ===========================================

#[tokio::test(start_paused = true)]
async fn untouched_session_lists_newest_first_page() {
    let orchestrator = session(QueryConfig::default());

    tokio::time::sleep(Duration::from_millis(600)).await;
    let mut states = orchestrator.subscribe();
    states
        .wait_for(|state| state.status() == QueryStatus::Success)
        .await
        .unwrap();

    let state = orchestrator.state();
    assert_eq!(orchestrator.store().execute_count(), 1);
    assert_eq!(state.filter(), "");
    assert_eq!(state.items().len(), 10);
    assert_eq!(state.items()[0].id.as_str(), "n-12");
}

#[tokio::test]
async fn empty_filter_lists_newest_first_page() {
    let orchestrator = session(manual());

    orchestrator.fetch("").await;

    let state = orchestrator.state();
    assert_eq!(state.status(), QueryStatus::Success);
    assert_eq!(state.items().len(), 10);
    let dates: Vec<_> = state.items().iter().map(|n| n.publication_date).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);
    assert_eq!(state.items()[0].id.as_str(), "n-12");
}

#[tokio::test]
async fn road_filter_matches_by_prefix() {
    for strategy in [UpperBound::Sentinel, UpperBound::Successor] {
        let orchestrator = session(manual().with_upper_bound(strategy));

        orchestrator.fetch("Road").await;

        let query = orchestrator.store().last_query().unwrap();
        let range = query.range().unwrap();
        assert_eq!(range.start, "Road");
        assert!(range.contains("Road Closure"));
        assert!(!range.contains("Bridge Notice"));
        assert_eq!(item_ids(&orchestrator), vec!["road-1"]);
    }
}

// ===========================================
// Errors
// ===========================================

#[tokio::test]
async fn permission_error_keeps_items_and_reports_message() {
    let orchestrator = session(manual());
    orchestrator.fetch("").await;
    let before = orchestrator.state();

    orchestrator.store().fail_next(StoreError::PermissionDenied(
        "Missing or insufficient permissions.".into(),
    ));
    orchestrator.fetch("").await;

    let state = orchestrator.state();
    assert_eq!(state.status(), QueryStatus::Error);
    assert_eq!(state.error_message(), "Missing or insufficient permissions.");
    assert_eq!(state.items(), before.items());
    assert!(matches!(
        state.view(orchestrator.error_view()),
        View::Error { retained, .. } if retained.len() == 10
    ));
}
