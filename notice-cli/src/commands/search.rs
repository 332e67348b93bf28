//! Fetch pages for a filter and print them.

use anyhow::Result;
use notice_client::{FetchOrchestrator, FetchOutcome, NoticeStore};

use crate::render;

/// Run the search command.
pub async fn run<S: NoticeStore + 'static>(
    orchestrator: &FetchOrchestrator<S>,
    filter: &str,
    pages: u32,
) -> Result<()> {
    let mut outcome = orchestrator.fetch(filter).await;

    for page in 1..=pages {
        if page > 1 {
            outcome = orchestrator.next_page().await;
            if outcome == FetchOutcome::Skipped {
                break;
            }
        }

        println!("Page {}:", page);
        let state = orchestrator.state();
        print!("{}", render::view(state.view(orchestrator.error_view())));

        if !outcome.is_loaded() || state.items().is_empty() {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notice_client::{MemoryStore, QueryConfig};
    use notice_core::QueryStatus;
    use notice_types::{Notice, StoreError, Timestamp};

    fn orchestrator() -> FetchOrchestrator<MemoryStore> {
        let notices = (1..=5).map(|i| {
            Notice::new(
                format!("n-{}", i),
                format!("Notice {}", i),
                Timestamp::from_secs(i * 60),
            )
        });
        let store = MemoryStore::with_notices("notices", notices);
        // Long enough that the initial search never fires during a test
        let config = QueryConfig::default()
            .with_page_size(2)
            .with_debounce(std::time::Duration::from_secs(3_600));
        FetchOrchestrator::new(store, &config).unwrap()
    }

    #[tokio::test]
    async fn follows_requested_pages() {
        let orchestrator = orchestrator();

        run(&orchestrator, "", 2).await.unwrap();

        assert_eq!(orchestrator.store().execute_count(), 2);
        let ids: Vec<_> = orchestrator
            .state()
            .items()
            .iter()
            .map(|n| n.id.to_string())
            .collect();
        assert_eq!(ids, vec!["n-3", "n-2"]);
    }

    #[tokio::test]
    async fn stops_at_last_page() {
        let orchestrator = orchestrator();

        run(&orchestrator, "", 10).await.unwrap();

        // Three pages with items, then one empty page
        assert_eq!(orchestrator.store().execute_count(), 4);
    }

    #[tokio::test]
    async fn stops_after_failure() {
        let orchestrator = orchestrator();
        orchestrator
            .store()
            .fail_next(StoreError::PermissionDenied("denied".into()));

        run(&orchestrator, "", 3).await.unwrap();

        assert_eq!(orchestrator.store().execute_count(), 1);
        assert_eq!(orchestrator.state().status(), QueryStatus::Error);
    }
}
