//! In-memory document store.
//!
//! Executes queries against collections held in memory. Allows injecting
//! failures, holding queries until released, and inspecting every executed
//! query for verification.

use super::NoticeStore;
use async_trait::async_trait;
use notice_core::QueryDescription;
use notice_types::{Notice, StoreError};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

/// In-memory document store.
///
/// Clones share the same collections, so a test can keep a handle for
/// inspection after moving one into an orchestrator.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    collections: HashMap<String, Vec<Notice>>,
    executed: Vec<QueryDescription>,
    fail_next: VecDeque<StoreError>,
    holds: VecDeque<oneshot::Receiver<()>>,
}

/// A query held inside [`MemoryStore::execute`] until released.
///
/// Dropping the handle releases the query too.
#[derive(Debug)]
pub struct HeldQuery(oneshot::Sender<()>);

impl HeldQuery {
    /// Let the held query return its result.
    pub fn release(self) {
        let _ = self.0.send(());
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one collection.
    pub fn with_notices(collection: &str, notices: impl IntoIterator<Item = Notice>) -> Self {
        let store = Self::new();
        store.replace_collection(collection, notices);
        store
    }

    /// Add a notice to a collection, creating it if needed.
    pub fn insert(&self, collection: &str, notice: Notice) {
        let mut inner = self.lock();
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(notice);
    }

    /// Replace the contents of a collection.
    pub fn replace_collection(&self, collection: &str, notices: impl IntoIterator<Item = Notice>) {
        let mut inner = self.lock();
        inner
            .collections
            .insert(collection.to_string(), notices.into_iter().collect());
    }

    /// Get every query that was executed, in call order.
    pub fn executed_queries(&self) -> Vec<QueryDescription> {
        self.lock().executed.clone()
    }

    /// Get the most recently executed query.
    pub fn last_query(&self) -> Option<QueryDescription> {
        self.lock().executed.last().cloned()
    }

    /// Number of queries executed so far.
    pub fn execute_count(&self) -> usize {
        self.lock().executed.len()
    }

    /// Cause the next `execute()` to fail with the given error.
    ///
    /// Calls queue up: each one fails one subsequent query.
    pub fn fail_next(&self, error: StoreError) {
        self.lock().fail_next.push_back(error);
    }

    /// Hold the next `execute()` until the returned handle is released.
    ///
    /// The held query's result is computed when it is called, so releasing
    /// it later delivers a result that may already be outdated.
    pub fn hold_next(&self) -> HeldQuery {
        let (tx, rx) = oneshot::channel();
        self.lock().holds.push_back(rx);
        HeldQuery(tx)
    }

    /// Clear all state (collections, history, injected failures, holds).
    pub fn reset(&self) {
        *self.lock() = MemoryStoreInner::default();
    }

    fn lock(&self) -> MutexGuard<'_, MemoryStoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Apply a query to a collection the way a document store would.
fn run_query(notices: &[Notice], query: &QueryDescription) -> Vec<Notice> {
    let order = query.order();
    let mut matching: Vec<&Notice> = notices
        .iter()
        .filter(|notice| query.matches(notice) && query.is_past_start(notice))
        .collect();
    matching.sort_by(|a, b| order.compare(a, b));
    matching
        .into_iter()
        .take(query.limit() as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl NoticeStore for MemoryStore {
    async fn execute(&self, query: &QueryDescription) -> Result<Vec<Notice>, StoreError> {
        let (result, hold) = {
            let mut inner = self.lock();
            inner.executed.push(query.clone());
            let hold = inner.holds.pop_front();

            // Check for forced failure
            let result = match inner.fail_next.pop_front() {
                Some(error) => Err(error),
                None => Ok(inner
                    .collections
                    .get(query.collection())
                    .map(|notices| run_query(notices, query))
                    .unwrap_or_default()),
            };
            (result, hold)
        };

        if let Some(hold) = hold {
            // A dropped handle counts as a release
            let _ = hold.await;
        }
        result
    }
}
