//! FetchOrchestrator - the main interface of a notice list session.
//!
//! # Architecture
//!
//! The orchestrator uses the pure components from notice-core for every
//! decision and performs the I/O itself:
//!
//! ```text
//! search(raw) ──▶ Debouncer ──▶ fetch(filter) ─┐
//! next_page / previous_page / retry ───────────┤
//!                                              ▼
//!        QueryStateMachine::request_fetch (seq, Loading)
//!                        │
//!                QueryBuilder::build
//!                        │
//!          NoticeStore::execute  (no lock held)
//!                        │
//!        into_canonical → fetch_succeeded / fetch_failed (seq gate)
//!                        │
//!                  watch::Sender<QueryState> ──▶ renderers
//! ```
//!
//! The session mutex is held only for synchronous transitions, never across
//! a store call, so any number of fetches may be in flight. Only the most
//! recently issued one can change the state.
//!
//! # Example
//!
//! ```ignore
//! let orchestrator = FetchOrchestrator::new(store, &QueryConfig::default())?;
//! let mut states = orchestrator.subscribe();
//!
//! orchestrator.fetch("").await;
//! orchestrator.next_page().await;
//! orchestrator.previous_page().await;
//! ```

use std::sync::{Arc, Weak};
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use notice_core::{
    Applied, Direction, ErrorView, InvalidFilterError, QueryBuilder, QueryDescription, QueryState,
    QueryStateMachine, RequestSeq, StaleResultDiscarded,
};
use notice_types::Cursor;

use crate::config::{ConfigError, QueryConfig};
use crate::debounce::{DebounceHandle, Debounced, Debouncer};
use crate::store::NoticeStore;

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The session's background tasks have stopped.
    #[error("session closed")]
    SessionClosed,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// What became of one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was applied to the state.
    Loaded {
        /// Sequence number of the fetch.
        seq: RequestSeq,
        /// Number of notices on the page.
        count: usize,
    },
    /// The failure was applied to the state.
    Failed {
        /// Sequence number of the fetch.
        seq: RequestSeq,
        /// The failure's message, as placed in the state.
        message: String,
    },
    /// A newer fetch was issued first; the result was dropped.
    Stale(StaleResultDiscarded),
    /// Nothing to fetch (no cursor, or nothing to retry). State unchanged.
    Skipped,
}

impl FetchOutcome {
    /// Check whether the outcome changed the state's items.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Parameters of one page read, kept so it can be retried.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FetchRequest {
    filter: String,
    cursor: Option<Cursor>,
    direction: Direction,
}

impl FetchRequest {
    fn first_page(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            cursor: None,
            direction: Direction::None,
        }
    }

    fn relative(filter: &str, cursor: &Cursor, direction: Direction) -> Self {
        Self {
            filter: filter.to_string(),
            cursor: Some(cursor.clone()),
            direction,
        }
    }
}

/// A fetch that has been issued but not yet completed.
struct Issued {
    seq: RequestSeq,
    filter: String,
    query: Result<QueryDescription, InvalidFilterError>,
}

struct Session {
    machine: QueryStateMachine,
    last_request: Option<FetchRequest>,
}

struct Shared<S> {
    store: S,
    builder: QueryBuilder,
    error_view: ErrorView,
    session: Mutex<Session>,
    state_tx: Arc<watch::Sender<QueryState>>,
    input: DebounceHandle,
}

/// Drives one notice list session.
///
/// Cheap to clone; clones share the session. Background tasks stop once the
/// last clone is dropped.
pub struct FetchOrchestrator<S: NoticeStore> {
    shared: Arc<Shared<S>>,
}

impl<S: NoticeStore> Clone for FetchOrchestrator<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: NoticeStore + 'static> FetchOrchestrator<S> {
    /// Start a session against `store`.
    ///
    /// Must be called from within a tokio runtime: the debouncer and the
    /// search pump run as background tasks. The search box starts empty, so
    /// unless [`search`](Self::search) is called first, the unfiltered first
    /// page is fetched once the first quiet period has passed.
    pub fn new(store: S, config: &QueryConfig) -> Result<Self, ClientError> {
        let builder = config.query_builder()?;

        let mut machine = QueryStateMachine::new(builder.page_size());
        let (state_tx, _) = watch::channel(machine.state().clone());
        let state_tx = Arc::new(state_tx);
        let listener_tx = Arc::clone(&state_tx);
        machine.subscribe(move |state| {
            listener_tx.send_replace(state.clone());
        });

        let (input, debounced) = Debouncer::new(config.quiet_period()).start_with("");

        let shared = Arc::new(Shared {
            store,
            builder,
            error_view: config.error_view,
            session: Mutex::new(Session {
                machine,
                last_request: None,
            }),
            state_tx,
            input,
        });
        spawn_search_pump(Arc::downgrade(&shared), debounced);

        info!(
            collection = %config.collection,
            page_size = config.page_size,
            debounce_ms = config.debounce_ms,
            "notice list session started"
        );
        Ok(Self { shared })
    }

    /// Record a change to the search box.
    ///
    /// The raw value is stored immediately; a first-page fetch for it runs
    /// once the input has been quiet for the configured period.
    pub async fn search(&self, raw: impl Into<String>) -> Result<(), ClientError> {
        let raw = raw.into();
        self.shared
            .session
            .lock()
            .await
            .machine
            .input_changed(raw.clone());
        self.shared.input.observe(raw)
    }

    /// Fetch the first page for `filter` immediately.
    pub async fn fetch(&self, filter: impl Into<String>) -> FetchOutcome {
        let request = FetchRequest::first_page(filter);
        self.run(move |_, _| Some(request)).await
    }

    /// Fetch the page after the current one.
    ///
    /// Skipped when no page with items is displayed.
    pub async fn next_page(&self) -> FetchOutcome {
        self.run(|state, _| {
            state
                .last_visible()
                .map(|cursor| FetchRequest::relative(state.filter(), cursor, Direction::Forward))
        })
        .await
    }

    /// Fetch the page before the current one.
    ///
    /// Skipped when no page with items is displayed.
    pub async fn previous_page(&self) -> FetchOutcome {
        self.run(|state, _| {
            state
                .first_visible()
                .map(|cursor| FetchRequest::relative(state.filter(), cursor, Direction::Backward))
        })
        .await
    }

    /// Re-issue the most recent request. Skipped if nothing was requested.
    pub async fn retry(&self) -> FetchOutcome {
        self.run(|_, last| last.cloned()).await
    }

    /// Fetch the first page of the filter currently displayed.
    pub async fn first_page(&self) -> FetchOutcome {
        self.run(|state, _| Some(FetchRequest::first_page(state.filter())))
            .await
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> QueryState {
        QueryState::clone(&self.shared.state_tx.borrow())
    }

    /// Receive a snapshot after every applied transition.
    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.shared.state_tx.subscribe()
    }

    /// The session's error view policy.
    pub fn error_view(&self) -> ErrorView {
        self.shared.error_view
    }

    /// The session's query builder.
    pub fn query_builder(&self) -> &QueryBuilder {
        &self.shared.builder
    }

    /// Get a reference to the store (for testing).
    pub fn store(&self) -> &S {
        &self.shared.store
    }

    async fn run<F>(&self, plan: F) -> FetchOutcome
    where
        F: FnOnce(&QueryState, Option<&FetchRequest>) -> Option<FetchRequest>,
    {
        match self.issue(plan).await {
            Some(issued) => self.complete(issued).await,
            None => {
                debug!("nothing to fetch, skipped");
                FetchOutcome::Skipped
            }
        }
    }

    /// Plan a request against the current state and issue it.
    async fn issue<F>(&self, plan: F) -> Option<Issued>
    where
        F: FnOnce(&QueryState, Option<&FetchRequest>) -> Option<FetchRequest>,
    {
        let mut session = self.shared.session.lock().await;
        let request = plan(session.machine.state(), session.last_request.as_ref())?;

        let seq = session.machine.request_fetch();
        let query = self.shared.builder.build(
            &request.filter,
            request.cursor.as_ref(),
            request.direction,
        );
        match &query {
            Ok(query) => debug!(%seq, %query, "fetch issued"),
            Err(e) => debug!(%seq, error = %e, "fetch issued for invalid filter"),
        }

        let filter = request.filter.clone();
        session.last_request = Some(request);
        Some(Issued { seq, filter, query })
    }

    /// Execute an issued fetch and submit its result.
    async fn complete(&self, issued: Issued) -> FetchOutcome {
        let Issued { seq, filter, query } = issued;

        let result = match query {
            Ok(query) => match self.shared.store.execute(&query).await {
                Ok(page) => Ok(query.into_canonical(page)),
                Err(e) => {
                    warn!(%seq, error = %e, transient = e.is_transient(), "store query failed");
                    Err(e.message().to_string())
                }
            },
            Err(e) => Err(e.to_string()),
        };

        let mut session = self.shared.session.lock().await;
        let (applied, outcome) = match result {
            Ok(page) => {
                let count = page.len();
                (
                    session.machine.fetch_succeeded(seq, filter, page),
                    FetchOutcome::Loaded { seq, count },
                )
            }
            Err(message) => (
                session.machine.fetch_failed(seq, message.clone()),
                FetchOutcome::Failed { seq, message },
            ),
        };

        match applied {
            Applied::Transitioned => {
                debug!(%seq, ?outcome, "fetch applied");
                outcome
            }
            Applied::Discarded(stale) => {
                debug!(seq = %stale.seq, latest = %stale.latest, "stale result discarded");
                FetchOutcome::Stale(stale)
            }
        }
    }
}

/// Turn every debounced search value into a first-page fetch.
///
/// Holds the session weakly so it does not keep itself alive; stops once
/// the session is gone.
fn spawn_search_pump<S: NoticeStore + 'static>(session: Weak<Shared<S>>, mut debounced: Debounced) {
    tokio::spawn(async move {
        while let Some(filter) = debounced.recv().await {
            let Some(shared) = session.upgrade() else {
                break;
            };
            let orchestrator = FetchOrchestrator { shared };

            // Issue here so sequence numbers follow the order of searches
            let request = FetchRequest::first_page(filter);
            if let Some(issued) = orchestrator.issue(move |_, _| Some(request)).await {
                tokio::spawn(async move {
                    orchestrator.complete(issued).await;
                });
            }
        }
        debug!("search pump stopped");
    });
}
