//! Sequence-gated owner of the query state.
//!
//! [`QueryStateMachine`] owns the one [`QueryState`] of a session and is the
//! only thing that mutates it. On top of the pure reducer it adds two things:
//!
//! - **Sequence gating.** Every fetch is stamped with a [`RequestSeq`] when it
//!   is issued. A result is applied only if its sequence number is still the
//!   latest one issued; anything older is discarded and reported as
//!   [`StaleResultDiscarded`]. After all outstanding fetches settle, the state
//!   therefore reflects the most recently *initiated* request, whatever order
//!   the results arrived in.
//! - **Subscriptions.** Listeners registered with
//!   [`subscribe`](QueryStateMachine::subscribe) receive a snapshot after
//!   every applied transition, so renderers (and tests) can observe the state
//!   without polling.

use std::fmt;
use thiserror::Error;

use notice_types::Notice;

use crate::query::PageSize;
use crate::state::{Event, QueryState};

/// Monotonically increasing identifier of an issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(u64);

impl RequestSeq {
    /// Numeric value of the sequence number.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A fetch result that arrived after a newer fetch was issued.
///
/// Never surfaced to the user; the result is dropped and state is untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("result of request {seq} discarded, superseded by request {latest}")]
pub struct StaleResultDiscarded {
    /// Sequence number of the discarded result.
    pub seq: RequestSeq,
    /// Latest sequence number issued when the result arrived.
    pub latest: RequestSeq,
}

/// Outcome of submitting a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The result was applied to the state.
    Transitioned,
    /// The result was stale and dropped.
    Discarded(StaleResultDiscarded),
}

impl Applied {
    /// Check whether the result changed the state.
    pub fn is_transitioned(&self) -> bool {
        matches!(self, Self::Transitioned)
    }
}

/// Handle for removing a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&QueryState) + Send + Sync>;

/// Owner of the canonical [`QueryState`].
pub struct QueryStateMachine {
    state: QueryState,
    issued: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl QueryStateMachine {
    /// Create a machine in the idle state.
    pub fn new(page_size: PageSize) -> Self {
        Self {
            state: QueryState::new(page_size),
            issued: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Sequence number of the most recently issued fetch.
    pub fn latest_seq(&self) -> Option<RequestSeq> {
        (self.issued > 0).then_some(RequestSeq(self.issued))
    }

    /// Check whether `seq` belongs to the most recently issued fetch.
    pub fn is_latest(&self, seq: RequestSeq) -> bool {
        seq.0 == self.issued
    }

    /// Issue a fetch: move to `Loading` and stamp it with a new sequence number.
    pub fn request_fetch(&mut self) -> RequestSeq {
        self.issued += 1;
        self.apply(Event::RequestFetch);
        RequestSeq(self.issued)
    }

    /// Submit the page delivered for fetch `seq`.
    pub fn fetch_succeeded(
        &mut self,
        seq: RequestSeq,
        filter: impl Into<String>,
        page: Vec<Notice>,
    ) -> Applied {
        if let Err(stale) = self.gate(seq) {
            return Applied::Discarded(stale);
        }
        self.apply(Event::FetchSucceeded {
            filter: filter.into(),
            page,
        });
        Applied::Transitioned
    }

    /// Submit the failure of fetch `seq`.
    pub fn fetch_failed(&mut self, seq: RequestSeq, message: impl Into<String>) -> Applied {
        if let Err(stale) = self.gate(seq) {
            return Applied::Discarded(stale);
        }
        self.apply(Event::FetchFailed {
            message: message.into(),
        });
        Applied::Transitioned
    }

    /// Record a change to the raw search input. Status is unchanged.
    pub fn input_changed(&mut self, value: impl Into<String>) {
        self.apply(Event::InputChanged {
            value: value.into(),
        });
    }

    /// Register a listener called with a snapshot after every applied
    /// transition. Discarded results do not notify.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&QueryState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn gate(&self, seq: RequestSeq) -> Result<(), StaleResultDiscarded> {
        if self.is_latest(seq) {
            Ok(())
        } else {
            Err(StaleResultDiscarded {
                seq,
                latest: RequestSeq(self.issued),
            })
        }
    }

    fn apply(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        self.state = state.on_event(event);
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }
}

impl fmt::Debug for QueryStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryStateMachine")
            .field("state", &self.state)
            .field("issued", &self.issued)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for QueryStateMachine {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}
