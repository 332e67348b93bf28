//! Query state and its transitions.
//!
//! [`QueryState`] is the canonical state a notice list is rendered from. It
//! changes only through [`QueryState::on_event`], a pure, total function:
//! every event is accepted in every status. Results that arrive "out of
//! order" (a success while idle, say) are applied as if the machine had been
//! loading; deciding whether a result should be applied at all is the job of
//! the sequence gate in [`crate::machine`].

use serde::{Deserialize, Serialize};

use notice_types::{Cursor, Notice};

use crate::pagination::{PageBounds, PaginationCursor};
use crate::query::PageSize;

/// Lifecycle status of the notice list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryStatus {
    /// Nothing requested yet. Unreachable after the first fetch.
    #[default]
    Idle,
    /// A fetch is outstanding; items may be stale.
    Loading,
    /// The latest fetch delivered a page.
    Success,
    /// The latest fetch failed; items are the last good page.
    Error,
}

/// Events that drive the query state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A fetch was issued.
    RequestFetch,
    /// A fetch delivered a page (already in canonical order).
    FetchSucceeded {
        /// Filter the page was fetched for.
        filter: String,
        /// The delivered notices.
        page: Vec<Notice>,
    },
    /// A fetch failed.
    FetchFailed {
        /// The underlying failure's message.
        message: String,
    },
    /// The raw search input changed.
    InputChanged {
        /// New raw input, before debouncing.
        value: String,
    },
}

/// Canonical state of a notice list session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    status: QueryStatus,
    items: Vec<Notice>,
    error_message: String,
    input: String,
    filter: String,
    page_size: PageSize,
    cursor: PaginationCursor,
}

impl QueryState {
    /// Create an idle state for the given page size.
    pub fn new(page_size: PageSize) -> Self {
        Self {
            status: QueryStatus::Idle,
            items: Vec::new(),
            error_message: String::new(),
            input: String::new(),
            filter: String::new(),
            page_size,
            cursor: PaginationCursor::new(),
        }
    }

    /// Apply an event and return the next state.
    ///
    /// This is a pure function - no side effects.
    pub fn on_event(mut self, event: Event) -> Self {
        match event {
            // Items and cursors stay so the previous page can be shown while
            // loading
            Event::RequestFetch => {
                self.status = QueryStatus::Loading;
                self.error_message.clear();
            }
            Event::FetchSucceeded { filter, page } => {
                self.status = QueryStatus::Success;
                self.cursor.update(&page);
                self.items = page;
                self.filter = filter;
                self.error_message.clear();
            }
            // Last known good items and cursors are kept
            Event::FetchFailed { message } => {
                self.status = QueryStatus::Error;
                self.error_message = message;
            }
            Event::InputChanged { value } => {
                self.input = value;
            }
        }
        self
    }

    /// Current status.
    pub fn status(&self) -> QueryStatus {
        self.status
    }

    /// Notices of the current page, in canonical order.
    pub fn items(&self) -> &[Notice] {
        &self.items
    }

    /// Message of the latest failure, empty unless the status is `Error`.
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// Raw search input, before debouncing.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Filter the current page was fetched for.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Page size of the session.
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Cursor at the first notice of the current page.
    pub fn first_visible(&self) -> Option<&Cursor> {
        self.cursor.first_visible()
    }

    /// Cursor at the last notice of the current page.
    pub fn last_visible(&self) -> Option<&Cursor> {
        self.cursor.last_visible()
    }

    /// Boundaries of the current page.
    pub fn bounds(&self) -> &PageBounds {
        self.cursor.bounds()
    }

    /// Check if a fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    /// Project the state into the one view a renderer should show.
    pub fn view(&self, policy: ErrorView) -> View<'_> {
        match self.status {
            QueryStatus::Idle => View::Idle,
            QueryStatus::Loading => View::Loading { stale: &self.items },
            QueryStatus::Success => View::Table { items: &self.items },
            QueryStatus::Error => View::Error {
                message: &self.error_message,
                retained: match policy {
                    ErrorView::KeepItems => self.items.as_slice(),
                    ErrorView::ErrorPanel => &[],
                },
            },
        }
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

/// What a renderer shows alongside an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorView {
    /// Keep the last successful page visible under the error message.
    #[default]
    KeepItems,
    /// Replace the table with an error panel.
    ErrorPanel,
}

/// The mutually exclusive views a renderer chooses between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View<'a> {
    /// Nothing requested yet.
    Idle,
    /// Loading indicator; the previous page may be shown dimmed.
    Loading {
        /// Items from before the fetch was issued.
        stale: &'a [Notice],
    },
    /// Error panel with a retry action.
    Error {
        /// The underlying failure's message.
        message: &'a str,
        /// Items to keep showing, per [`ErrorView`].
        retained: &'a [Notice],
    },
    /// Table of the current page.
    Table {
        /// Notices to list.
        items: &'a [Notice],
    },
}
