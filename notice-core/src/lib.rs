//! # notice-core
//!
//! Pure query state logic for noticeboard (no I/O, instant tests).
//!
//! This crate implements the state machine and algorithms behind a
//! search-as-you-type, cursor-paginated notice list without any network
//! access or timers, enabling fast unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects:
//! - [`debounce`] decides *when* a value is stable, given the current instant
//! - [`query`] turns a filter and cursor into a declarative query description
//! - [`pagination`] derives page boundaries from a delivered page
//! - [`state`] and [`machine`] own the canonical state and its transitions
//!
//! The actual I/O (store round trips, timers) is performed by `notice-client`,
//! which drives these components.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod debounce;
pub mod machine;
pub mod pagination;
pub mod query;
pub mod state;

pub use debounce::{DebounceState, DEFAULT_QUIET_PERIOD};
pub use machine::{Applied, QueryStateMachine, RequestSeq, StaleResultDiscarded, SubscriptionId};
pub use pagination::{PageBounds, PaginationCursor};
pub use query::{
    Direction, FilterRejection, InvalidFilterError, PageSize, PageSizeError, QueryBuilder,
    QueryDescription, TitleRange, UpperBound, DEFAULT_COLLECTION, SENTINEL,
};
pub use state::{ErrorView, Event, QueryState, QueryStatus, View};
