//! Document store abstraction for noticeboard.
//!
//! This module provides a pluggable store layer that abstracts the remote
//! document database the notices live in (a hosted document store in
//! production, [`MemoryStore`] for tests and demos).
//!
//! # Design
//!
//! The store executes one declarative [`QueryDescription`] per call and
//! returns the matching notices in the query's scan order. It knows nothing
//! about debouncing, state, or which request is current: results of
//! superseded requests are discarded by the caller, not cancelled here.
//!
//! # Example
//!
//! ```ignore
//! let store = MemoryStore::with_notices("notices", notices);
//! let query = QueryBuilder::default().build("Road", None, Direction::None)?;
//! let page = store.execute(&query).await?;
//! ```

mod memory;

pub use memory::{HeldQuery, MemoryStore};

use async_trait::async_trait;
use notice_core::QueryDescription;
use notice_types::{Notice, StoreError};

/// Store trait for executing notice queries.
///
/// Implementations own their connection (or collection handle); one is
/// constructed per session and passed to the orchestrator explicitly.
#[async_trait]
pub trait NoticeStore: Send + Sync {
    /// Execute a query and return the page in the query's scan order.
    ///
    /// The page holds at most `query.limit()` notices, all inside the
    /// query's title range and strictly past its start cursor.
    async fn execute(&self, query: &QueryDescription) -> Result<Vec<Notice>, StoreError>;
}
