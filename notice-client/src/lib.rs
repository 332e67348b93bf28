//! # notice-client
//!
//! Fetch orchestration for the noticeboard query controller.
//!
//! This is the library a notice list page uses to search and paginate.
//!
//! ## Features
//!
//! - **Debounced search**: raw keystrokes become one fetch per quiet period
//! - **Cursor pagination**: next/previous relative to the current page
//! - **Stale-result protection**: only the most recently issued fetch may
//!   change the state, whatever order results arrive in
//! - **Store Abstraction**: pluggable document store ([`MemoryStore`] for tests
//!   and demos)
//! - **Pure State Machine**: uses notice-core for side-effect-free logic
//!
//! ## Example
//!
//! ```ignore
//! use noticeboard_client::{FetchOrchestrator, MemoryStore, QueryConfig};
//!
//! let store = MemoryStore::with_notices("notices", notices);
//! let orchestrator = FetchOrchestrator::new(store, &QueryConfig::default())?;
//! let mut state = orchestrator.subscribe();
//!
//! // Keystrokes are debounced into a single fetch
//! orchestrator.search("Roa").await?;
//! orchestrator.search("Road").await?;
//!
//! orchestrator.next_page().await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod debounce;
pub mod orchestrator;
pub mod store;

pub use config::{ConfigError, QueryConfig};
pub use debounce::{DebounceHandle, Debounced, Debouncer};
pub use orchestrator::{ClientError, FetchOrchestrator, FetchOutcome};
pub use store::{HeldQuery, MemoryStore, NoticeStore};
