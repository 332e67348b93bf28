//! # notice-types
//!
//! Data model for the noticeboard query controller.
//!
//! This crate provides the foundational types used across all noticeboard crates:
//! - [`NoticeId`], [`Timestamp`], [`Cursor`] - Identity and ordering types
//! - [`Notice`] - The read-only record owned by the remote store
//! - [`SortSpec`] - The single-field sort a session queries with
//! - [`StoreError`] - Failures reported by the remote store

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod notice;
mod sort;

pub use error::StoreError;
pub use ids::{Cursor, NoticeId, Timestamp};
pub use notice::Notice;
pub use sort::{SortDirection, SortField, SortSpec};
