//! Error types for the remote notice store.

use thiserror::Error;

/// A failure reported by the remote document store.
///
/// Every variant carries the store's own message, and `Display` renders
/// exactly that message so it can be surfaced to the user unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The caller may not read the collection.
    #[error("{0}")]
    PermissionDenied(String),

    /// The store could not be reached.
    #[error("{0}")]
    Unavailable(String),

    /// A read quota was exhausted.
    #[error("{0}")]
    QuotaExceeded(String),

    /// Any other store-side failure.
    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// The store's message.
    pub fn message(&self) -> &str {
        match self {
            Self::PermissionDenied(msg)
            | Self::Unavailable(msg)
            | Self::QuotaExceeded(msg)
            | Self::Other(msg) => msg,
        }
    }

    /// Whether retrying the same query may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::QuotaExceeded(_))
    }
}
