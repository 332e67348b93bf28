//! Configuration loading for notice list sessions.
//!
//! Configuration is loaded from a TOML file (default: `noticeboard.toml`).
//! Every field is optional:
//!
//! ```toml
//! collection = "notices"
//! page_size = 10
//! sort_direction = "descending"
//! debounce_ms = 500
//! upper_bound = "sentinel"      # or "successor"
//! error_view = "keep_items"     # or "error_panel"
//! ```

use notice_core::{ErrorView, PageSize, QueryBuilder, UpperBound, DEFAULT_COLLECTION};
use notice_types::{SortDirection, SortSpec};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for one notice list session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    /// Collection to read notices from (default: "notices").
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Notices per page (default: 10).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Sort direction on publication date (default: descending).
    #[serde(default)]
    pub sort_direction: SortDirection,
    /// Quiet period in milliseconds before a search runs (default: 500).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// How prefix ranges are bounded (default: sentinel).
    #[serde(default)]
    pub upper_bound: UpperBound,
    /// What renderers show alongside an error (default: keep_items).
    #[serde(default)]
    pub error_view: ErrorView,
}

// Default value functions
fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_page_size() -> u32 {
    PageSize::DEFAULT.get()
}

fn default_debounce_ms() -> u64 {
    500
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            page_size: default_page_size(),
            sort_direction: SortDirection::default(),
            debounce_ms: default_debounce_ms(),
            upper_bound: UpperBound::default(),
            error_view: ErrorView::default(),
        }
    }
}

impl QueryConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Set the collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the sort direction.
    pub fn with_sort_direction(mut self, direction: SortDirection) -> Self {
        self.sort_direction = direction;
        self
    }

    /// Set the debounce quiet period.
    pub fn with_debounce(mut self, quiet: Duration) -> Self {
        self.debounce_ms = u64::try_from(quiet.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the upper-bound strategy.
    pub fn with_upper_bound(mut self, upper_bound: UpperBound) -> Self {
        self.upper_bound = upper_bound;
        self
    }

    /// Set the error view policy.
    pub fn with_error_view(mut self, error_view: ErrorView) -> Self {
        self.error_view = error_view;
        self
    }

    /// Check that the configuration describes a usable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection.is_empty() {
            return Err(ConfigError::Invalid("collection must not be empty".into()));
        }
        self.page_size()?;
        if self.debounce_ms == 0 {
            return Err(ConfigError::Invalid("debounce_ms must be positive".into()));
        }
        Ok(())
    }

    /// The validated page size.
    pub fn page_size(&self) -> Result<PageSize, ConfigError> {
        PageSize::new(self.page_size).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// The debounce quiet period.
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The session sort.
    pub fn sort(&self) -> SortSpec {
        SortSpec::by_publication_date(self.sort_direction)
    }

    /// Build the query builder for a session.
    pub fn query_builder(&self) -> Result<QueryBuilder, ConfigError> {
        self.validate()?;
        Ok(
            QueryBuilder::new(self.collection.clone(), self.sort(), self.page_size()?)
                .with_upper_bound(self.upper_bound),
        )
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
