//! Query construction for notice searches.
//!
//! [`QueryBuilder`] turns a debounced filter string, the session's sort and
//! page size, and an optional pagination cursor into a [`QueryDescription`]:
//! a declarative description of one page read that a store can execute.
//!
//! # Prefix filtering
//!
//! A filter is a half-open range over `title`: `[filter, upper_bound(filter))`.
//! The upper bound is produced by an [`UpperBound`] strategy. Filters the
//! strategy cannot bound correctly are rejected with [`InvalidFilterError`]
//! instead of silently returning the wrong notices.
//!
//! # Backward pages
//!
//! A previous-page read scans in the *reversed* sort order starting after the
//! cursor, which yields the page nearest the cursor first. The delivered page
//! is therefore backwards and must be passed through
//! [`QueryDescription::into_canonical`] before anyone else sees it.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::num::NonZeroU32;
use thiserror::Error;

use notice_types::{Cursor, Notice, SortSpec};

/// Collection notices are read from unless configured otherwise.
pub const DEFAULT_COLLECTION: &str = "notices";

/// Character appended by [`UpperBound::Sentinel`].
///
/// The last code point of the Basic Multilingual Plane's private use area,
/// which sorts after every character that appears in ordinary titles.
pub const SENTINEL: char = '\u{f8ff}';

/// Which page to read relative to a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Items strictly after the cursor.
    Forward,
    /// Items strictly before the cursor.
    Backward,
    /// The first page; any cursor is ignored.
    #[default]
    None,
}

/// Maximum number of notices per page. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(NonZeroU32);

/// Error for a page size of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("page size must be positive")]
pub struct PageSizeError;

impl PageSize {
    /// Page size used when none is configured.
    pub const DEFAULT: Self = match NonZeroU32::new(10) {
        Some(n) => Self(n),
        None => unreachable!(),
    };

    /// Create a page size, rejecting zero.
    pub fn new(size: u32) -> Result<Self, PageSizeError> {
        NonZeroU32::new(size).map(Self).ok_or(PageSizeError)
    }

    /// The page size as a number.
    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strategy for computing the exclusive upper bound of a prefix range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpperBound {
    /// Append [`SENTINEL`]: `"Road"` becomes `["Road", "Road\u{f8ff}")`.
    ///
    /// Filters containing characters at or above the sentinel are rejected,
    /// since titles continuing with such characters would fall outside the
    /// range.
    #[default]
    Sentinel,
    /// Replace the last character with its successor code point:
    /// `"Road"` becomes `["Road", "Roae")`.
    ///
    /// Exact for every title sharing the prefix. Rejects a filter whose last
    /// character has no successor.
    Successor,
}

impl UpperBound {
    /// Compute the title range for `filter`.
    ///
    /// An empty filter has no range: it matches every notice.
    pub fn range(self, filter: &str) -> Result<Option<TitleRange>, InvalidFilterError> {
        if filter.is_empty() {
            return Ok(None);
        }

        let reject = |reason| InvalidFilterError {
            filter: filter.to_string(),
            reason,
        };

        if let Some(c) = filter.chars().find(|c| c.is_control()) {
            return Err(reject(FilterRejection::ControlCharacter(c)));
        }

        let end = match self {
            Self::Sentinel => {
                if let Some(c) = filter.chars().find(|&c| c >= SENTINEL) {
                    return Err(reject(FilterRejection::AboveSentinel(c)));
                }
                let mut end = String::with_capacity(filter.len() + SENTINEL.len_utf8());
                end.push_str(filter);
                end.push(SENTINEL);
                end
            }
            Self::Successor => {
                let mut chars = filter.chars();
                // Non-empty, checked above
                let last = chars.next_back().unwrap_or_default();
                let next = successor(last).ok_or_else(|| reject(FilterRejection::NoSuccessor(last)))?;
                let mut end: String = chars.collect();
                end.push(next);
                end
            }
        };

        Ok(Some(TitleRange {
            start: filter.to_string(),
            end,
        }))
    }
}

/// Next code point after `c`, skipping the surrogate gap.
fn successor(c: char) -> Option<char> {
    match c {
        '\u{d7ff}' => Some('\u{e000}'),
        char::MAX => None,
        _ => char::from_u32(c as u32 + 1),
    }
}

/// Why a filter was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRejection {
    /// The filter contains a control character.
    ControlCharacter(char),
    /// The filter contains a character the sentinel does not sort after.
    AboveSentinel(char),
    /// The filter's last character has no successor code point.
    NoSuccessor(char),
}

impl fmt::Display for FilterRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ControlCharacter(c) => {
                write!(f, "control character U+{:04X} is not searchable", *c as u32)
            }
            Self::AboveSentinel(c) | Self::NoSuccessor(c) => {
                write!(f, "character U+{:04X} cannot be range-bounded", *c as u32)
            }
        }
    }
}

/// A filter string that cannot be turned into a correct title range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid search {filter:?}: {reason}")]
pub struct InvalidFilterError {
    /// The rejected filter.
    pub filter: String,
    /// Why it was rejected.
    pub reason: FilterRejection,
}

/// Half-open range over `title`: `start <= title < end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TitleRange {
    /// Inclusive lower bound (the filter itself).
    pub start: String,
    /// Exclusive upper bound.
    pub end: String,
}

impl TitleRange {
    /// Check whether a title falls inside the range.
    pub fn contains(&self, title: &str) -> bool {
        title >= self.start.as_str() && title < self.end.as_str()
    }
}

/// Declarative description of a single page read.
///
/// Stores execute it as: keep notices whose title is inside
/// [`range`](Self::range), order them by [`order`](Self::order), skip
/// everything up to and including [`start_after`](Self::start_after), and
/// return at most [`limit`](Self::limit) notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescription {
    collection: String,
    range: Option<TitleRange>,
    order: SortSpec,
    canonical: SortSpec,
    limit: u32,
    start_after: Option<Cursor>,
}

impl QueryDescription {
    /// Collection to read from.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Title range, or `None` to match every notice.
    pub fn range(&self) -> Option<&TitleRange> {
        self.range.as_ref()
    }

    /// Scan order. Reversed relative to the session sort for backward reads.
    pub fn order(&self) -> SortSpec {
        self.order
    }

    /// The session sort the delivered page must end up in.
    pub fn canonical_order(&self) -> SortSpec {
        self.canonical
    }

    /// Maximum number of notices to return.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Exclusive scan start, in [`order`](Self::order).
    pub fn start_after(&self) -> Option<&Cursor> {
        self.start_after.as_ref()
    }

    /// Whether this read scans against the session sort.
    pub fn is_reversed(&self) -> bool {
        self.order != self.canonical
    }

    /// Check whether a notice satisfies the filter.
    pub fn matches(&self, notice: &Notice) -> bool {
        self.range
            .as_ref()
            .map_or(true, |range| range.contains(&notice.title))
    }

    /// Check whether a notice lies past the scan start.
    pub fn is_past_start(&self, notice: &Notice) -> bool {
        self.start_after.as_ref().map_or(true, |cursor| {
            self.order.compare_to_cursor(notice, cursor) == Ordering::Greater
        })
    }

    /// Put a page delivered for this query into the session sort.
    ///
    /// Backward reads deliver the page nearest the cursor first; this
    /// restores canonical order. Forward and first-page reads are returned
    /// unchanged.
    pub fn into_canonical(&self, mut page: Vec<Notice>) -> Vec<Notice> {
        if self.is_reversed() {
            page.reverse();
        }
        page
    }
}

impl fmt::Display for QueryDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.collection)?;
        if let Some(range) = &self.range {
            write!(f, " where title in [{:?}, {:?})", range.start, range.end)?;
        }
        write!(f, " order by {}", self.order)?;
        if let Some(cursor) = &self.start_after {
            write!(f, " start after {}", cursor.notice_id())?;
        }
        write!(f, " limit {}", self.limit)
    }
}

/// Builds [`QueryDescription`]s for one session.
///
/// Holds the parts of a query that are fixed for a session (collection,
/// sort, page size, upper-bound strategy); [`build`](Self::build) supplies
/// the parts that change per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBuilder {
    collection: String,
    sort: SortSpec,
    page_size: PageSize,
    upper_bound: UpperBound,
}

impl QueryBuilder {
    /// Create a builder for the given collection, sort and page size.
    pub fn new(collection: impl Into<String>, sort: SortSpec, page_size: PageSize) -> Self {
        Self {
            collection: collection.into(),
            sort,
            page_size,
            upper_bound: UpperBound::default(),
        }
    }

    /// Use a different upper-bound strategy.
    pub fn with_upper_bound(mut self, upper_bound: UpperBound) -> Self {
        self.upper_bound = upper_bound;
        self
    }

    /// The session sort.
    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    /// The session page size.
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Build the query for one page.
    ///
    /// - no cursor, or [`Direction::None`]: the first page for `filter`
    /// - [`Direction::Forward`]: the page strictly after `cursor`
    /// - [`Direction::Backward`]: the page strictly before `cursor`, as a
    ///   reversed scan (see [`QueryDescription::into_canonical`])
    pub fn build(
        &self,
        filter: &str,
        cursor: Option<&Cursor>,
        direction: Direction,
    ) -> Result<QueryDescription, InvalidFilterError> {
        let range = self.upper_bound.range(filter)?;

        let (order, start_after) = match (cursor, direction) {
            (Some(cursor), Direction::Forward) => (self.sort, Some(cursor.clone())),
            (Some(cursor), Direction::Backward) => (self.sort.reversed(), Some(cursor.clone())),
            (_, _) => (self.sort, None),
        };

        Ok(QueryDescription {
            collection: self.collection.clone(),
            range,
            order,
            canonical: self.sort,
            limit: self.page_size.get(),
            start_after,
        })
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTION, SortSpec::default(), PageSize::default())
    }
}
