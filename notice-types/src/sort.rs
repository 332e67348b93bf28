//! Sort specification for notice queries.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::{Cursor, Notice, NoticeId, Timestamp};

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Oldest first.
    Ascending,
    /// Newest first.
    #[default]
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Field a query is ordered by.
///
/// Only the publication date is sortable today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    /// `publicationDate`
    #[default]
    PublicationDate,
}

impl SortField {
    /// Field name as stored in the collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PublicationDate => "publicationDate",
        }
    }
}

/// A single-key sort, fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct SortSpec {
    /// Field to order by.
    pub field: SortField,
    /// Direction of the order.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Sort by publication date in the given direction.
    pub fn by_publication_date(direction: SortDirection) -> Self {
        Self {
            field: SortField::PublicationDate,
            direction,
        }
    }

    /// The same field, in the opposite direction.
    pub fn reversed(self) -> Self {
        Self {
            field: self.field,
            direction: self.direction.reversed(),
        }
    }

    /// Compare two notices under this sort.
    pub fn compare(&self, a: &Notice, b: &Notice) -> Ordering {
        self.compare_keys(a.sort_key(), b.sort_key())
    }

    /// Compare a notice against a cursor under this sort.
    ///
    /// `Ordering::Greater` means the notice comes strictly after the cursor.
    pub fn compare_to_cursor(&self, notice: &Notice, cursor: &Cursor) -> Ordering {
        self.compare_keys(notice.sort_key(), cursor.sort_key())
    }

    fn compare_keys(&self, a: (Timestamp, &NoticeId), b: (Timestamp, &NoticeId)) -> Ordering {
        let ordering = match self.field {
            SortField::PublicationDate => a.cmp(&b),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        write!(f, "{} {}", self.field.as_str(), direction)
    }
}
