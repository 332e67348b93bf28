//! Identity and ordering types for noticeboard.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Notice;

/// A unique, stable identifier for a notice.
///
/// Assigned by the remote store (the document id).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoticeId(String);

impl NoticeId {
    /// Create a NoticeId from a document id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NoticeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for NoticeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for NoticeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NoticeId({})", self.0)
    }
}

/// Publication instant of a notice, in seconds since the Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a Timestamp from Unix seconds.
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the Unix seconds of this Timestamp.
    pub fn as_secs(&self) -> u64 {
        self.0
    }
}

/// Renders as a calendar date, e.g. `Mon Jan 15 2024`.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = i64::try_from(self.0)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
        match date {
            Some(date) => write!(f, "{}", date.format("%a %b %d %Y")),
            None => write!(f, "@{}", self.0),
        }
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// An opaque pagination boundary referencing a specific returned notice.
///
/// A cursor can only be captured from a [`Notice`] the store actually
/// delivered, so it never points between records. It carries the notice's
/// sort key, which is what a store needs to resume a scan after (or before)
/// that notice.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    notice_id: NoticeId,
    publication_date: Timestamp,
}

impl Cursor {
    /// Capture a cursor at the given notice.
    pub fn at(notice: &Notice) -> Self {
        Self {
            notice_id: notice.id.clone(),
            publication_date: notice.publication_date,
        }
    }

    /// The id of the notice this cursor references.
    pub fn notice_id(&self) -> &NoticeId {
        &self.notice_id
    }

    /// The sort key of the referenced notice: `(publication date, id)`.
    pub fn sort_key(&self) -> (Timestamp, &NoticeId) {
        (self.publication_date, &self.notice_id)
    }

    /// Check whether this cursor references the given notice.
    pub fn points_at(&self, notice: &Notice) -> bool {
        self.notice_id == notice.id
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cursor({}@{})", self.notice_id, self.publication_date.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_id_display_is_raw_id() {
        let id = NoticeId::new("n-042");
        assert_eq!(id.to_string(), "n-042");
        assert_eq!(format!("{:?}", id), "NoticeId(n-042)");
    }

    #[test]
    fn timestamp_ordering() {
        let t1 = Timestamp::from_secs(100);
        let t2 = Timestamp::from_secs(200);
        assert!(t1 < t2);
        assert_eq!(t2.as_secs(), 200);
    }

    #[test]
    fn timestamp_displays_as_date() {
        // 2024-01-15T00:00:00Z
        let t = Timestamp::from_secs(1_705_276_800);
        assert_eq!(t.to_string(), "Mon Jan 15 2024");
    }

    #[test]
    fn timestamp_out_of_range_displays_raw() {
        let t = Timestamp::from_secs(u64::MAX);
        assert_eq!(t.to_string(), format!("@{}", u64::MAX));
    }

    #[test]
    fn cursor_captures_sort_key() {
        let notice = Notice::new("n-1", "Road Closure", Timestamp::from_secs(500));
        let cursor = Cursor::at(&notice);

        assert_eq!(cursor.notice_id().as_str(), "n-1");
        assert_eq!(
            cursor.sort_key(),
            (Timestamp::from_secs(500), &NoticeId::new("n-1"))
        );
        assert!(cursor.points_at(&notice));
    }

    #[test]
    fn cursor_does_not_point_at_other_notice() {
        let a = Notice::new("a", "Road Closure", Timestamp::from_secs(500));
        let b = Notice::new("b", "Road Closure", Timestamp::from_secs(500));
        assert!(!Cursor::at(&a).points_at(&b));
    }
}
