//! The notice record.

use serde::{Deserialize, Serialize};

use crate::{NoticeId, Timestamp};

/// A published notice, as stored in the remote collection.
///
/// Documents use camelCase field names (`publicationDate`), which is what
/// the serde representation follows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    /// Document id.
    pub id: NoticeId,
    /// Title, the field prefix search filters on.
    pub title: String,
    /// Publication instant, the field results are sorted by.
    pub publication_date: Timestamp,
}

impl Notice {
    /// Create a new notice.
    pub fn new(id: impl Into<String>, title: impl Into<String>, publication_date: Timestamp) -> Self {
        Self {
            id: NoticeId::new(id),
            title: title.into(),
            publication_date,
        }
    }

    /// The sort key of this notice: `(publication date, id)`.
    ///
    /// The id breaks ties between notices published at the same instant so
    /// that the order is total.
    pub fn sort_key(&self) -> (Timestamp, &NoticeId) {
        (self.publication_date, &self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_document() {
        let json = r#"{"id":"n-1","title":"Road Closure","publicationDate":1705276800}"#;
        let notice: Notice = serde_json::from_str(json).unwrap();

        assert_eq!(notice.id.as_str(), "n-1");
        assert_eq!(notice.title, "Road Closure");
        assert_eq!(notice.publication_date, Timestamp::from_secs(1_705_276_800));
    }

    #[test]
    fn serializes_publication_date_as_camel_case() {
        let notice = Notice::new("n-2", "Bridge Notice", Timestamp::from_secs(7));
        let json = serde_json::to_string(&notice).unwrap();
        assert!(json.contains("\"publicationDate\":7"), "got {}", json);
    }

    #[test]
    fn sort_key_breaks_ties_by_id() {
        let a = Notice::new("a", "x", Timestamp::from_secs(10));
        let b = Notice::new("b", "y", Timestamp::from_secs(10));
        assert!(a.sort_key() < b.sort_key());
    }
}
