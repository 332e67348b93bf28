//! Page boundary tracking for cursor pagination.
//!
//! After every successful fetch the boundaries of the delivered page are
//! recorded as two cursors: the first and last visible notice. Next/previous
//! navigation is always relative to the *current* page, so the tracker never
//! accumulates history: memory stays constant however many pages are visited,
//! at the cost of not supporting "jump to page N".

use notice_types::{Cursor, Notice};

/// Boundaries of the current page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageBounds {
    /// No fetch has succeeded yet.
    #[default]
    NotLoaded,
    /// The last successful fetch returned no notices ("no further results").
    Empty,
    /// The last successful fetch returned at least one notice.
    Page {
        /// First notice of the page, in delivered order.
        first: Cursor,
        /// Last notice of the page, in delivered order.
        last: Cursor,
    },
}

/// Tracks the first and last visible notice of the current page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaginationCursor {
    bounds: PageBounds,
}

impl PaginationCursor {
    /// Create a tracker with nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the boundaries with those of a newly delivered page.
    ///
    /// The page must already be in canonical order (backward reads corrected).
    /// Previous boundaries are discarded, never merged.
    pub fn update(&mut self, page: &[Notice]) -> &PageBounds {
        self.bounds = match (page.first(), page.last()) {
            (Some(first), Some(last)) => PageBounds::Page {
                first: Cursor::at(first),
                last: Cursor::at(last),
            },
            _ => PageBounds::Empty,
        };
        &self.bounds
    }

    /// Current boundaries.
    pub fn bounds(&self) -> &PageBounds {
        &self.bounds
    }

    /// Cursor at the first notice of the current page.
    pub fn first_visible(&self) -> Option<&Cursor> {
        match &self.bounds {
            PageBounds::Page { first, .. } => Some(first),
            _ => None,
        }
    }

    /// Cursor at the last notice of the current page.
    pub fn last_visible(&self) -> Option<&Cursor> {
        match &self.bounds {
            PageBounds::Page { last, .. } => Some(last),
            _ => None,
        }
    }

    /// Check whether any fetch has succeeded.
    pub fn is_loaded(&self) -> bool {
        !matches!(self.bounds, PageBounds::NotLoaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notice_types::Timestamp;

    fn page(ids: &[&str]) -> Vec<Notice> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| Notice::new(*id, format!("Notice {}", id), Timestamp::from_secs(i as u64)))
            .collect()
    }

    #[test]
    fn starts_not_loaded() {
        let tracker = PaginationCursor::new();
        assert_eq!(tracker.bounds(), &PageBounds::NotLoaded);
        assert!(!tracker.is_loaded());
        assert_eq!(tracker.first_visible(), None);
        assert_eq!(tracker.last_visible(), None);
    }

    #[test]
    fn non_empty_page_records_first_and_last() {
        let mut tracker = PaginationCursor::new();
        let notices = page(&["a", "b", "c"]);

        tracker.update(&notices);

        assert_eq!(tracker.first_visible(), Some(&Cursor::at(&notices[0])));
        assert_eq!(tracker.last_visible(), Some(&Cursor::at(&notices[2])));
    }

    #[test]
    fn single_item_page_has_same_first_and_last() {
        let mut tracker = PaginationCursor::new();
        let notices = page(&["only"]);

        tracker.update(&notices);

        assert_eq!(tracker.first_visible(), tracker.last_visible());
        assert!(tracker.first_visible().unwrap().points_at(&notices[0]));
    }

    #[test]
    fn empty_page_clears_both_and_differs_from_not_loaded() {
        let mut tracker = PaginationCursor::new();
        tracker.update(&page(&["a", "b"]));

        let bounds = tracker.update(&[]);

        assert_eq!(bounds, &PageBounds::Empty);
        assert!(tracker.is_loaded());
        assert_eq!(tracker.first_visible(), None);
        assert_eq!(tracker.last_visible(), None);
    }

    #[test]
    fn cursors_are_replaced_not_merged() {
        let mut tracker = PaginationCursor::new();
        let first_page = page(&["a", "b"]);
        let second_page = page(&["c", "d"]);

        tracker.update(&first_page);
        tracker.update(&second_page);

        assert!(tracker.first_visible().unwrap().points_at(&second_page[0]));
        assert!(tracker.last_visible().unwrap().points_at(&second_page[1]));
    }

    #[test]
    fn boundaries_follow_many_page_shapes() {
        // Every page size from empty to 20 produces first/last of that page
        for len in 0..=20 {
            let ids: Vec<String> = (0..len).map(|i| format!("n-{}", i)).collect();
            let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
            let notices = page(&id_refs);

            let mut tracker = PaginationCursor::new();
            tracker.update(&notices);

            match (notices.first(), notices.last()) {
                (Some(first), Some(last)) => {
                    assert!(tracker.first_visible().unwrap().points_at(first));
                    assert!(tracker.last_visible().unwrap().points_at(last));
                }
                _ => assert_eq!(tracker.bounds(), &PageBounds::Empty),
            }
        }
    }
}
