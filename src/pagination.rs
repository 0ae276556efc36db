//! Result envelopes shared by the listing API and the query controller.

use serde::{Deserialize, Serialize};

/// Computes the page numbers to render as clickable controls.
///
/// The window holds `min(window_size, total_pages)` entries, is centered on
/// `current_page` where possible and slides inwards at either edge instead of
/// shrinking.
pub fn page_window(current_page: usize, total_pages: usize, window_size: usize) -> Vec<usize> {
    if total_pages == 0 || window_size == 0 {
        return vec![];
    }

    let current_page = current_page.clamp(1, total_pages);
    let half = window_size / 2;

    let mut start = current_page.saturating_sub(half).max(1);
    let end = (start + window_size - 1).min(total_pages);

    if end - start + 1 < window_size {
        start = (end + 1).saturating_sub(window_size).max(1);
    }

    (start..=end).collect()
}

/// Pagination metadata returned alongside every list response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Number of items matching the query across all pages.
    pub total: usize,
    pub current_page: usize,
    /// Always at least one, even for an empty result set.
    pub total_pages: usize,
    pub page_size: usize,
}

impl Pagination {
    pub fn new(total: usize, current_page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            total,
            current_page: current_page.max(1),
            total_pages: total.div_ceil(page_size).max(1),
            page_size,
        }
    }

    /// Page numbers to render around the current page.
    pub fn window(&self, window_size: usize) -> Vec<usize> {
        page_window(self.current_page, self.total_pages, window_size)
    }
}

/// One page of items plus its pagination metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> ResultPage<T> {
    pub fn new(items: Vec<T>, total: usize, current_page: usize, page_size: usize) -> Self {
        Self {
            items,
            pagination: Pagination::new(total, current_page, page_size),
        }
    }

    pub fn empty(page_size: usize) -> Self {
        Self::new(Vec::new(), 0, 1, page_size)
    }

    /// Converts every item while keeping the pagination metadata.
    pub fn map<U, F>(self, f: F) -> ResultPage<U>
    where
        F: FnMut(T) -> U,
    {
        ResultPage {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_pinned_to_the_first_pages() {
        assert_eq!(page_window(1, 20, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(2, 20, 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn window_is_pinned_to_the_last_pages() {
        assert_eq!(page_window(20, 20, 5), vec![16, 17, 18, 19, 20]);
        assert_eq!(page_window(19, 20, 5), vec![16, 17, 18, 19, 20]);
    }

    #[test]
    fn window_is_centered_on_the_current_page() {
        assert_eq!(page_window(10, 20, 5), vec![8, 9, 10, 11, 12]);
        assert_eq!(page_window(10, 20, 7), vec![7, 8, 9, 10, 11, 12, 13]);
    }

    #[test]
    fn window_shrinks_only_when_there_are_fewer_pages() {
        assert_eq!(page_window(2, 3, 5), vec![1, 2, 3]);
        assert_eq!(page_window(1, 1, 5), vec![1]);
        assert!(page_window(1, 0, 5).is_empty());
    }

    #[test]
    fn window_clamps_an_out_of_range_current_page() {
        assert_eq!(page_window(42, 6, 3), vec![4, 5, 6]);
        assert_eq!(page_window(0, 6, 3), vec![1, 2, 3]);
    }

    #[test]
    fn empty_result_has_one_page() {
        let page: ResultPage<u32> = ResultPage::empty(25);
        assert_eq!(page.pagination.total, 0);
        assert_eq!(page.pagination.total_pages, 1);
        assert_eq!(page.pagination.current_page, 1);
    }

    #[test]
    fn pagination_rounds_total_pages_up() {
        let pagination = Pagination::new(51, 2, 25);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.window(5), vec![1, 2, 3]);
    }

    #[test]
    fn pagination_serializes_in_camel_case() {
        let page = ResultPage::new(vec!["a"], 1, 1, 10);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pagination"]["currentPage"], 1);
        assert_eq!(json["pagination"]["totalPages"], 1);
        assert_eq!(json["pagination"]["pageSize"], 10);
        assert_eq!(json["items"][0], "a");
    }
}
