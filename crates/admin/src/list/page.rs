//! Page-window arithmetic.

use std::num::NonZeroUsize;
use std::ops::Range;

/// Rows per page on every list screen.
pub const PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(size) => size,
    None => panic!("page size must be non-zero"),
};

/// Number of pages needed for `len` rows; never less than one.
#[must_use]
pub const fn total_pages(len: usize, page_size: NonZeroUsize) -> usize {
    let pages = len.div_ceil(page_size.get());
    if pages == 0 { 1 } else { pages }
}

/// The slice of a filtered collection shown on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number, already clamped.
    pub page: usize,
    /// Total pages for the collection.
    pub total_pages: usize,
    /// Index of the first row on the page.
    pub start: usize,
    /// One past the index of the last row on the page.
    pub end: usize,
}

impl PageWindow {
    /// Window for `requested` over `len` rows, clamped into `[1, total_pages]`.
    #[must_use]
    pub fn new(len: usize, page_size: NonZeroUsize, requested: usize) -> Self {
        let total_pages = total_pages(len, page_size);
        let page = requested.clamp(1, total_pages);
        let start = ((page - 1) * page_size.get()).min(len);
        let end = (start + page_size.get()).min(len);
        Self {
            page,
            total_pages,
            start,
            end,
        }
    }

    /// Index range of the rows on the page.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether the page has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap_or(PAGE_SIZE)
    }

    #[test]
    fn test_total_pages_minimum_one() {
        assert_eq!(total_pages(0, PAGE_SIZE), 1);
        assert_eq!(total_pages(1, PAGE_SIZE), 1);
        assert_eq!(total_pages(10, PAGE_SIZE), 1);
        assert_eq!(total_pages(11, PAGE_SIZE), 2);
        assert_eq!(total_pages(25, PAGE_SIZE), 3);
    }

    #[test]
    fn test_window_clamps_requested_page() {
        let window = PageWindow::new(25, PAGE_SIZE, 4);
        assert_eq!(window.page, 3);
        assert_eq!(window.range(), 20..25);
        assert_eq!(window.range().len(), 5);

        let window = PageWindow::new(25, PAGE_SIZE, 0);
        assert_eq!(window.page, 1);
        assert_eq!(window.range(), 0..10);
    }

    #[test]
    fn test_window_on_empty_collection() {
        let window = PageWindow::new(0, PAGE_SIZE, 7);
        assert_eq!(window.page, 1);
        assert_eq!(window.total_pages, 1);
        assert!(window.is_empty());
    }

    #[test]
    fn test_windows_tile_the_collection() {
        for len in 0..=57 {
            for page_size in [1, 3, 10] {
                let page_size = size(page_size);
                let pages = total_pages(len, page_size);
                let mut next = 0;
                for page in 1..=pages {
                    let window = PageWindow::new(len, page_size, page);
                    assert_eq!(window.start, next, "len={len} page={page}");
                    assert!(window.range().len() <= page_size.get());
                    next = window.end;
                }
                assert_eq!(next, len);
            }
        }
    }
}
