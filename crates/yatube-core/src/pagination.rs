//! Fixed-size page slicing for newest-first listings.

use serde::Serialize;

/// Default number of entries per page.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Splits listings into pages of `per_page` entries.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: u64,
}

/// A resolved page: which page is served and which rows it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub offset: u64,
    pub limit: u64,
}

impl Paginator {
    pub fn new(per_page: u64) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Resolve a requested page number against `total` rows.
    ///
    /// Missing or out-of-range numbers clamp to the first or last page. An
    /// empty listing still has one (empty) page.
    pub fn resolve(&self, requested: Option<i64>, total: u64) -> PageWindow {
        let num_pages = total.div_ceil(self.per_page).max(1);
        let number = match requested {
            None => 1,
            Some(n) if n < 1 => 1,
            Some(n) => (n as u64).min(num_pages),
        };

        PageWindow {
            number,
            num_pages,
            offset: (number - 1) * self.per_page,
            limit: self.per_page,
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// A bounded slice of an ordered listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(window: PageWindow, items: Vec<T>, total: u64) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            total,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_number(&self) -> Option<u64> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn previous_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.number - 1)
    }

    /// Replace the items, keeping the page position.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_listing_has_one_page() {
        let window = Paginator::new(10).resolve(Some(3), 0);
        assert_eq!(window.number, 1);
        assert_eq!(window.num_pages, 1);
        assert_eq!(window.offset, 0);
    }

    #[test]
    fn sixteen_rows_make_two_pages() {
        let paginator = Paginator::new(10);
        let first = paginator.resolve(Some(1), 16);
        let second = paginator.resolve(Some(2), 16);

        assert_eq!(first.num_pages, 2);
        assert_eq!((first.offset, first.limit), (0, 10));
        assert_eq!((second.offset, second.limit), (10, 10));
    }

    #[test]
    fn out_of_range_numbers_clamp() {
        let paginator = Paginator::new(10);
        assert_eq!(paginator.resolve(Some(99), 25).number, 3);
        assert_eq!(paginator.resolve(Some(0), 25).number, 1);
        assert_eq!(paginator.resolve(Some(-4), 25).number, 1);
        assert_eq!(paginator.resolve(None, 25).number, 1);
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        assert_eq!(Paginator::new(0).per_page(), 1);
    }

    #[test]
    fn page_navigation() {
        let window = Paginator::new(10).resolve(Some(2), 25);
        let page = Page::new(window, vec![1, 2, 3], 25);

        assert_eq!(page.previous_number(), Some(1));
        assert_eq!(page.next_number(), Some(3));
        assert_eq!(page.map(|n| n * 2).items, vec![2, 4, 6]);
    }
}
