//! Page-number pagination.
//!
//! Page lookups are lenient: a missing or non-numeric page yields the first
//! page, a number past either end yields the last page, and an empty result
//! set still has a single empty page.

use serde::Serialize;

/// Posts shown per listing page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A requested page, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(number: u64, per_page: u64) -> Self {
        Self {
            number: number.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn first(per_page: u64) -> Self {
        Self::new(1, per_page)
    }

    /// Parse the raw `page` query value. `"last"` and numbers below 1 request
    /// the final page.
    pub fn from_query(raw: Option<&str>, per_page: u64) -> Self {
        let number = match raw.map(str::trim) {
            Some("last") => u64::MAX,
            Some(value) => match value.parse::<i64>() {
                Ok(n) if n < 1 => u64::MAX,
                Ok(n) => n as u64,
                Err(_) => 1,
            },
            None => 1,
        };
        Self::new(number, per_page)
    }

    /// Clamp the page number against `count` total items.
    pub fn resolve(self, count: u64) -> Self {
        let last = num_pages(count, self.per_page);
        Self {
            number: self.number.min(last),
            per_page: self.per_page,
        }
    }

    /// Number of items preceding this page.
    pub fn offset(&self) -> u64 {
        self.number.saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// Number of pages needed for `count` items; never zero.
pub fn num_pages(count: u64, per_page: u64) -> u64 {
    count.div_ceil(per_page.max(1)).max(1)
}

/// One page of results plus the metadata needed to navigate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub per_page: u64,
    pub count: u64,
    pub num_pages: u64,
}

impl<T> Page<T> {
    /// Build a page from an already-resolved request.
    pub fn new(items: Vec<T>, request: PageRequest, count: u64) -> Self {
        Self {
            items,
            number: request.number,
            per_page: request.per_page,
            count,
            num_pages: num_pages(count, request.per_page),
        }
    }

    /// Slice a fully loaded, already ordered result set.
    pub fn from_vec(all: Vec<T>, request: PageRequest) -> Self {
        let count = all.len() as u64;
        let request = request.resolve(count);
        let items = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.per_page as usize)
            .collect();
        Self::new(items, request, count)
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            per_page: self.per_page,
            count: self.count,
            num_pages: self.num_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_is_lenient() {
        assert_eq!(PageRequest::from_query(None, 10).number, 1);
        assert_eq!(PageRequest::from_query(Some("abc"), 10).number, 1);
        assert_eq!(PageRequest::from_query(Some(" 3 "), 10).number, 3);
        assert_eq!(PageRequest::from_query(Some("last"), 10).number, u64::MAX);
    }

    #[test]
    fn test_page_below_one_resolves_to_last_page() {
        assert_eq!(PageRequest::from_query(Some("0"), 10).resolve(25).number, 3);
        assert_eq!(PageRequest::from_query(Some("-1"), 10).resolve(25).number, 3);
        assert_eq!(PageRequest::from_query(Some("1.5"), 10).resolve(25).number, 1);
    }

    #[test]
    fn test_page_past_end_resolves_to_last_page() {
        let request = PageRequest::new(99, 10).resolve(25);
        assert_eq!(request.number, 3);
        assert_eq!(request.offset(), 20);
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let page: Page<u32> = Page::from_vec(Vec::new(), PageRequest::new(4, 10));
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_from_vec_slices_requested_page() {
        let page = Page::from_vec((1..=23).collect::<Vec<u32>>(), PageRequest::new(2, 10));
        assert_eq!(page.items, (11..=20).collect::<Vec<u32>>());
        assert_eq!(page.count, 23);
        assert_eq!(page.num_pages, 3);
        assert!(page.has_next());
        assert!(page.has_previous());

        let last = Page::from_vec((1..=23).collect::<Vec<u32>>(), PageRequest::new(3, 10));
        assert_eq!(last.items, vec![21, 22, 23]);
        assert!(!last.has_next());
    }
}
