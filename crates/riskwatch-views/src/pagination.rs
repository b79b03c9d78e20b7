//! Page slicing over a filtered collection.

use serde::Serialize;

use crate::filter::ItemFilter;

/// Rows per page in every paginated list.
pub const PAGE_SIZE: usize = 20;

/// Number of pages needed for `total` items, `ceil(total / size)`.
#[must_use]
pub const fn page_count(total: usize, size: usize) -> usize {
    if size == 0 { 0 } else { total.div_ceil(size) }
}

/// Position of the current page within the filtered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBounds {
    /// Current page, 1-based.
    pub page: usize,
    /// Total pages; zero when the filtered collection is empty.
    pub page_count: usize,
    /// 1-based index of the first row shown, or 0 when nothing is shown.
    pub start: usize,
    /// 1-based index of the last row shown.
    pub end: usize,
    /// Filtered collection size.
    pub total: usize,
}

impl PageBounds {
    /// Bounds of `page` (clamped) in a collection of `total` items.
    #[must_use]
    pub fn compute(page: usize, total: usize, size: usize) -> Self {
        let pages = page_count(total, size);
        let page = page.clamp(1, pages.max(1));
        let offset = (page - 1) * size;
        let end = (offset + size).min(total);
        Self {
            page,
            page_count: pages,
            start: if end > offset { offset + 1 } else { 0 },
            end,
            total,
        }
    }

    /// `true` when a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    /// `true` when an earlier page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// `Showing X to Y of Z` footer text.
    #[must_use]
    pub fn showing(&self) -> String {
        format!("Showing {} to {} of {}", self.start, self.end, self.total)
    }
}

/// Filtered, paginated view over a source collection.
///
/// The current page returns to 1 whenever the source or the filter changes.
#[derive(Debug, Clone)]
pub struct ListView<T, F> {
    source: Vec<T>,
    filter: F,
    page: usize,
    page_size: usize,
}

impl<T, F: Default> Default for ListView<T, F> {
    fn default() -> Self {
        Self::new(Vec::new(), F::default())
    }
}

impl<T, F> ListView<T, F> {
    /// View over `source` with `filter`, positioned on page 1.
    #[must_use]
    pub const fn new(source: Vec<T>, filter: F) -> Self {
        Self {
            source,
            filter,
            page: 1,
            page_size: PAGE_SIZE,
        }
    }

    /// Override the page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = if page_size == 0 { PAGE_SIZE } else { page_size };
        self
    }

    /// Unfiltered source collection.
    #[must_use]
    pub fn source(&self) -> &[T] {
        &self.source
    }

    /// Mutable access to source rows for local edits that keep the page.
    pub fn source_mut(&mut self) -> &mut Vec<T> {
        &mut self.source
    }

    /// Active filter.
    #[must_use]
    pub const fn filter(&self) -> &F {
        &self.filter
    }

    /// Replace the source collection and return to page 1.
    pub fn set_source(&mut self, source: Vec<T>) {
        self.source = source;
        self.page = 1;
    }

    /// Requested page, before clamping against the filtered size.
    #[must_use]
    pub const fn requested_page(&self) -> usize {
        self.page
    }
}

impl<T, F: ItemFilter<T> + PartialEq> ListView<T, F> {
    /// Replace the filter; the page resets to 1 when the filter differs.
    pub fn set_filter(&mut self, filter: F) {
        if filter != self.filter {
            self.filter = filter;
            self.page = 1;
        }
    }

    /// Edit the filter in place; the page resets to 1 when it changed.
    pub fn update_filter(&mut self, edit: impl FnOnce(&mut F))
    where
        F: Clone,
    {
        let mut next = self.filter.clone();
        edit(&mut next);
        self.set_filter(next);
    }
}

impl<T, F: ItemFilter<T>> ListView<T, F> {
    /// Rows passing the filter, in source order.
    #[must_use]
    pub fn filtered(&self) -> Vec<&T> {
        self.filter.apply(&self.source)
    }

    /// Current page bounds over the filtered rows.
    #[must_use]
    pub fn bounds(&self) -> PageBounds {
        PageBounds::compute(self.page, self.filtered().len(), self.page_size)
    }

    /// Move to `page`, clamped into `[1, max(1, page_count)]`.
    pub fn goto(&mut self, page: usize) -> PageBounds {
        let bounds = PageBounds::compute(page, self.filtered().len(), self.page_size);
        self.page = bounds.page;
        bounds
    }

    /// Advance one page if possible.
    pub fn next(&mut self) -> PageBounds {
        self.goto(self.page.saturating_add(1))
    }

    /// Step back one page if possible.
    pub fn prev(&mut self) -> PageBounds {
        self.goto(self.page.saturating_sub(1))
    }

    /// Rows on the current page.
    #[must_use]
    pub fn page_items(&self) -> Vec<&T> {
        let bounds = self.bounds();
        let filtered = self.filtered();
        if bounds.start == 0 {
            return Vec::new();
        }
        filtered[bounds.start - 1..bounds.end].to_vec()
    }
}
