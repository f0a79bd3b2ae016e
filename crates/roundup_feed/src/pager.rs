/// Fixed page size for the flat view.
pub const PAGE_SIZE: usize = 12;

/// 1-based pagination cursor with the server-reported total count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
    total: u64,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size,
            total: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        (self.total as usize).div_ceil(self.page_size).max(1)
    }

    pub fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    /// Request a page. Values outside `[1, total_pages]` are ignored;
    /// returns whether the cursor moved.
    pub fn set_page(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() {
            return false;
        }
        self.page = page;
        true
    }

    pub fn set_total(&mut self, total: u64) {
        self.total = total;
        if self.page > self.total_pages() {
            self.page = self.total_pages();
        }
    }

    /// Back to page 1. Invoked on every filter or locale change.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}
