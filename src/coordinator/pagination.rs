use serde::Serialize;

use crate::error::DashboardError;

/// Largest page the backend serves.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Trip-table paging. `page` stays within `[1, total_pages]` (1 when there
/// are no pages) after every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    page: u32,
    page_size: u32,
    total_records: u64,
    total_pages: u32,
}

impl PaginationState {
    pub fn new(page_size: u32) -> Result<Self, DashboardError> {
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(DashboardError::InvalidPageSize {
                got: page_size,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(Self {
            page: 1,
            page_size,
            total_records: 0,
            total_pages: 0,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Back to page 1 with no known totals. Page changes are refused until
    /// the next [`update_totals`](Self::update_totals).
    pub fn reset(&mut self) {
        self.page = 1;
        self.total_records = 0;
        self.total_pages = 0;
    }

    /// Whether `page` names an existing page.
    pub fn accepts(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages
    }

    /// Moves to `page` if it exists. Returns `false` and leaves state alone otherwise.
    pub fn set_page(&mut self, page: u32) -> bool {
        if !self.accepts(page) {
            return false;
        }
        self.page = page;
        true
    }

    /// Records a new total from the backend and re-clamps the current page.
    pub fn update_totals(&mut self, total_records: u64) {
        let pages = total_records.div_ceil(u64::from(self.page_size));
        self.total_records = total_records;
        self.total_pages = u32::try_from(pages).unwrap_or(u32::MAX);
        self.page = self.clamp(self.page);
    }

    /// Points back at a page already on screen, clamped to the known totals.
    pub(crate) fn restore(&mut self, page: u32) {
        self.page = self.clamp(page);
    }

    fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages.max(1))
    }
}
