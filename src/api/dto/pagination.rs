//! Page-based pagination for list endpoints.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PAGE_SIZE: u32 = 25;
const PAGE_SIZE_RANGE: std::ops::RangeInclusive<u32> = 10..=1000;

/// Raw `page` / `page_size` query parameters.
///
/// Query strings carry numbers as text, hence `DisplayFromStr`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub page_size: u32,
}

impl PageWindow {
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl PaginationParams {
    /// Applies defaults (page 1, 25 items) and bounds checks.
    ///
    /// # Errors
    ///
    /// Returns a message if `page` is 0 or `page_size` is outside 10..=1000.
    pub fn resolve(&self) -> Result<PageWindow, String> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page == 0 {
            return Err("Page must be greater than 0".to_string());
        }
        if !PAGE_SIZE_RANGE.contains(&page_size) {
            return Err(format!(
                "Page size must be between {} and {}",
                PAGE_SIZE_RANGE.start(),
                PAGE_SIZE_RANGE.end()
            ));
        }

        Ok(PageWindow { page, page_size })
    }
}

/// Pagination block of a list response.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
}

impl PaginationMeta {
    pub fn new(window: PageWindow, total: i64) -> Self {
        Self {
            page: window.page,
            page_size: window.page_size,
            total,
        }
    }
}
