use serde::Serialize;

use super::validation::ValidationErrors;

/// Validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_PAGE_SIZE: u32 = 20;
    pub const MAX_PAGE: u32 = 10_000_000;
    pub const MAX_PAGE_SIZE: u32 = 100;

    pub fn new(page: i64, page_size: i64) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(page > 0, "page", "must be greater than zero");
        errors.check(
            page <= i64::from(Self::MAX_PAGE),
            "page",
            "must be a maximum of 10 million",
        );
        errors.check(page_size > 0, "page_size", "must be greater than zero");
        errors.check(
            page_size <= i64::from(Self::MAX_PAGE_SIZE),
            "page_size",
            "must be a maximum of 100",
        );

        errors.into_result(Self {
            page: page as u32,
            page_size: page_size as u32,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// Pagination facts reported alongside a page of records.
///
/// All fields are zero when nothing matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub current_page: u32,
    pub page_size: u32,
    pub first_page: u32,
    pub last_page: u32,
    pub total_records: i64,
}

impl PageMetadata {
    pub fn calculate(total_records: i64, page: PageRequest) -> Self {
        if total_records <= 0 {
            return Self::default();
        }

        let size = i64::from(page.page_size());
        let last_page = (total_records + size - 1) / size;

        Self {
            current_page: page.page(),
            page_size: page.page_size(),
            first_page: 1,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
            total_records,
        }
    }
}

/// One page of records and the metadata describing where it sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub metadata: PageMetadata,
}

impl<T> Page<T> {
    pub fn new(records: Vec<T>, total_records: i64, page: PageRequest) -> Self {
        Self {
            records,
            metadata: PageMetadata::calculate(total_records, page),
        }
    }

    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            metadata: PageMetadata::default(),
        }
    }
}
