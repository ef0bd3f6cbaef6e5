use serde::Deserialize;

use super::{
    filters::ListFilters, pagination::PageRequest, sorting::SortKey,
    sorting::SortSpec, validation::ValidationErrors,
};

/// Listing parameters as decoded from a request, before any checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    pub text: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort: Option<String>,
}

impl ListParams {
    /// Check every parameter and report all problems at once.
    pub fn validate<K: SortKey>(
        self,
    ) -> Result<ListRequest<K>, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let page = PageRequest::new(
            self.page.unwrap_or(i64::from(PageRequest::DEFAULT_PAGE)),
            self.page_size
                .unwrap_or(i64::from(PageRequest::DEFAULT_PAGE_SIZE)),
        )
        .map_err(|e| errors.merge(e))
        .ok();

        let sort = match self.sort.as_deref() {
            None => Some(SortSpec::default()),
            Some(raw) => SortSpec::parse(raw).map_err(|e| errors.merge(e)).ok(),
        };

        match (page, sort) {
            (Some(page), Some(sort)) if errors.is_empty() => Ok(ListRequest {
                filters: ListFilters::new(
                    self.text.unwrap_or_default(),
                    self.tags,
                ),
                sort,
                page,
            }),
            _ => Err(errors),
        }
    }
}

/// A listing request that has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest<K> {
    pub filters: ListFilters,
    pub sort: SortSpec<K>,
    pub page: PageRequest,
}

impl<K: SortKey> ListRequest<K> {
    pub fn new(filters: ListFilters, sort: SortSpec<K>, page: PageRequest) -> Self {
        Self { filters, sort, page }
    }
}

impl<K: SortKey> Default for ListRequest<K> {
    fn default() -> Self {
        Self {
            filters: ListFilters::default(),
            sort: SortSpec::default(),
            page: PageRequest::default(),
        }
    }
}
