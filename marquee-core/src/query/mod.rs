//! Filtered, sorted and paginated listing.
//!
//! Caller input enters as [`ListParams`] and is validated into a
//! [`ListRequest`]; only a validated request can reach [`ListQuery`], so an
//! unknown sort field or an out-of-range page never produces SQL.

pub mod builder;
pub mod filters;
pub mod pagination;
pub mod request;
pub mod sorting;
pub mod validation;

pub use builder::{DirectorListing, ListQuery, Listing, MovieListing};
pub use filters::ListFilters;
pub use pagination::{Page, PageMetadata, PageRequest};
pub use request::{ListParams, ListRequest};
pub use sorting::{DirectorSort, MovieSort, SortKey, SortOrder, SortSpec};
pub use validation::ValidationErrors;
