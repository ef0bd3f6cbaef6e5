//! Query-string decoding for the list endpoints.
//!
//! Everything arrives as optional text so that a malformed number becomes a
//! field error in the 422 body instead of an extractor rejection.

use marquee_core::query::{ListParams, ListRequest, SortKey, ValidationErrors};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct MovieListQuery {
    pub title: Option<String>,
    /// Comma separated; every genre must be present.
    pub genres: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DirectorListQuery {
    pub name: Option<String>,
    /// Comma separated; every award must be present.
    pub awards: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sort: Option<String>,
}

impl MovieListQuery {
    pub fn into_request<K: SortKey>(self) -> Result<ListRequest<K>, ValidationErrors> {
        decode(self.title, self.genres, self.page, self.page_size, self.sort)
    }
}

impl DirectorListQuery {
    pub fn into_request<K: SortKey>(self) -> Result<ListRequest<K>, ValidationErrors> {
        decode(self.name, self.awards, self.page, self.page_size, self.sort)
    }
}

fn decode<K: SortKey>(
    text: Option<String>,
    tags: Option<String>,
    page: Option<String>,
    page_size: Option<String>,
    sort: Option<String>,
) -> Result<ListRequest<K>, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let page = read_int(&mut errors, "page", non_blank(page));
    let page_size = read_int(&mut errors, "page_size", non_blank(page_size));

    let params = ListParams {
        text,
        tags: tags.as_deref().map(read_csv).unwrap_or_default(),
        page,
        page_size,
        sort: non_blank(sort),
    };

    match params.validate::<K>() {
        Ok(request) if errors.is_empty() => Ok(request),
        Ok(_) => Err(errors),
        Err(more) => {
            errors.merge(more);
            Err(errors)
        }
    }
}

/// A blank value counts as absent so the default applies.
fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

fn read_int(
    errors: &mut ValidationErrors,
    field: &str,
    raw: Option<String>,
) -> Option<i64> {
    let raw = raw?;
    match raw.trim().parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, "must be an integer value");
            None
        }
    }
}

fn read_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
