//! SQL construction for listings.
//!
//! Everything the caller supplied is bound with `push_bind`. The only text
//! pushed into the statement comes from [`Listing`] constants and from
//! [`SortKey::column`], both of which are fixed at compile time.

use std::marker::PhantomData;

use sqlx::{Postgres, QueryBuilder};

use super::{request::ListRequest, sorting::DirectorSort, sorting::MovieSort, sorting::SortKey};

/// Text search configuration shared by the predicate and the GIN indexes.
const TEXT_SEARCH_CONFIG: &str = "'simple'";

/// Tie-breaker appended after the requested ordering.
const TIE_BREAK: &str = "id ASC";

/// Table-level facts a listing needs. Implemented by zero-sized markers.
pub trait Listing: Send + Sync + 'static {
    type Sort: SortKey;

    const TABLE: &'static str;

    /// Selected columns, in the order the row type expects them.
    const COLUMNS: &'static str;

    /// Column matched by the free-text term.
    const TEXT_COLUMN: &'static str;

    /// Array column matched by tag containment.
    const TAG_COLUMN: &'static str;
}

#[derive(Debug, Clone, Copy)]
pub struct MovieListing;

impl Listing for MovieListing {
    type Sort = MovieSort;
    const TABLE: &'static str = "movies";
    const COLUMNS: &'static str =
        "id, created_at, title, year, runtime, genres, version";
    const TEXT_COLUMN: &'static str = "title";
    const TAG_COLUMN: &'static str = "genres";
}

#[derive(Debug, Clone, Copy)]
pub struct DirectorListing;

impl Listing for DirectorListing {
    type Sort = DirectorSort;
    const TABLE: &'static str = "directors";
    const COLUMNS: &'static str = "id, name, surname, awards, version";
    const TEXT_COLUMN: &'static str = "name";
    const TAG_COLUMN: &'static str = "awards";
}

/// Builds the statements for one validated listing request.
#[derive(Debug)]
pub struct ListQuery<'r, L: Listing> {
    request: &'r ListRequest<L::Sort>,
    _listing: PhantomData<L>,
}

impl<'r, L: Listing> ListQuery<'r, L> {
    pub fn new(request: &'r ListRequest<L::Sort>) -> Self {
        Self {
            request,
            _listing: PhantomData,
        }
    }

    pub fn request(&self) -> &ListRequest<L::Sort> {
        self.request
    }

    /// One page of rows, each carrying the total match count as
    /// `total_records`.
    pub fn page_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut sql =
            QueryBuilder::new("SELECT count(*) OVER() AS total_records, ");
        sql.push(L::COLUMNS).push(" FROM ").push(L::TABLE);
        self.push_predicate(&mut sql);
        self.push_ordering(&mut sql);

        let page = self.request.page;
        sql.push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        sql
    }

    /// Total number of matching rows, using the same predicate as
    /// [`Self::page_query`].
    pub fn count_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut sql = QueryBuilder::new("SELECT count(*) FROM ");
        sql.push(L::TABLE);
        self.push_predicate(&mut sql);
        sql
    }

    fn push_predicate(&self, sql: &mut QueryBuilder<'static, Postgres>) {
        let filters = &self.request.filters;
        let mut glue = " WHERE ";

        if filters.has_text() {
            sql.push(glue)
                .push("to_tsvector(")
                .push(TEXT_SEARCH_CONFIG)
                .push(", ")
                .push(L::TEXT_COLUMN)
                .push(") @@ plainto_tsquery(")
                .push(TEXT_SEARCH_CONFIG)
                .push(", ")
                .push_bind(filters.text().to_owned())
                .push(")");
            glue = " AND ";
        }

        if filters.has_tags() {
            sql.push(glue)
                .push(L::TAG_COLUMN)
                .push(" @> ")
                .push_bind(filters.tags().to_vec());
        }
    }

    fn push_ordering(&self, sql: &mut QueryBuilder<'static, Postgres>) {
        let sort = self.request.sort;
        sql.push(" ORDER BY ")
            .push(sort.column())
            .push(" ")
            .push(sort.order.as_sql())
            .push(", ")
            .push(TIE_BREAK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{ListFilters, ListParams, PageRequest, SortOrder, SortSpec};

    fn movie_request(
        text: &str,
        tags: &[&str],
        sort: &str,
        page: i64,
        page_size: i64,
    ) -> ListRequest<MovieSort> {
        ListRequest::new(
            ListFilters::new(text, tags.iter().map(|t| t.to_string())),
            SortSpec::parse(sort).unwrap(),
            PageRequest::new(page, page_size).unwrap(),
        )
    }

    #[test]
    fn unfiltered_listing_has_no_predicate() {
        let request = movie_request("", &[], "id", 1, 20);
        let query = ListQuery::<MovieListing>::new(&request);

        assert_eq!(
            query.page_query().sql(),
            "SELECT count(*) OVER() AS total_records, \
             id, created_at, title, year, runtime, genres, version \
             FROM movies ORDER BY id ASC, id ASC LIMIT $1 OFFSET $2"
        );
        assert_eq!(query.count_query().sql(), "SELECT count(*) FROM movies");
    }

    #[test]
    fn text_and_tags_are_bound_and_anded() {
        let request =
            movie_request("black swan", &["Drama", "Thriller"], "-year", 2, 10);
        let query = ListQuery::<MovieListing>::new(&request);
        let page = query.page_query();
        let sql = page.sql();

        assert!(sql.contains(
            " WHERE to_tsvector('simple', title) @@ plainto_tsquery('simple', $1)"
        ));
        assert!(sql.contains(" AND genres @> $2"));
        assert!(sql.ends_with(" ORDER BY year DESC, id ASC LIMIT $3 OFFSET $4"));
        assert!(!sql.contains("black swan"));
        assert!(!sql.contains("Drama"));
    }

    #[test]
    fn count_shares_the_predicate() {
        let request = movie_request("", &["Action"], "title", 1, 20);
        let query = ListQuery::<MovieListing>::new(&request);

        assert_eq!(
            query.count_query().sql(),
            "SELECT count(*) FROM movies WHERE genres @> $1"
        );
        assert!(query.page_query().sql().contains(" WHERE genres @> $1 ORDER BY title ASC, id ASC"));
    }

    #[test]
    fn directors_use_their_own_columns() {
        let request = ListParams {
            text: Some("kubrick".into()),
            sort: Some("-surname".into()),
            ..ListParams::default()
        }
        .validate::<DirectorSort>()
        .unwrap();
        assert_eq!(request.sort.order, SortOrder::Descending);

        let query = ListQuery::<DirectorListing>::new(&request);
        let page = query.page_query();

        assert!(page.sql().starts_with(
            "SELECT count(*) OVER() AS total_records, id, name, surname, awards, version FROM directors WHERE to_tsvector('simple', name)"
        ));
        assert!(page.sql().contains("ORDER BY surname DESC, id ASC"));
        assert!(!page.sql().contains("awards @>"));
    }

    #[test]
    fn every_sort_key_orders_by_its_column_then_id() {
        for key in MovieSort::SAFELIST {
            for order in [SortOrder::Ascending, SortOrder::Descending] {
                let request = ListRequest::new(
                    ListFilters::default(),
                    SortSpec::new(*key, order),
                    PageRequest::default(),
                );
                let page = ListQuery::<MovieListing>::new(&request).page_query();
                let expected = format!(
                    " ORDER BY {} {}, id ASC LIMIT",
                    key.column(),
                    order.as_sql()
                );
                assert!(page.sql().contains(&expected), "{}", page.sql());
            }
        }
    }
}
