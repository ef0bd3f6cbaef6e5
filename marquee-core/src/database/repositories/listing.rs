use sqlx::{FromRow, PgPool, postgres::PgRow};
use tracing::debug;

use crate::{
    error::{Result, StoreError},
    query::{ListQuery, ListRequest, Listing, Page},
};

/// A listing row: one record plus the window-function total.
pub(crate) trait ListedRow {
    type Record;

    fn total_records(&self) -> i64;

    fn into_record(self) -> Self::Record;
}

/// Run the page query for `request` and assemble a [`Page`].
///
/// An empty page past the first has no row to carry the window count, so
/// the total is then taken from the stand-alone count query.
pub(crate) async fn fetch_page<L, R>(
    pool: &PgPool,
    request: &ListRequest<L::Sort>,
) -> Result<Page<R::Record>>
where
    L: Listing,
    R: ListedRow + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let query = ListQuery::<L>::new(request);

    let mut page_sql = query.page_query();
    let rows: Vec<R> = page_sql
        .build_query_as::<R>()
        .fetch_all(pool)
        .await
        .map_err(StoreError::storage(format!("failed to list {}", L::TABLE)))?;

    let window_total = rows.first().map(ListedRow::total_records);
    let total_records = match window_total {
        Some(total) => total,
        None if request.page.offset() > 0 => {
            let mut count_sql = query.count_query();
            count_sql
                .build_query_scalar::<i64>()
                .fetch_one(pool)
                .await
                .map_err(StoreError::storage(format!(
                    "failed to count {}",
                    L::TABLE
                )))?
        }
        None => 0,
    };

    debug!(
        table = L::TABLE,
        sort = %request.sort,
        page = request.page.page(),
        returned = rows.len(),
        total_records,
        "listing page fetched"
    );

    Ok(Page::new(
        rows.into_iter().map(R::into_record).collect(),
        total_records,
        request.page,
    ))
}
