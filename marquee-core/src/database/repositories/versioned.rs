//! Shared pieces of the optimistic-concurrency protocol.
//!
//! Updates are a single `UPDATE ... WHERE id = $n AND version = $m
//! RETURNING version`, so the compare-and-swap is atomic in the database.
//! When no row comes back the write was refused, and the reason is found by
//! re-reading the stored version.

use marquee_model::RecordVersion;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::error::{Entity, Result, StoreError};

/// Version currently stored for `id`, or `None` when the row is gone.
pub(crate) async fn stored_version(
    pool: &PgPool,
    entity: Entity,
    id: i64,
) -> Result<Option<RecordVersion>> {
    let mut sql = QueryBuilder::<Postgres>::new("SELECT version FROM ");
    sql.push(entity.table()).push(" WHERE id = ").push_bind(id);

    sql.build_query_scalar::<i32>()
        .fetch_optional(pool)
        .await
        .map(|version| version.map(RecordVersion))
        .map_err(StoreError::storage(format!(
            "failed to re-read {entity} version"
        )))
}

/// Explain why a conditional update matched no row.
pub(crate) fn classify_missed_update(
    entity: Entity,
    id: i64,
    expected: RecordVersion,
    stored: Option<RecordVersion>,
) -> StoreError {
    match stored {
        None => StoreError::not_found(entity, id),
        Some(stored) => {
            debug!(%entity, id, %expected, %stored, "edit conflict");
            StoreError::EditConflict {
                entity,
                id,
                expected,
                stored,
            }
        }
    }
}

/// Resolve a refused update into `NotFound` or `EditConflict`.
pub(crate) async fn missed_update(
    pool: &PgPool,
    entity: Entity,
    id: i64,
    expected: RecordVersion,
) -> StoreError {
    match stored_version(pool, entity, id).await {
        Ok(stored) => classify_missed_update(entity, id, expected, stored),
        Err(err) => err,
    }
}

/// Physically remove a row. Zero affected rows means it never existed.
pub(crate) async fn delete_row(
    pool: &PgPool,
    entity: Entity,
    id: i64,
) -> Result<()> {
    let mut sql = QueryBuilder::<Postgres>::new("DELETE FROM ");
    sql.push(entity.table()).push(" WHERE id = ").push_bind(id);

    let result = sql
        .build()
        .execute(pool)
        .await
        .map_err(StoreError::storage(format!("failed to delete {entity}")))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::not_found(entity, id));
    }

    Ok(())
}
