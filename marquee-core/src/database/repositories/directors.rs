use async_trait::async_trait;
use marquee_model::{Director, DirectorID, NewDirector, RecordVersion};
use sqlx::PgPool;
use tracing::{info, instrument};

use super::{
    listing::{ListedRow, fetch_page},
    versioned::{delete_row, missed_update},
};
use crate::{
    database::{deadline::QueryDeadline, ports::DirectorRepository},
    error::{Entity, Result, StoreError},
    query::{DirectorListing, DirectorSort, ListRequest, Page},
};

#[derive(Debug, Clone)]
pub struct PostgresDirectorRepository {
    pool: PgPool,
    deadline: QueryDeadline,
}

impl PostgresDirectorRepository {
    pub fn new(pool: PgPool, deadline: QueryDeadline) -> Self {
        Self { pool, deadline }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DirectorRow {
    id: DirectorID,
    name: String,
    surname: String,
    awards: Vec<String>,
    version: RecordVersion,
}

impl From<DirectorRow> for Director {
    fn from(row: DirectorRow) -> Self {
        Director {
            id: row.id,
            name: row.name,
            surname: row.surname,
            awards: row.awards,
            version: row.version,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ListedDirectorRow {
    total_records: i64,
    #[sqlx(flatten)]
    director: DirectorRow,
}

impl ListedRow for ListedDirectorRow {
    type Record = Director;

    fn total_records(&self) -> i64 {
        self.total_records
    }

    fn into_record(self) -> Director {
        self.director.into()
    }
}

#[async_trait]
impl DirectorRepository for PostgresDirectorRepository {
    #[instrument(skip(self, director), fields(surname = %director.surname))]
    async fn insert(&self, director: NewDirector) -> Result<Director> {
        let stored = self
            .deadline
            .run("directors.insert", async {
                sqlx::query_as::<_, DirectorRow>(
                    r#"
                    INSERT INTO directors (name, surname, awards)
                    VALUES ($1, $2, $3)
                    RETURNING id, name, surname, awards, version
                    "#,
                )
                .bind(&director.name)
                .bind(&director.surname)
                .bind(&director.awards)
                .fetch_one(self.pool())
                .await
                .map(Director::from)
                .map_err(StoreError::storage("failed to insert director"))
            })
            .await?;

        info!(id = %stored.id, "director created");
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: DirectorID) -> Result<Director> {
        if !id.is_valid() {
            return Err(StoreError::not_found(Entity::Director, id));
        }

        self.deadline
            .run("directors.get", async {
                sqlx::query_as::<_, DirectorRow>(
                    r#"
                    SELECT id, name, surname, awards, version
                    FROM directors
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .fetch_optional(self.pool())
                .await
                .map_err(StoreError::storage("failed to load director"))?
                .map(Director::from)
                .ok_or_else(|| StoreError::not_found(Entity::Director, id))
            })
            .await
    }

    #[instrument(skip(self, director), fields(id = %director.id, version = %director.version))]
    async fn update(&self, director: &Director) -> Result<Director> {
        if !director.id.is_valid() {
            return Err(StoreError::not_found(Entity::Director, director.id));
        }

        self.deadline
            .run("directors.update", async {
                let new_version = sqlx::query_scalar::<_, RecordVersion>(
                    r#"
                    UPDATE directors
                    SET name = $1, surname = $2, awards = $3, version = version + 1
                    WHERE id = $4 AND version = $5
                    RETURNING version
                    "#,
                )
                .bind(&director.name)
                .bind(&director.surname)
                .bind(&director.awards)
                .bind(director.id)
                .bind(director.version)
                .fetch_optional(self.pool())
                .await
                .map_err(StoreError::storage("failed to update director"))?;

                match new_version {
                    Some(version) => Ok(Director {
                        version,
                        ..director.clone()
                    }),
                    None => Err(missed_update(
                        self.pool(),
                        Entity::Director,
                        director.id.get(),
                        director.version,
                    )
                    .await),
                }
            })
            .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: DirectorID) -> Result<()> {
        if !id.is_valid() {
            return Err(StoreError::not_found(Entity::Director, id));
        }

        self.deadline
            .run(
                "directors.delete",
                delete_row(self.pool(), Entity::Director, id.get()),
            )
            .await?;

        info!(%id, "director deleted");
        Ok(())
    }

    #[instrument(skip(self, request), fields(sort = %request.sort, page = request.page.page()))]
    async fn list(
        &self,
        request: &ListRequest<DirectorSort>,
    ) -> Result<Page<Director>> {
        self.deadline
            .run(
                "directors.list",
                fetch_page::<DirectorListing, ListedDirectorRow>(
                    self.pool(),
                    request,
                ),
            )
            .await
    }
}
