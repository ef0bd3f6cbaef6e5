use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marquee_model::{Movie, MovieID, NewMovie, RecordVersion};
use sqlx::PgPool;
use tracing::{info, instrument};

use super::{
    listing::{ListedRow, fetch_page},
    versioned::{delete_row, missed_update},
};
use crate::{
    database::{deadline::QueryDeadline, ports::MovieRepository},
    error::{Entity, Result, StoreError},
    query::{ListRequest, MovieListing, MovieSort, Page},
};

#[derive(Debug, Clone)]
pub struct PostgresMovieRepository {
    pool: PgPool,
    deadline: QueryDeadline,
}

impl PostgresMovieRepository {
    pub fn new(pool: PgPool, deadline: QueryDeadline) -> Self {
        Self { pool, deadline }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MovieRow {
    id: MovieID,
    created_at: DateTime<Utc>,
    title: String,
    year: i32,
    runtime: i32,
    genres: Vec<String>,
    version: RecordVersion,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: row.id,
            created_at: row.created_at,
            title: row.title,
            year: row.year,
            runtime: row.runtime,
            genres: row.genres,
            version: row.version,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ListedMovieRow {
    total_records: i64,
    #[sqlx(flatten)]
    movie: MovieRow,
}

impl ListedRow for ListedMovieRow {
    type Record = Movie;

    fn total_records(&self) -> i64 {
        self.total_records
    }

    fn into_record(self) -> Movie {
        self.movie.into()
    }
}

#[async_trait]
impl MovieRepository for PostgresMovieRepository {
    #[instrument(skip(self, movie), fields(title = %movie.title))]
    async fn insert(&self, movie: NewMovie) -> Result<Movie> {
        let stored = self
            .deadline
            .run("movies.insert", async {
                sqlx::query_as::<_, MovieRow>(
                    r#"
                    INSERT INTO movies (title, year, runtime, genres)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, created_at, title, year, runtime, genres, version
                    "#,
                )
                .bind(&movie.title)
                .bind(movie.year)
                .bind(movie.runtime)
                .bind(&movie.genres)
                .fetch_one(self.pool())
                .await
                .map(Movie::from)
                .map_err(StoreError::storage("failed to insert movie"))
            })
            .await?;

        info!(id = %stored.id, "movie created");
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: MovieID) -> Result<Movie> {
        if !id.is_valid() {
            return Err(StoreError::not_found(Entity::Movie, id));
        }

        self.deadline
            .run("movies.get", async {
                sqlx::query_as::<_, MovieRow>(
                    r#"
                    SELECT id, created_at, title, year, runtime, genres, version
                    FROM movies
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .fetch_optional(self.pool())
                .await
                .map_err(StoreError::storage("failed to load movie"))?
                .map(Movie::from)
                .ok_or_else(|| StoreError::not_found(Entity::Movie, id))
            })
            .await
    }

    #[instrument(skip(self, movie), fields(id = %movie.id, version = %movie.version))]
    async fn update(&self, movie: &Movie) -> Result<Movie> {
        if !movie.id.is_valid() {
            return Err(StoreError::not_found(Entity::Movie, movie.id));
        }

        self.deadline
            .run("movies.update", async {
                let new_version = sqlx::query_scalar::<_, RecordVersion>(
                    r#"
                    UPDATE movies
                    SET title = $1, year = $2, runtime = $3, genres = $4, version = version + 1
                    WHERE id = $5 AND version = $6
                    RETURNING version
                    "#,
                )
                .bind(&movie.title)
                .bind(movie.year)
                .bind(movie.runtime)
                .bind(&movie.genres)
                .bind(movie.id)
                .bind(movie.version)
                .fetch_optional(self.pool())
                .await
                .map_err(StoreError::storage("failed to update movie"))?;

                match new_version {
                    Some(version) => Ok(Movie {
                        version,
                        ..movie.clone()
                    }),
                    None => Err(missed_update(
                        self.pool(),
                        Entity::Movie,
                        movie.id.get(),
                        movie.version,
                    )
                    .await),
                }
            })
            .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: MovieID) -> Result<()> {
        if !id.is_valid() {
            return Err(StoreError::not_found(Entity::Movie, id));
        }

        self.deadline
            .run("movies.delete", delete_row(self.pool(), Entity::Movie, id.get()))
            .await?;

        info!(%id, "movie deleted");
        Ok(())
    }

    #[instrument(skip(self, request), fields(sort = %request.sort, page = request.page.page()))]
    async fn list(&self, request: &ListRequest<MovieSort>) -> Result<Page<Movie>> {
        self.deadline
            .run(
                "movies.list",
                fetch_page::<MovieListing, ListedMovieRow>(self.pool(), request),
            )
            .await
    }
}
