use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use marquee_core::{
    query::MovieSort,
    validation::{validate_movie, validate_new_movie},
};
use marquee_model::{MovieID, MoviePatch, NewMovie};
use serde_json::{Value, json};
use tracing::info;

use super::{
    check_expected_version, expected_version, listing::MovieListQuery, parse_id,
};
use crate::{AppState, infra::errors::AppResult};

pub async fn create_movie(
    State(state): State<AppState>,
    payload: Result<Json<NewMovie>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    validate_new_movie(&input)?;

    let movie = state.movies.insert(input).await?;
    let location = format!("/v1/movies/{}", movie.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(json!({ "movie": movie })),
    ))
}

pub async fn show_movie(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&raw_id, MovieID::is_valid)?;
    let movie = state.movies.get(id).await?;
    Ok(Json(json!({ "movie": movie })))
}

pub async fn update_movie(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<MoviePatch>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&raw_id, MovieID::is_valid)?;
    let expected = expected_version(&headers)?;
    let Json(patch) = payload?;

    let mut movie = state.movies.get(id).await?;
    check_expected_version(expected, movie.version)?;

    patch.apply(&mut movie);
    validate_movie(&movie)?;

    let movie = state.movies.update(&movie).await?;
    info!(id = %movie.id, version = %movie.version, "movie updated");
    Ok(Json(json!({ "movie": movie })))
}

pub async fn delete_movie(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&raw_id, MovieID::is_valid)?;
    state.movies.delete(id).await?;
    Ok(Json(json!({ "message": "movie successfully deleted" })))
}

pub async fn list_movies(
    State(state): State<AppState>,
    query: Result<Query<MovieListQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(query) = query?;
    let request = query.into_request::<MovieSort>()?;
    let page = state.movies.list(&request).await?;
    Ok(Json(json!({
        "movies": page.records,
        "metadata": page.metadata,
    })))
}
