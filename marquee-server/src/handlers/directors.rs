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
    query::DirectorSort,
    validation::{validate_director, validate_new_director},
};
use marquee_model::{DirectorID, DirectorPatch, NewDirector};
use serde_json::{Value, json};
use tracing::info;

use super::{
    check_expected_version, expected_version, listing::DirectorListQuery, parse_id,
};
use crate::{AppState, infra::errors::AppResult};

pub async fn create_director(
    State(state): State<AppState>,
    payload: Result<Json<NewDirector>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    validate_new_director(&input)?;

    let director = state.directors.insert(input).await?;
    let location = format!("/v1/directors/{}", director.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(json!({ "director": director })),
    ))
}

pub async fn show_director(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&raw_id, DirectorID::is_valid)?;
    let director = state.directors.get(id).await?;
    Ok(Json(json!({ "director": director })))
}

pub async fn update_director(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<DirectorPatch>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&raw_id, DirectorID::is_valid)?;
    let expected = expected_version(&headers)?;
    let Json(patch) = payload?;

    let mut director = state.directors.get(id).await?;
    check_expected_version(expected, director.version)?;

    patch.apply(&mut director);
    validate_director(&director)?;

    let director = state.directors.update(&director).await?;
    info!(id = %director.id, version = %director.version, "director updated");
    Ok(Json(json!({ "director": director })))
}

pub async fn delete_director(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&raw_id, DirectorID::is_valid)?;
    state.directors.delete(id).await?;
    Ok(Json(json!({ "message": "director successfully deleted" })))
}

pub async fn list_directors(
    State(state): State<AppState>,
    query: Result<Query<DirectorListQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(query) = query?;
    let request = query.into_request::<DirectorSort>()?;
    let page = state.directors.list(&request).await?;
    Ok(Json(json!({
        "directors": page.records,
        "metadata": page.metadata,
    })))
}
