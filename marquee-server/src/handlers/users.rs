use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use marquee_core::{
    StoreError,
    database::ports::USERS_EMAIL_CONSTRAINT,
    query::ValidationErrors,
    users::hash_password,
    validation::validate_registration,
};
use marquee_model::NewUser;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{
    AppState,
    infra::errors::{AppError, AppResult, SERVER_ERROR_MESSAGE},
};

pub const DUPLICATE_EMAIL_MESSAGE: &str =
    "a user with this email address already exists";

#[derive(Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterUserRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    validate_registration(&input.name, &input.email, &input.password)?;

    // CPU bound; runs on the blocking pool.
    let password = input.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing task failed");
            AppError::internal(SERVER_ERROR_MESSAGE)
        })??;

    let user = state
        .users
        .insert(NewUser {
            name: input.name,
            email: input.email,
            password_hash,
            activated: false,
        })
        .await
        .map_err(duplicate_email_as_validation)?;

    info!(id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

fn duplicate_email_as_validation(err: StoreError) -> AppError {
    if err.is_unique_violation_on(USERS_EMAIL_CONSTRAINT) {
        AppError::failed_validation(ValidationErrors::single(
            "email",
            DUPLICATE_EMAIL_MESSAGE,
        ))
    } else {
        err.into()
    }
}
