use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use marquee_core::{StoreError, query::ValidationErrors, users::PasswordError};

pub type AppResult<T> = Result<T, AppError>;

pub const NOT_FOUND_MESSAGE: &str =
    "the requested resource could not be found";
pub const EDIT_CONFLICT_MESSAGE: &str =
    "unable to update the record due to an edit conflict, please try again";
pub const SERVER_ERROR_MESSAGE: &str =
    "the server encountered a problem and could not process your request";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    /// Per-field problems for 422 responses.
    pub fields: Option<ValidationErrors>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            fields: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            "the method is not supported for this resource",
        )
    }

    pub fn edit_conflict() -> Self {
        Self::new(StatusCode::CONFLICT, EDIT_CONFLICT_MESSAGE)
    }

    pub fn failed_validation(fields: ValidationErrors) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "the request failed validation".to_string(),
            fields: Some(fields),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut error = json!({
            "message": self.message,
            "status": self.status.as_u16(),
        });
        if let Some(fields) = &self.fields {
            error["fields"] = json!(fields);
        }

        (self.status, Json(json!({ "error": error }))).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::not_found(),
            StoreError::EditConflict { .. } => Self::edit_conflict(),
            other => {
                tracing::error!(error = ?other, "store operation failed");
                Self::internal(SERVER_ERROR_MESSAGE)
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(fields: ValidationErrors) -> Self {
        Self::failed_validation(fields)
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        tracing::error!(error = %err, "password hashing failed");
        Self::internal(SERVER_ERROR_MESSAGE)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use marquee_core::{Entity, model::RecordVersion};

    use super::*;

    #[test]
    fn store_outcomes_map_to_statuses() {
        let cases = [
            (
                StoreError::not_found(Entity::Movie, 3),
                StatusCode::NOT_FOUND,
            ),
            (
                StoreError::EditConflict {
                    entity: Entity::Movie,
                    id: 3,
                    expected: RecordVersion(1),
                    stored: RecordVersion(2),
                },
                StatusCode::CONFLICT,
            ),
            (
                StoreError::Timeout {
                    operation: "movies.list",
                    after: Duration::from_secs(3),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                StoreError::InvalidConfiguration("no pool".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status, expected);
        }
    }

    #[test]
    fn field_errors_become_422() {
        let err = AppError::from(ValidationErrors::single(
            "title",
            "must be provided",
        ));
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.fields.and_then(|f| f.get("title").map(str::to_owned)),
            Some("must be provided".to_owned())
        );
    }

    #[test]
    fn internal_details_stay_in_the_log() {
        let err = AppError::from(StoreError::Timeout {
            operation: "movies.get",
            after: Duration::from_secs(3),
        });
        assert_eq!(err.message, SERVER_ERROR_MESSAGE);
        assert!(err.fields.is_none());
    }
}
