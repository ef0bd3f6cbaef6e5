//! Request handlers, one module per resource.

pub mod directors;
pub mod health;
pub mod listing;
pub mod movies;
pub mod users;

use std::str::FromStr;

use axum::http::HeaderMap;
use marquee_model::RecordVersion;

use crate::infra::errors::{AppError, AppResult};

/// Header a client may send on PATCH to assert the version it last saw.
pub const EXPECTED_VERSION_HEADER: &str = "x-expected-version";

/// Parse a path id. Malformed and non-positive ids are both "not found".
pub(crate) fn parse_id<T>(raw: &str, is_valid: impl Fn(&T) -> bool) -> AppResult<T>
where
    T: FromStr,
{
    raw.parse::<T>()
        .ok()
        .filter(|id| is_valid(id))
        .ok_or_else(AppError::not_found)
}

/// Version the client expects the record to be at, if it said.
pub(crate) fn expected_version(
    headers: &HeaderMap,
) -> AppResult<Option<RecordVersion>> {
    let Some(value) = headers.get(EXPECTED_VERSION_HEADER) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|raw| raw.trim().parse::<i32>().ok())
        .map(|v| Some(RecordVersion(v)))
        .ok_or_else(|| {
            AppError::bad_request(format!(
                "{EXPECTED_VERSION_HEADER} must be an integer"
            ))
        })
}

/// Refuse the edit when the client's view is already stale.
pub(crate) fn check_expected_version(
    expected: Option<RecordVersion>,
    current: RecordVersion,
) -> AppResult<()> {
    match expected {
        Some(expected) if expected != current => Err(AppError::edit_conflict()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderValue, StatusCode};
    use marquee_model::MovieID;

    use super::*;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(
            parse_id::<MovieID>("12", MovieID::is_valid).unwrap(),
            MovieID(12)
        );
        for raw in ["0", "-4", "abc", "1.5", ""] {
            let err = parse_id::<MovieID>(raw, MovieID::is_valid).unwrap_err();
            assert_eq!(err.status, StatusCode::NOT_FOUND, "{raw}");
        }
    }

    #[test]
    fn expected_version_header_is_optional_but_must_parse() {
        let mut headers = HeaderMap::new();
        assert_eq!(expected_version(&headers).unwrap(), None);

        headers.insert(EXPECTED_VERSION_HEADER, HeaderValue::from_static("4"));
        assert_eq!(expected_version(&headers).unwrap(), Some(RecordVersion(4)));

        headers.insert(EXPECTED_VERSION_HEADER, HeaderValue::from_static("four"));
        assert_eq!(
            expected_version(&headers).unwrap_err().status,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn stale_expectation_is_a_conflict() {
        assert!(check_expected_version(None, RecordVersion(3)).is_ok());
        assert!(
            check_expected_version(Some(RecordVersion(3)), RecordVersion(3))
                .is_ok()
        );
        let err =
            check_expected_version(Some(RecordVersion(2)), RecordVersion(3))
                .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }
}
