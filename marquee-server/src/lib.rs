//! # Marquee Server
//!
//! HTTP API over the Marquee catalog: filtered, paginated listings and
//! versioned edits of movies and directors, plus user registration.
//!
//! The router is built by [`create_app`] from an [`AppState`] holding one
//! repository per record kind, so tests can swap the Postgres adapters for
//! mocks.

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    response::IntoResponse,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{handlers::EXPECTED_VERSION_HEADER, infra::errors::AppError};

pub fn create_app(state: AppState) -> Router {
    let cors_layer = cors_layer(&state.config().cors_allowed_origins);

    Router::new()
        .merge(routes::create_api_router())
        .fallback(not_found_handler)
        .method_not_allowed_fallback(method_not_allowed_handler)
        // Outer to inner: CORS, then tracing
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(EXPECTED_VERSION_HEADER),
        ])
}

async fn not_found_handler() -> impl IntoResponse {
    AppError::not_found()
}

async fn method_not_allowed_handler() -> impl IntoResponse {
    AppError::method_not_allowed()
}
