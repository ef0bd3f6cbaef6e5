#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::{TimeZone, Utc};
use marquee_core::database::ports::{
    MockDirectorRepository, MockMovieRepository, MockUserRepository,
};
use marquee_model::{Director, DirectorID, Movie, MovieID, RecordVersion};
use marquee_server::{AppState, create_app, infra::config::Config};
use serde_json::Value;
use tower::ServiceExt;

/// Repositories for one test; set expectations, then call [`Mocks::app`].
#[derive(Default)]
pub struct Mocks {
    pub movies: MockMovieRepository,
    pub directors: MockDirectorRepository,
    pub users: MockUserRepository,
}

impl Mocks {
    pub fn app(self) -> Router {
        let config = Config {
            environment: "testing".to_string(),
            ..Config::default()
        };
        create_app(AppState::new(
            Arc::new(self.movies),
            Arc::new(self.directors),
            Arc::new(self.users),
            Arc::new(config),
        ))
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn movie(id: i64) -> Movie {
    Movie {
        id: MovieID(id),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        title: "Movie 1".to_string(),
        year: 1999,
        runtime: 64,
        genres: vec!["Drama".to_string(), "Sci-Fi".to_string()],
        version: RecordVersion::INITIAL,
    }
}

pub fn director(id: i64) -> Director {
    Director {
        id: DirectorID(id),
        name: "Agnes".to_string(),
        surname: "Varda".to_string(),
        awards: vec!["Palme d'Or".to_string()],
        version: RecordVersion::INITIAL,
    }
}
