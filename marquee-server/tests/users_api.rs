mod support;

use axum::http::{Method, StatusCode};
use chrono::Utc;
use marquee_core::{StoreError, users::verify_password};
use marquee_model::{RecordVersion, User, UserID};
use serde_json::json;
use support::{Mocks, json, send};

#[tokio::test]
async fn registration_hashes_the_password_and_hides_it() {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_insert()
        .withf(|user| {
            user.email == "alice@example.com"
                && !user.activated
                && user.password_hash.starts_with("$argon2id$")
                && verify_password("pa55word!", &user.password_hash)
                    .unwrap_or(false)
        })
        .times(1)
        .returning(|user| {
            Ok(User {
                id: UserID(1),
                created_at: Utc::now(),
                name: user.name,
                email: user.email,
                password_hash: user.password_hash,
                activated: user.activated,
                version: RecordVersion::INITIAL,
            })
        });

    let response = send(
        mocks.app(),
        json(
            Method::POST,
            "/v1/users",
            json!({
                "name": "Alice",
                "email": "alice@example.com",
                "password": "pa55word!",
            }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["user"]["id"], 1);
    assert_eq!(response.body["user"]["activated"], false);
    assert!(response.body["user"].get("password_hash").is_none());
    assert!(!response.body.to_string().contains("argon2"));
}

#[tokio::test]
async fn duplicate_email_is_reported_on_the_email_field() {
    let mut mocks = Mocks::default();
    mocks.users.expect_insert().returning(|_| {
        Err(StoreError::UniqueViolation {
            constraint: "users_email_key".to_string(),
            source: sqlx_unique_violation(),
        })
    });

    let response = send(
        mocks.app(),
        json(
            Method::POST,
            "/v1/users",
            json!({
                "name": "Alice",
                "email": "alice@example.com",
                "password": "pa55word!",
            }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.body["error"]["fields"]["email"],
        "a user with this email address already exists"
    );
}

#[tokio::test]
async fn weak_registration_is_rejected_before_hashing() {
    let mut mocks = Mocks::default();
    mocks.users.expect_insert().never();

    let response = send(
        mocks.app(),
        json(
            Method::POST,
            "/v1/users",
            json!({ "name": "", "email": "not-an-email", "password": "short" }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = &response.body["error"]["fields"];
    assert_eq!(fields["name"], "must be provided");
    assert_eq!(fields["email"], "must be a valid email address");
    assert_eq!(fields["password"], "must be at least 8 bytes long");
}

fn sqlx_unique_violation() -> sqlx::Error {
    sqlx::Error::Protocol("duplicate key value violates unique constraint".into())
}
