//! # Marquee Core
//!
//! Storage and query layer for the Marquee catalog service.
//!
//! ## Overview
//!
//! - **Listing**: safelisted sorting, full-text and tag filters, page/size
//!   pagination and a total count, compiled to one parameterized Postgres
//!   statement ([`query`])
//! - **Record store**: create/read/update/delete for movies, directors and
//!   users with an optimistic version counter ([`database`])
//! - **Validation**: field rules applied before anything is written
//!   ([`validation`])
//!
//! ## Feature Flags
//!
//! - `mocks`: mockall doubles for the repository ports
//! - `postgres-tests`: behaviour tests that need a live Postgres
//!
//! ## Example
//!
//! ```no_run
//! use marquee_core::{
//!     database::{DatabaseSettings, PostgresStore, ports::MovieRepository},
//!     query::{ListParams, MovieSort},
//! };
//!
//! async fn newest_action_movies() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = DatabaseSettings::with_url("postgres://localhost/marquee");
//!     let store = PostgresStore::connect(&settings).await?;
//!
//!     let params = ListParams {
//!         tags: vec!["Action".into()],
//!         sort: Some("-year".into()),
//!         ..ListParams::default()
//!     };
//!     let request = params.validate::<MovieSort>()?;
//!     let page = store.movies().list(&request).await?;
//!     println!("{} of {}", page.records.len(), page.metadata.total_records);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub use marquee_model as model;

/// Pool setup, repository ports and Postgres adapters
pub mod database;

/// Store error taxonomy
pub mod error;

/// Filtered, sorted, paginated listing
pub mod query;

/// Password hashing
pub mod users;

/// Field validation for writes
pub mod validation;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use error::{Entity, Result, StoreError};
