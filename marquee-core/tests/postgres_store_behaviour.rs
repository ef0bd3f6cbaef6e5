#![cfg(feature = "postgres-tests")]

use std::time::Duration;

use anyhow::Result;
use marquee_core::{
    StoreError,
    database::{
        PostgresStore, QueryDeadline,
        ports::{
            DirectorRepository, MovieRepository, USERS_EMAIL_CONSTRAINT,
            UserRepository,
        },
    },
    model::{MovieID, MoviePatch, NewMovie, NewUser, RecordVersion},
    query::{DirectorSort, ListParams, MovieSort},
};
use sqlx::PgPool;

fn store(pool: PgPool) -> PostgresStore {
    PostgresStore::new(pool, QueryDeadline::new(Duration::from_secs(5)))
}

fn list_params(sort: &str) -> ListParams {
    ListParams {
        sort: Some(sort.to_string()),
        ..ListParams::default()
    }
}

#[sqlx::test(migrator = "marquee_core::MIGRATOR")]
async fn insert_assigns_identity_and_first_version(pool: PgPool) -> Result<()> {
    let store = store(pool);

    let movie = store
        .movies()
        .insert(NewMovie {
            title: "Arrival".into(),
            year: 2016,
            runtime: 116,
            genres: vec!["Drama".into(), "Sci-Fi".into()],
        })
        .await?;

    assert!(movie.id.is_valid());
    assert_eq!(movie.version, RecordVersion::INITIAL);

    let loaded = store.movies().get(movie.id).await?;
    assert_eq!(loaded, movie);
    Ok(())
}

#[sqlx::test(
    migrator = "marquee_core::MIGRATOR",
    fixtures(path = "../fixtures", scripts("movies"))
)]
async fn updates_bump_the_version_and_reject_stale_writers(
    pool: PgPool,
) -> Result<()> {
    let store = store(pool);
    let movies = store.movies();

    let original = movies.get(MovieID(1)).await?;
    assert_eq!(original.version, RecordVersion(1));

    let mut edited = original.clone();
    MoviePatch {
        runtime: Some(110),
        ..MoviePatch::default()
    }
    .apply(&mut edited);
    let saved = movies.update(&edited).await?;
    assert_eq!(saved.version, RecordVersion(2));
    assert_eq!(movies.get(MovieID(1)).await?.runtime, 110);

    // A writer still holding version 1 loses.
    let err = movies.update(&original).await.unwrap_err();
    match err {
        StoreError::EditConflict {
            expected, stored, ..
        } => {
            assert_eq!(expected, RecordVersion(1));
            assert_eq!(stored, RecordVersion(2));
        }
        other => panic!("expected edit conflict, got {other:?}"),
    }

    let again = movies.update(&saved).await?;
    assert_eq!(again.version, RecordVersion(3));
    Ok(())
}

#[sqlx::test(
    migrator = "marquee_core::MIGRATOR",
    fixtures(path = "../fixtures", scripts("movies"))
)]
async fn deleted_rows_are_not_found(pool: PgPool) -> Result<()> {
    let store = store(pool);
    let movies = store.movies();

    let doomed = movies.get(MovieID(4)).await?;
    movies.delete(MovieID(4)).await?;

    assert!(movies.get(MovieID(4)).await.unwrap_err().is_not_found());
    assert!(movies.delete(MovieID(4)).await.unwrap_err().is_not_found());
    assert!(movies.update(&doomed).await.unwrap_err().is_not_found());
    Ok(())
}

#[sqlx::test(migrator = "marquee_core::MIGRATOR")]
async fn ids_below_one_never_reach_the_database(pool: PgPool) -> Result<()> {
    let store = store(pool);

    for id in [0, -3] {
        assert!(store.movies().get(MovieID(id)).await.unwrap_err().is_not_found());
        assert!(
            store
                .movies()
                .delete(MovieID(id))
                .await
                .unwrap_err()
                .is_not_found()
        );
    }
    Ok(())
}

#[sqlx::test(
    migrator = "marquee_core::MIGRATOR",
    fixtures(path = "../fixtures", scripts("movies"))
)]
async fn genre_filter_requires_every_tag(pool: PgPool) -> Result<()> {
    let store = store(pool);

    let request = ListParams {
        tags: vec!["Action".into()],
        ..ListParams::default()
    }
    .validate::<MovieSort>()?;
    let page = store.movies().list(&request).await?;

    let ids: Vec<i64> = page.records.iter().map(|m| m.id.get()).collect();
    assert_eq!(ids, vec![2, 3, 5]);
    assert_eq!(page.metadata.total_records, 3);

    let request = ListParams {
        tags: vec!["Action".into(), "Comedy".into()],
        ..ListParams::default()
    }
    .validate::<MovieSort>()?;
    let page = store.movies().list(&request).await?;
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].title, "Deadpool");
    Ok(())
}

#[sqlx::test(
    migrator = "marquee_core::MIGRATOR",
    fixtures(path = "../fixtures", scripts("movies"))
)]
async fn text_search_matches_whole_words_case_insensitively(
    pool: PgPool,
) -> Result<()> {
    let store = store(pool);

    let request = ListParams {
        text: Some("  BLACK panther ".into()),
        ..ListParams::default()
    }
    .validate::<MovieSort>()?;
    let page = store.movies().list(&request).await?;

    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].id, MovieID(2));
    Ok(())
}

#[sqlx::test(
    migrator = "marquee_core::MIGRATOR",
    fixtures(path = "../fixtures", scripts("movies"))
)]
async fn descending_sort_breaks_ties_by_id(pool: PgPool) -> Result<()> {
    let store = store(pool);

    let request = list_params("-year").validate::<MovieSort>()?;
    let page = store.movies().list(&request).await?;

    let ids: Vec<i64> = page.records.iter().map(|m| m.id.get()).collect();
    // 2018, 2016 (ids 1 and 3), 2015, 1985
    assert_eq!(ids, vec![2, 1, 3, 5, 4]);
    Ok(())
}

#[sqlx::test(
    migrator = "marquee_core::MIGRATOR",
    fixtures(path = "../fixtures", scripts("movies"))
)]
async fn pagination_reports_metadata(pool: PgPool) -> Result<()> {
    let store = store(pool);

    let request = ListParams {
        page: Some(2),
        page_size: Some(2),
        ..ListParams::default()
    }
    .validate::<MovieSort>()?;
    let page = store.movies().list(&request).await?;

    let ids: Vec<i64> = page.records.iter().map(|m| m.id.get()).collect();
    assert_eq!(ids, vec![3, 4]);
    assert_eq!(page.metadata.current_page, 2);
    assert_eq!(page.metadata.page_size, 2);
    assert_eq!(page.metadata.first_page, 1);
    assert_eq!(page.metadata.last_page, 3);
    assert_eq!(page.metadata.total_records, 5);

    // Past the end: no rows, but the total is still known.
    let request = ListParams {
        page: Some(9),
        page_size: Some(2),
        ..ListParams::default()
    }
    .validate::<MovieSort>()?;
    let page = store.movies().list(&request).await?;
    assert!(page.records.is_empty());
    assert_eq!(page.metadata.total_records, 5);
    assert_eq!(page.metadata.last_page, 3);
    Ok(())
}

#[sqlx::test(
    migrator = "marquee_core::MIGRATOR",
    fixtures(path = "../fixtures", scripts("movies"))
)]
async fn no_matches_yield_empty_metadata(pool: PgPool) -> Result<()> {
    let store = store(pool);

    let request = ListParams {
        tags: vec!["Western".into()],
        ..ListParams::default()
    }
    .validate::<MovieSort>()?;
    let page = store.movies().list(&request).await?;

    assert!(page.records.is_empty());
    assert_eq!(page.metadata.total_records, 0);
    assert_eq!(page.metadata.current_page, 0);
    assert_eq!(page.metadata.last_page, 0);
    Ok(())
}

#[sqlx::test(
    migrator = "marquee_core::MIGRATOR",
    fixtures(path = "../fixtures", scripts("directors"))
)]
async fn directors_list_and_version_like_movies(pool: PgPool) -> Result<()> {
    let store = store(pool);
    let directors = store.directors();

    let request = list_params("-surname").validate::<DirectorSort>()?;
    let page = directors.list(&request).await?;
    let surnames: Vec<&str> =
        page.records.iter().map(|d| d.surname.as_str()).collect();
    assert_eq!(surnames, vec!["Miller", "Coogler", "Clements"]);

    let request = ListParams {
        tags: vec!["BAFTA".into()],
        ..ListParams::default()
    }
    .validate::<DirectorSort>()?;
    let page = directors.list(&request).await?;
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].name, "George");

    let mut miller = page.records[0].clone();
    miller.awards.push("Hugo".into());
    let saved = directors.update(&miller).await?;
    assert_eq!(saved.version, RecordVersion(2));
    assert!(directors.update(&miller).await.unwrap_err().is_edit_conflict());
    Ok(())
}

#[sqlx::test(migrator = "marquee_core::MIGRATOR")]
async fn duplicate_email_is_a_unique_violation(pool: PgPool) -> Result<()> {
    let store = store(pool);
    let users = store.users();

    let user = NewUser {
        name: "Alice".into(),
        email: "alice@example.com".into(),
        password_hash: "$argon2id$placeholder".into(),
        activated: false,
    };
    let stored = users.insert(user.clone()).await?;
    assert_eq!(stored.version, RecordVersion::INITIAL);
    assert!(!stored.activated);

    let err = users
        .insert(NewUser {
            email: "ALICE@example.com".into(),
            ..user
        })
        .await
        .unwrap_err();
    assert!(err.is_unique_violation_on(USERS_EMAIL_CONSTRAINT), "{err:?}");

    let by_email = users.get_by_email("Alice@Example.com").await?;
    assert_eq!(by_email.id, stored.id);

    assert!(
        users
            .get_by_email("nobody@example.com")
            .await
            .unwrap_err()
            .is_not_found()
    );
    Ok(())
}

#[sqlx::test(migrator = "marquee_core::MIGRATOR")]
async fn activating_a_user_bumps_the_version(pool: PgPool) -> Result<()> {
    let store = store(pool);
    let users = store.users();

    let mut user = users
        .insert(NewUser {
            name: "Bob".into(),
            email: "bob@example.com".into(),
            password_hash: "$argon2id$placeholder".into(),
            activated: false,
        })
        .await?;
    user.activated = true;

    let saved = users.update(&user).await?;
    assert!(saved.activated);
    assert_eq!(saved.version, RecordVersion(2));
    assert!(users.get(saved.id).await?.activated);
    Ok(())
}
