//! Input checks for records before they are written.

use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use marquee_model::{Director, Movie, NewDirector, NewMovie};
use regex::Regex;

use crate::query::{ValidationErrors, validation::unique};

static EMAIL_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// First year a motion picture could have been released.
const EARLIEST_FILM_YEAR: i32 = 1888;
const MAX_TITLE_BYTES: usize = 500;
const MAX_NAME_BYTES: usize = 200;
const MAX_GENRES: usize = 5;
const MIN_PASSWORD_BYTES: usize = 8;
/// Upper bound on plaintext password length.
const MAX_PASSWORD_BYTES: usize = 72;

fn check_movie_fields(
    errors: &mut ValidationErrors,
    title: &str,
    year: i32,
    runtime: i32,
    genres: &[String],
) {
    errors.check(!title.trim().is_empty(), "title", "must be provided");
    errors.check(
        title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 500 bytes long",
    );

    errors.check(year != 0, "year", "must be provided");
    errors.check(year >= EARLIEST_FILM_YEAR, "year", "must be greater than 1888");
    errors.check(
        year <= Utc::now().year(),
        "year",
        "must not be in the future",
    );

    errors.check(runtime != 0, "runtime", "must be provided");
    errors.check(runtime > 0, "runtime", "must be a positive integer");

    errors.check(!genres.is_empty(), "genres", "must contain at least 1 genre");
    errors.check(
        genres.len() <= MAX_GENRES,
        "genres",
        "must not contain more than 5 genres",
    );
    errors.check(unique(genres), "genres", "must not contain duplicate values");
}

pub fn validate_new_movie(movie: &NewMovie) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_movie_fields(
        &mut errors,
        &movie.title,
        movie.year,
        movie.runtime,
        &movie.genres,
    );
    errors.into_result(())
}

pub fn validate_movie(movie: &Movie) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_movie_fields(
        &mut errors,
        &movie.title,
        movie.year,
        movie.runtime,
        &movie.genres,
    );
    errors.into_result(())
}

fn check_director_fields(
    errors: &mut ValidationErrors,
    name: &str,
    surname: &str,
    awards: &[String],
) {
    errors.check(!name.trim().is_empty(), "name", "must be provided");
    errors.check(
        name.len() <= MAX_NAME_BYTES,
        "name",
        "must not be more than 200 bytes long",
    );
    errors.check(!surname.trim().is_empty(), "surname", "must be provided");
    errors.check(
        surname.len() <= MAX_NAME_BYTES,
        "surname",
        "must not be more than 200 bytes long",
    );
    errors.check(unique(awards), "awards", "must not contain duplicate values");
}

pub fn validate_new_director(
    director: &NewDirector,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_director_fields(
        &mut errors,
        &director.name,
        &director.surname,
        &director.awards,
    );
    errors.into_result(())
}

pub fn validate_director(director: &Director) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_director_fields(
        &mut errors,
        &director.name,
        &director.surname,
        &director.awards,
    );
    errors.into_result(())
}

pub fn check_email(errors: &mut ValidationErrors, email: &str) {
    errors.check(!email.is_empty(), "email", "must be provided");
    errors.check(
        EMAIL_RX.is_match(email),
        "email",
        "must be a valid email address",
    );
}

pub fn check_password_plaintext(errors: &mut ValidationErrors, password: &str) {
    errors.check(!password.is_empty(), "password", "must be provided");
    errors.check(
        password.len() >= MIN_PASSWORD_BYTES,
        "password",
        "must be at least 8 bytes long",
    );
    errors.check(
        password.len() <= MAX_PASSWORD_BYTES,
        "password",
        "must not be more than 72 bytes long",
    );
}

/// Checks a registration before the password is hashed.
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(!name.trim().is_empty(), "name", "must be provided");
    errors.check(
        name.len() <= MAX_TITLE_BYTES,
        "name",
        "must not be more than 500 bytes long",
    );
    check_email(&mut errors, email);
    check_password_plaintext(&mut errors, password);
    errors.into_result(())
}
