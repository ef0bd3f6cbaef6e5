use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    AppState,
    handlers::{directors, health, movies, users},
};

/// Create all v1 API routes
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/healthcheck", get(health::healthcheck))
        .merge(create_movie_routes())
        .merge(create_director_routes())
        .route("/users", post(users::register_user))
}

fn create_movie_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/movies",
            get(movies::list_movies).post(movies::create_movie),
        )
        .route(
            "/movies/{id}",
            get(movies::show_movie)
                .patch(movies::update_movie)
                .delete(movies::delete_movie),
        )
}

fn create_director_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/directors",
            get(directors::list_directors).post(directors::create_director),
        )
        .route(
            "/directors/{id}",
            get(directors::show_director)
                .patch(directors::update_director)
                .delete(directors::delete_director),
        )
}
