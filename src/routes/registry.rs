//! Resource routes for developers and programming languages.

use crate::handlers::{developer, language};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn developer_routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/developer", get(developer::list).post(developer::create))
        .route(
            "/v1/developer/:id",
            get(developer::read)
                .put(developer::update)
                .delete(developer::delete),
        )
        .route(
            "/v1/developer/:id/languages",
            get(developer::list_languages).post(developer::add_language),
        )
        .with_state(state)
}

pub fn language_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/programming_language",
            get(language::list).post(language::create),
        )
        .route(
            "/v1/programming_language/:id",
            get(language::read)
                .put(language::update)
                .delete(language::delete),
        )
        .route(
            "/v1/programming_language/:id/developers",
            get(language::list_developers),
        )
        .with_state(state)
}
