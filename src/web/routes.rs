use axum::{
    middleware::from_fn_with_state,
    response::Redirect,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::core::app::AppState;
use crate::web::handlers::{auth, board, comment};
use crate::web::middleware::auth_middleware;

pub const LOGIN_PATH: &str = "/auth/login";

pub fn create_router(state: Arc<AppState>) -> Router {
    // Everything under /boards requires a logged-in caller; ownership checks
    // happen inside the board service.
    let protected = Router::new()
        .route("/boards", get(board::list_all))
        .route("/boards/notice", get(board::list_notice))
        .route("/boards/contest", get(board::list_contest))
        .route("/boards/kquestion", get(board::list_kquestion))
        .route("/boards/tutoring", get(board::list_tutoring))
        .route("/boards/dsum", get(board::list_dsum))
        .route("/boards/new", get(board::create_form).post(board::create))
        .route("/boards/:id", get(board::detail))
        .route("/boards/:id/edit", get(board::update_form).post(board::update))
        .route(
            "/boards/:id/delete",
            get(board::delete_form).post(board::delete),
        )
        .route("/boards/:id/comments", post(comment::create))
        .route("/auth/logout", post(auth::logout))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        // Root route
        .route("/", get(root))
        // Public routes (no auth required)
        .route(
            "/auth/register",
            get(auth::register_form).post(auth::register),
        )
        .route(LOGIN_PATH, get(auth::login_form).post(auth::login))
        .merge(protected)
        // Static files
        .nest_service("/static", ServeDir::new("static"))
        // Health check
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Redirect {
    Redirect::to("/boards")
}

async fn health_check() -> &'static str {
    "OK"
}
