use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/leads", get(handlers::get_leads))
        .route("/leads/add", post(handlers::add_leads))
        .route("/leads/target", put(handlers::update_target))
        .route("/leads/undo", post(handlers::undo))
        .route("/leads/redo", post(handlers::redo))
        .route("/leads/reset", post(handlers::reset))
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/refresh", post(handlers::refresh));

    Router::new()
        .route("/", get(handlers::index))
        .nest("/api", api)
        .with_state(state)
}
