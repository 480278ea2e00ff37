use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

/// Builds the application router; `static_dir` is served under `/static`.
pub fn router(state: Arc<AppState>, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/gender", get(handlers::gender_choice))
        .route("/gender/{gender}", get(handlers::gender_page))
        .route("/types/{type_name}", get(handlers::type_page))
        .route("/time-pokemon", get(handlers::time_pokemon))
        .route("/time-pokemon/spin", get(handlers::spin))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
