pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::tailoring::handlers;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Tailoring API
        .route("/api/v1/tailor", post(handlers::handle_tailor))
        .route("/api/v1/render/:format", post(handlers::handle_render))
        .route(
            "/api/v1/layout/preview",
            post(handlers::handle_layout_preview),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
