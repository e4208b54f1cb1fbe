pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::feedback::handlers as feedback;
use crate::intake::handlers as intake;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/levels", get(feedback::handle_levels))
        .route(
            "/api/v1/students/upload",
            post(intake::handle_upload).layer(upload_limit),
        )
        .route(
            "/api/v1/reports/generate",
            post(feedback::handle_generate),
        )
        .route("/api/v1/reports/export", post(feedback::handle_export))
        // Path used by the original browser client
        .route("/api/generate", post(feedback::handle_generate))
        .with_state(state)
}
