// src/routes.rs

use axum::{Router, routing::post};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{handlers::quiz, state::AppState};

/// Assembles the main application router.
///
/// * `POST /submit` grades a submission.
/// * `/images` serves the media referenced by result emails.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    // The quiz page may be hosted anywhere; the original deployment allowed every origin.
    let cors = CorsLayer::permissive();

    let images = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/submit", post(quiz::submit_answers))
        .nest_service("/images", images)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
