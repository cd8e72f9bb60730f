//! HTTP server for the salesboard dashboard
//!
//! Exposes the upload-to-dashboard pipeline over a small JSON API plus a
//! single-page frontend. One POST turns a sales file into the cleaned
//! aggregates, four base64 PNG charts, and an AI-generated summary; a
//! second POST turns that summary into base64 MP3 audio.

pub mod prompt;
pub mod routes;
pub mod state;

pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the application router with all routes and middleware
pub fn router(state: AppState) -> Router {
    let upload_limit = state.max_upload_bytes();

    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/api/dashboard", post(routes::dashboard))
        .route("/api/speech", post(routes::speech))
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
