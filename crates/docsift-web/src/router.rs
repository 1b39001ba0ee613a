//! Route table and middleware stack.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use docsift_core::BYTES_PER_MB;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // The body limit sits one mebibyte above the upload cap so multipart
    // framing overhead does not eat into it; the handler enforces the
    // exact cap on the decoded file bytes.
    let body_limit = (state.max_upload_bytes + BYTES_PER_MB) as usize;

    Router::new()
        .route("/", get(handlers::info::home))
        .route("/health", get(handlers::info::health))
        .route("/formats", get(handlers::formats::formats))
        .route("/extract", post(handlers::extract::extract))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
