//! `GET /formats`: the supported-format catalog.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use docsift_core::format;

use crate::config::size_label;
use crate::models::{FormatCatalogResponse, SupportedFormats};
use crate::state::AppState;

pub async fn formats(State(state): State<Arc<AppState>>) -> Json<FormatCatalogResponse> {
    Json(FormatCatalogResponse {
        supported_formats: SupportedFormats::current(),
        total_formats: format::supported_format_count(),
        max_file_size: size_label(state.max_upload_bytes),
        note: "Some formats may require additional system dependencies",
    })
}
