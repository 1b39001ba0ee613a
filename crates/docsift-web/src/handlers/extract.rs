//! `POST /extract`: the main extraction endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};

use crate::config::size_label;
use crate::models::{self, ExtractResponse};
use crate::state::AppState;
use crate::upload;

pub async fn extract(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let uploaded = match upload::read_upload(&mut multipart).await {
        Ok(uploaded) => uploaded,
        Err(err) => {
            tracing::debug!(error = %err, "rejected multipart form");
            return models::upload_failure(err, &size_label(state.max_upload_bytes))
                .into_response();
        }
    };

    // Enforced here so the pipeline never sees an oversized buffer.
    if uploaded.bytes.len() as u64 > state.max_upload_bytes {
        tracing::info!(
            filename = %uploaded.filename,
            size = uploaded.bytes.len(),
            "rejected oversized upload"
        );
        return models::payload_too_large(&size_label(state.max_upload_bytes)).into_response();
    }

    match state
        .pipeline
        .extract(&uploaded.filename, &uploaded.bytes)
        .await
    {
        Ok(result) => Json(ExtractResponse::new(uploaded.filename, result)).into_response(),
        Err(err) => models::extraction_failure(err).into_response(),
    }
}
