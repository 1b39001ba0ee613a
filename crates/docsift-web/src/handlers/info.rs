//! `GET /` service description and `GET /health` liveness probe.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::Json;
use axum::extract::State;

use crate::models::{HealthResponse, ServiceInfo};
use crate::state::AppState;

pub async fn home(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo::current(state.max_upload_bytes))
}

pub async fn health() -> Json<HealthResponse> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    Json(HealthResponse {
        status: "healthy",
        timestamp,
    })
}
