use axum::{extract::State, response::Response, Json};
use common_http_errors::{ApiError, ApiResult};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::voices::Voice;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub status: &'static str,
    pub model: String,
    pub speakers: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub model_loaded: bool,
}

#[derive(Debug, Serialize)]
pub struct VoiceEntry {
    pub name: &'static str,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct VoiceList {
    pub voices: Vec<VoiceEntry>,
}

pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    let model = match state.models.current().await {
        Some(handle) => handle.name().to_string(),
        None => state.config.model_name.clone(),
    };
    Json(ServiceInfo {
        status: "ok",
        model,
        speakers: Voice::names(),
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        model_loaded: state.models.is_loaded().await,
    })
}

pub async fn list_voices() -> Json<VoiceList> {
    let voices = Voice::ALL
        .iter()
        .map(|voice| VoiceEntry {
            name: voice.name(),
            id: voice.id(),
        })
        .collect();
    Json(VoiceList { voices })
}

pub async fn metrics(State(state): State<AppState>) -> ApiResult<Response> {
    state.metrics.render().map_err(|err| {
        let trace_id = Uuid::new_v4();
        error!(%trace_id, error = %err, "Unable to render metrics");
        ApiError::internal("metrics_unavailable", trace_id, "Unable to render metrics.")
    })
}
