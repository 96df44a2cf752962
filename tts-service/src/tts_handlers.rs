use std::time::Instant;

use axum::{extract::State, Json};
use common_auth::AuthContext;
use common_http_errors::{ApiError, ApiJson, ApiResult};
use serde::{Deserialize, Serialize};
use tokio::task::AbortHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::audio::encode_wav_base64;
use crate::model::GenerateRequest;
use crate::voices::Voice;
use crate::AppState;

pub const DEFAULT_LANGUAGE: &str = "Auto";
const GENERATION_FAILED: &str = "Failed to generate speech. Please try again.";
const LOG_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    pub text: String,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub instruct: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TtsResponse {
    pub audio_base64: String,
    pub sample_rate: u32,
    pub format: &'static str,
}

pub async fn synthesize(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(request): ApiJson<TtsRequest>,
) -> ApiResult<Json<TtsResponse>> {
    let Some(model) = state.models.current().await else {
        state.record_synthesis_metric("unavailable");
        return Err(ApiError::service_unavailable("model_not_loaded", "Model not loaded"));
    };

    let text = request.text.trim();
    if text.is_empty() {
        state.record_synthesis_metric("rejected");
        return Err(ApiError::bad_request("text_required", "Text is required"));
    }
    let max_chars = state.config.max_text_chars;
    if text.chars().count() > max_chars {
        state.record_synthesis_metric("rejected");
        return Err(ApiError::bad_request(
            "text_too_long",
            format!("Text must be at most {max_chars} characters"),
        ));
    }

    let speaker = Voice::resolve(request.voice.as_deref());
    if request.voice.as_deref().is_some_and(|requested| requested != speaker.name()) {
        debug!(requested = ?request.voice, fallback = %speaker, "Unknown voice, using default");
    }

    let language = request
        .language
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_string();
    let instruct = request
        .instruct
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    let generate = GenerateRequest {
        text: text.to_string(),
        speaker,
        language,
        instruct,
    };

    info!(
        user = %auth.username,
        voice = %speaker,
        text = %preview(text),
        "Generating speech"
    );

    let started = Instant::now();
    // A panic in the backend surfaces as a JoinError. Dropping the handler
    // (client disconnect) aborts the call and releases the model lock.
    let task = tokio::spawn(async move { model.generate(&generate).await });
    let _cancel = AbortOnDrop(task.abort_handle());
    let audio = match task.await {
        Ok(Ok(audio)) => audio,
        Ok(Err(err)) => {
            let trace_id = Uuid::new_v4();
            state.record_synthesis_metric("failed");
            error!(%trace_id, error = %err, "TTS generation failed");
            return Err(ApiError::internal("synthesis_failed", trace_id, GENERATION_FAILED));
        }
        Err(join_err) => {
            let trace_id = Uuid::new_v4();
            state.record_synthesis_metric("aborted");
            error!(%trace_id, error = %join_err, "TTS generation task aborted unexpectedly");
            return Err(ApiError::internal("synthesis_aborted", trace_id, GENERATION_FAILED));
        }
    };
    let elapsed = started.elapsed().as_secs_f64();

    let audio_base64 = encode_wav_base64(&audio.samples, audio.sample_rate).map_err(|err| {
        let trace_id = Uuid::new_v4();
        state.record_synthesis_metric("encoding_failed");
        error!(%trace_id, error = %err, "Failed to encode generated audio");
        ApiError::internal("audio_encoding_failed", trace_id, GENERATION_FAILED)
    })?;

    state.record_synthesis_metric("success");
    state.metrics.observe_synthesis_seconds(elapsed);
    info!(
        audio_seconds = audio.duration_secs(),
        elapsed_seconds = elapsed,
        "Generated audio"
    );

    Ok(Json(TtsResponse {
        audio_base64,
        sample_rate: audio.sample_rate,
        format: "wav",
    }))
}

struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(LOG_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
