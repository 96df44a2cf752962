use axum::{extract::State, Json};
use common_http_errors::{ApiError, ApiJson, ApiResult};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(login): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let LoginRequest { username, password } = login;

    if !state.credentials.check(&username, &password) {
        state.record_login_metric("invalid");
        warn!(username = %username, "Rejected login attempt");
        return Err(ApiError::unauthorized(
            "invalid_credentials",
            "Incorrect username or password.",
        ));
    }

    let issued = state.token_signer.issue(&username).map_err(|err| {
        let trace_id = Uuid::new_v4();
        state.record_login_metric("error");
        error!(%trace_id, username = %username, error = %err, "Failed to issue access token");
        ApiError::internal(
            "token_signing_failed",
            trace_id,
            "Unable to issue authentication token.",
        )
    })?;

    state.record_login_metric("success");
    info!(username = %username, expires_at = %issued.expires_at, "Issued access token");

    Ok(Json(LoginResponse {
        access_token: issued.access_token,
        token_type: issued.token_type,
        expires_in: issued.expires_in,
    }))
}
