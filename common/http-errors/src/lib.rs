use axum::{http::{header::WWW_AUTHENTICATE, StatusCode, HeaderValue}, response::{IntoResponse, Response}, Json};
use serde::Serialize;
use uuid::Uuid;

mod extract;
mod metrics;

pub use extract::ApiJson;
pub use metrics::{track_http_errors, HttpErrorMetrics};

pub const ERROR_CODE_HEADER: &str = "x-error-code";

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub code: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")] pub trace_id: Option<Uuid>,
}

#[derive(Debug)]
pub enum ApiError {
    Unauthorized { code: &'static str, detail: String },
    BadRequest { code: &'static str, detail: String },
    ServiceUnavailable { code: &'static str, detail: String },
    /// `detail` is shown to the client; the underlying cause is expected to be logged under `trace_id`.
    Internal { code: &'static str, trace_id: Option<Uuid>, detail: String },
}

impl ApiError {
    pub fn unauthorized(code: &'static str, detail: impl Into<String>) -> Self { Self::Unauthorized { code, detail: detail.into() } }
    pub fn bad_request(code: &'static str, detail: impl Into<String>) -> Self { Self::BadRequest { code, detail: detail.into() } }
    pub fn service_unavailable(code: &'static str, detail: impl Into<String>) -> Self { Self::ServiceUnavailable { code, detail: detail.into() } }
    pub fn internal(code: &'static str, trace_id: Uuid, detail: impl Into<String>) -> Self { Self::Internal { code, trace_id: Some(trace_id), detail: detail.into() } }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized { code, .. }
            | ApiError::BadRequest { code, .. }
            | ApiError::ServiceUnavailable { code, .. }
            | ApiError::Internal { code, .. } => code,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_code = self.code();
        let body = match self {
            ApiError::Unauthorized { code, detail }
            | ApiError::BadRequest { code, detail }
            | ApiError::ServiceUnavailable { code, detail } => ErrorBody { code: code.into(), detail, trace_id: None },
            ApiError::Internal { code, trace_id, detail } => ErrorBody { code: code.into(), detail, trace_id },
        };
        let mut resp = (status, Json(body)).into_response();
        if let Ok(val) = HeaderValue::from_str(error_code) {
            resp.headers_mut().insert(ERROR_CODE_HEADER, val);
        }
        if status == StatusCode::UNAUTHORIZED {
            resp.headers_mut().insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        resp
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
