use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

pub const NOT_AUTHENTICATED_DETAIL: &str = "Not authenticated. Please log in.";
pub const INVALID_TOKEN_DETAIL: &str = "Invalid or expired token. Please log in again.";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header missing")]
    MissingAuthorization,
    #[error("authorization header malformed")]
    InvalidAuthorization,
    #[error("token verification failed: {0}")]
    Verification(String),
    #[error("token has no subject claim")]
    MissingSubject,
    #[error("invalid claim '{0}' with value '{1}'")]
    InvalidClaim(&'static str, String),
    #[error("malformed claim payload: {0}")]
    InvalidJson(String),
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl AuthError {
    /// Whether this failure stems from the caller's credentials rather than the server.
    pub fn is_unauthorized(&self) -> bool {
        !matches!(self, AuthError::Signing(_))
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        Self::Verification(value.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    detail: &'static str,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Every verification failure collapses into one message so clients
        // cannot tell an expired token from a forged one.
        let (status, code, detail) = match &self {
            AuthError::MissingAuthorization => (
                StatusCode::UNAUTHORIZED,
                "not_authenticated",
                NOT_AUTHENTICATED_DETAIL,
            ),
            AuthError::InvalidAuthorization
            | AuthError::Verification(_)
            | AuthError::MissingSubject
            | AuthError::InvalidClaim(_, _)
            | AuthError::InvalidJson(_) => {
                (StatusCode::UNAUTHORIZED, "invalid_token", INVALID_TOKEN_DETAIL)
            }
            AuthError::Signing(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_signing_failed",
                "Unable to issue authentication token.",
            ),
        };

        let mut response = (status, Json(ErrorBody { code, detail })).into_response();
        let headers = response.headers_mut();
        headers.insert("x-error-code", HeaderValue::from_static(code));
        if status == StatusCode::UNAUTHORIZED {
            headers.insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
