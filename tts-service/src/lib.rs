pub mod app;
pub mod audio;
pub mod config;
pub mod info_handlers;
pub mod login_handlers;
pub mod metrics;
pub mod model;
pub mod tts_handlers;
pub mod voices;

pub use app::AppState;
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use common_http_errors::track_http_errors;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use info_handlers::{health, list_voices, metrics as metrics_endpoint, root};
use login_handlers::login;
use tts_handlers::synthesize;

pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE, AUTHORIZATION])
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/voices", get(list_voices))
        .route("/metrics", get(metrics_endpoint))
        .route("/login", post(login))
        .route("/api/tts", post(synthesize))
        .layer(middleware::from_fn_with_state(
            state.error_metrics.clone(),
            track_http_errors,
        ))
        .layer(cors)
        .with_state(state)
}
