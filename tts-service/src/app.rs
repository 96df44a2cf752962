use std::sync::Arc;

use anyhow::Result;
use axum::extract::FromRef;
use chrono::Duration;
use common_auth::{CredentialStore, JwtConfig, JwtVerifier, TokenSigner};
use common_http_errors::HttpErrorMetrics;

use crate::config::ServiceConfig;
use crate::metrics::TtsMetrics;
use crate::model::ModelSlot;

pub const SERVICE_NAME: &str = "tts-service";

/// Everything a handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub credentials: Arc<CredentialStore>,
    pub token_signer: Arc<TokenSigner>,
    pub jwt_verifier: Arc<JwtVerifier>,
    pub models: ModelSlot,
    pub metrics: Arc<TtsMetrics>,
    pub error_metrics: Arc<HttpErrorMetrics>,
}

impl FromRef<AppState> for Arc<JwtVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_verifier.clone()
    }
}

impl FromRef<AppState> for Arc<TokenSigner> {
    fn from_ref(state: &AppState) -> Self {
        state.token_signer.clone()
    }
}

impl FromRef<AppState> for Arc<ServiceConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl AppState {
    pub fn new(config: Arc<ServiceConfig>, models: ModelSlot) -> Result<Self> {
        let jwt_config = JwtConfig::new(config.jwt_secret.as_bytes())
            .with_access_ttl(Duration::hours(config.access_ttl_hours))
            .with_leeway(config.jwt_leeway_seconds);

        let metrics = TtsMetrics::new()?;
        let error_metrics = HttpErrorMetrics::new(SERVICE_NAME, metrics.registry())?;

        Ok(Self {
            credentials: Arc::new(CredentialStore::new(
                config.username.clone(),
                config.password.clone(),
            )),
            token_signer: Arc::new(TokenSigner::new(jwt_config.clone())),
            jwt_verifier: Arc::new(JwtVerifier::new(jwt_config)),
            models,
            metrics: Arc::new(metrics),
            error_metrics: Arc::new(error_metrics),
            config,
        })
    }

    pub fn record_login_metric(&self, outcome: &str) {
        self.metrics.login_attempt(outcome);
    }

    pub fn record_synthesis_metric(&self, outcome: &str) {
        self.metrics.synthesis(outcome);
    }
}
