use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tts_service::config::load_service_config;
use tts_service::model::{ModelHandle, ModelSlot, RemoteSpeechModel};
use tts_service::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_service_config().context("Failed to load service configuration")?;
    if config.jwt_secret_generated {
        warn!("JWT_SECRET_KEY not set; generated a per-process secret, tokens will not survive a restart");
    }

    info!(model = %config.model_name, url = %config.model_url, "Loading TTS model");
    let model = RemoteSpeechModel::connect(
        config.model_url.clone(),
        config.model_name.clone(),
        config.model_timeout,
    )
    .await
    .context("Failed to load TTS model")?;
    let models = ModelSlot::loaded(ModelHandle::new(Arc::new(model)));

    let addr = SocketAddr::from((config.host, config.port));
    let state = AppState::new(Arc::new(config), models)?;
    let app = router(state);

    info!(%addr, "starting tts-service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down server");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Unable to listen for shutdown signal");
    }
}
