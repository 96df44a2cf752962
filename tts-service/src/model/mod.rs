//! Speech model abstraction.
//!
//! The service only depends on the `generate(text, options) -> (samples,
//! sample_rate)` contract; the inference itself happens behind
//! [`SpeechModel`].

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::voices::Voice;

mod remote;

pub use remote::RemoteSpeechModel;

/// One synthesis call as handed to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub text: String,
    pub speaker: Voice,
    pub language: String,
    pub instruct: Option<String>,
}

/// Mono floating point samples in `[-1.0, 1.0]`.
#[derive(Debug, Clone)]
pub struct GeneratedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl GeneratedAudio {
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model backend unreachable: {0}")]
    Transport(String),
    #[error("model backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model backend returned an unreadable payload: {0}")]
    Decode(String),
    #[error("model produced no audio")]
    EmptyOutput,
}

#[async_trait]
pub trait SpeechModel: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedAudio, ModelError>;
}

/// A loaded model plus the lock that keeps calls into it sequential.
pub struct ModelHandle {
    model: Arc<dyn SpeechModel>,
    gate: Mutex<()>,
}

impl ModelHandle {
    pub fn new(model: Arc<dyn SpeechModel>) -> Self {
        Self {
            model,
            gate: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        self.model.name()
    }

    pub async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedAudio, ModelError> {
        let _guard = self.gate.lock().await;
        self.model.generate(request).await
    }
}

/// Holds the model once startup has loaded it; empty until then.
#[derive(Clone, Default)]
pub struct ModelSlot {
    inner: Arc<RwLock<Option<Arc<ModelHandle>>>>,
}

impl ModelSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded(handle: ModelHandle) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(Arc::new(handle)))),
        }
    }

    pub async fn install(&self, handle: ModelHandle) {
        let mut guard = self.inner.write().await;
        *guard = Some(Arc::new(handle));
    }

    pub async fn current(&self) -> Option<Arc<ModelHandle>> {
        self.inner.read().await.clone()
    }

    pub async fn is_loaded(&self) -> bool {
        self.inner.read().await.is_some()
    }
}
