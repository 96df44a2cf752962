use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{GenerateRequest, GeneratedAudio, ModelError, SpeechModel};
use crate::voices::Voice;

/// Client for an inference worker that hosts the pretrained model.
///
/// The worker exposes `GET /health` and `POST /generate`; the latter takes
/// `{text, speaker, language, instruct}` and answers `{samples, sample_rate}`.
#[derive(Clone)]
pub struct RemoteSpeechModel {
    client: Client,
    base_url: String,
    name: String,
}

#[derive(Serialize)]
struct GeneratePayload<'a> {
    text: &'a str,
    speaker: Voice,
    language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    instruct: Option<&'a str>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl RemoteSpeechModel {
    pub fn new(base_url: impl Into<String>, name: impl Into<String>, timeout: Duration) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ModelError::Transport(err.to_string()))?;
        Ok(Self::with_client(client, base_url, name))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            name: name.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the client and waits for the worker to report healthy.
    pub async fn connect(
        base_url: impl Into<String>,
        name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let model = Self::new(base_url, name, timeout)?;
        model.probe().await?;
        info!(model = %model.name, url = %model.base_url, "model backend ready");
        Ok(model)
    }

    pub async fn probe(&self) -> Result<(), ModelError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|err| ModelError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ModelError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SpeechModel for RemoteSpeechModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedAudio, ModelError> {
        let payload = GeneratePayload {
            text: &request.text,
            speaker: request.speaker,
            language: &request.language,
            instruct: request.instruct.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/generate", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|err| ModelError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModelError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|err| ModelError::Decode(err.to_string()))?;

        if body.sample_rate == 0 {
            return Err(ModelError::Decode("sample_rate must be positive".into()));
        }
        if body.samples.is_empty() {
            return Err(ModelError::EmptyOutput);
        }

        debug!(samples = body.samples.len(), sample_rate = body.sample_rate, "model returned audio");
        Ok(GeneratedAudio {
            samples: body.samples,
            sample_rate: body.sample_rate,
        })
    }
}
