#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header::AUTHORIZATION, header::CONTENT_TYPE, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;
use tts_service::config::{config_from_lookup, ServiceConfig};
use tts_service::model::{GenerateRequest, GeneratedAudio, ModelError, ModelHandle, ModelSlot, SpeechModel};
use tts_service::{router, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_USERNAME: &str = "vocably";
pub const TEST_PASSWORD: &str = "vocably2026";

pub enum StubBehaviour {
    Audio { samples: usize, sample_rate: u32 },
    Fail(fn() -> ModelError),
    Panic,
    /// Never finishes; `in_flight` counts calls that have not been dropped.
    Hang,
}

/// In-process stand-in for the inference backend.
pub struct StubModel {
    behaviour: StubBehaviour,
    pub calls: Mutex<Vec<GenerateRequest>>,
    pub in_flight: AtomicUsize,
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl StubModel {
    pub fn new(behaviour: StubBehaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
        })
    }

    pub fn audio() -> Arc<Self> {
        Self::new(StubBehaviour::Audio {
            samples: 2_400,
            sample_rate: 24_000,
        })
    }

    pub fn last_call(&self) -> Option<GenerateRequest> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechModel for StubModel {
    fn name(&self) -> &str {
        "stub-model"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedAudio, ModelError> {
        self.calls.lock().unwrap().push(request.clone());
        match &self.behaviour {
            StubBehaviour::Audio { samples, sample_rate } => Ok(GeneratedAudio {
                samples: (0..*samples).map(|i| ((i as f32) * 0.01).sin() * 0.5).collect(),
                sample_rate: *sample_rate,
            }),
            StubBehaviour::Fail(make) => Err(make()),
            StubBehaviour::Panic => panic!("stub model exploded"),
            StubBehaviour::Hang => {
                let _in_flight = InFlight::enter(&self.in_flight);
                std::future::pending::<Result<GeneratedAudio, ModelError>>().await
            }
        }
    }
}

pub fn test_config(overrides: &[(&str, &str)]) -> ServiceConfig {
    let mut values: HashMap<String, String> = HashMap::from([
        ("JWT_SECRET_KEY".to_string(), TEST_SECRET.to_string()),
        ("VOCABLY_USERNAME".to_string(), TEST_USERNAME.to_string()),
        ("VOCABLY_PASSWORD".to_string(), TEST_PASSWORD.to_string()),
    ]);
    for (key, value) in overrides {
        values.insert(key.to_string(), value.to_string());
    }
    config_from_lookup(|key| values.get(key).cloned()).expect("test config")
}

pub struct TestContext {
    pub state: AppState,
    pub app: Router,
}

impl TestContext {
    pub fn with_model(model: Arc<StubModel>) -> Result<Self> {
        Self::build(test_config(&[]), ModelSlot::loaded(ModelHandle::new(model)))
    }

    pub fn without_model() -> Result<Self> {
        Self::build(test_config(&[]), ModelSlot::new())
    }

    pub fn build(config: ServiceConfig, models: ModelSlot) -> Result<Self> {
        let state = AppState::new(Arc::new(config), models)?;
        let app = router(state.clone());
        Ok(Self { state, app })
    }

    pub async fn send(&self, request: Request<Body>) -> Result<(StatusCode, axum::http::HeaderMap, Value)> {
        let response = self.app.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await?.to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Ok((status, headers, body))
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, axum::http::HeaderMap, Value)> {
        self.send(Request::builder().uri(uri).body(Body::empty())?).await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        body: &Value,
        bearer: Option<&str>,
    ) -> Result<(StatusCode, axum::http::HeaderMap, Value)> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string()))?).await
    }

    pub async fn login_token(&self) -> Result<String> {
        let (status, _, body) = self
            .post_json(
                "/login",
                &serde_json::json!({ "username": TEST_USERNAME, "password": TEST_PASSWORD }),
                None,
            )
            .await?;
        if status != StatusCode::OK {
            return Err(anyhow!("login failed with {status}: {body}"));
        }
        body["access_token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("missing access_token in {body}"))
    }
}
