mod support;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::http::StatusCode;
use httpmock::prelude::*;
use serde_json::json;
use support::TestContext;
use tts_service::model::{GenerateRequest, ModelError, ModelHandle, ModelSlot, RemoteSpeechModel, SpeechModel};
use tts_service::voices::Voice;

fn request(text: &str) -> GenerateRequest {
    GenerateRequest {
        text: text.to_string(),
        speaker: Voice::Aria,
        language: "English".to_string(),
        instruct: None,
    }
}

fn client(server: &MockServer) -> Result<RemoteSpeechModel> {
    Ok(RemoteSpeechModel::new(
        server.base_url(),
        "remote-test",
        Duration::from_secs(5),
    )?)
}

#[tokio::test]
async fn connect_probes_worker_health() -> Result<()> {
    let server = MockServer::start_async().await;
    let health = server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(200).json_body(json!({ "status": "ok" }));
        })
        .await;

    let model = RemoteSpeechModel::connect(server.base_url(), "remote-test", Duration::from_secs(5)).await?;

    health.assert_async().await;
    assert_eq!(model.name(), "remote-test");
    assert_eq!(model.base_url(), server.base_url());
    Ok(())
}

#[tokio::test]
async fn connect_fails_when_worker_is_unhealthy() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(503).body("warming up");
        })
        .await;

    let err = RemoteSpeechModel::connect(server.base_url(), "remote-test", Duration::from_secs(5))
        .await
        .err()
        .expect("unhealthy worker");

    match err {
        ModelError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "warming up");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn connect_fails_when_worker_is_unreachable() {
    let err = RemoteSpeechModel::connect("http://127.0.0.1:9", "remote-test", Duration::from_secs(2))
        .await
        .err()
        .expect("nothing listens on the discard port");
    assert!(matches!(err, ModelError::Transport(_)));
}

#[tokio::test]
async fn generate_posts_request_and_reads_samples() -> Result<()> {
    let server = MockServer::start_async().await;
    let generate = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/generate")
                .json_body(json!({ "text": "hi", "speaker": "Aria", "language": "English" }));
            then.status(200)
                .json_body(json!({ "samples": [0.0, 0.5, -0.5], "sample_rate": 24000 }));
        })
        .await;

    let audio = client(&server)?.generate(&request("hi")).await?;

    generate.assert_async().await;
    assert_eq!(audio.samples, vec![0.0, 0.5, -0.5]);
    assert_eq!(audio.sample_rate, 24_000);
    Ok(())
}

#[tokio::test]
async fn generate_forwards_instruct_when_present() -> Result<()> {
    let server = MockServer::start_async().await;
    let generate = server
        .mock_async(|when, then| {
            when.method(POST).path("/generate").json_body(json!({
                "text": "hi",
                "speaker": "Aria",
                "language": "English",
                "instruct": "whisper"
            }));
            then.status(200)
                .json_body(json!({ "samples": [0.1], "sample_rate": 16000 }));
        })
        .await;

    let mut req = request("hi");
    req.instruct = Some("whisper".to_string());
    client(&server)?.generate(&req).await?;

    generate.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn generate_maps_worker_failures() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/generate").body_contains("boom");
            then.status(500).body("CUDA out of memory");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/generate").body_contains("silence");
            then.status(200)
                .json_body(json!({ "samples": [], "sample_rate": 24000 }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/generate").body_contains("garbled");
            then.status(200).body("not json");
        })
        .await;
    let model = client(&server)?;

    match model.generate(&request("boom")).await {
        Err(ModelError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("out of memory"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches!(
        model.generate(&request("silence")).await,
        Err(ModelError::EmptyOutput)
    ));
    assert!(matches!(
        model.generate(&request("garbled")).await,
        Err(ModelError::Decode(_))
    ));
    Ok(())
}

#[tokio::test]
async fn remote_model_serves_the_http_endpoint() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/generate");
            then.status(200)
                .json_body(json!({ "samples": [0.0, 0.25, 0.5, 0.25], "sample_rate": 24000 }));
        })
        .await;

    let handle = ModelHandle::new(Arc::new(client(&server)?));
    let ctx = TestContext::build(support::test_config(&[]), ModelSlot::loaded(handle))?;
    let token = ctx.login_token().await?;

    let (status, _, body) = ctx
        .post_json("/api/tts", &json!({ "text": "hello", "voice": "Marcus" }), Some(&token))
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sample_rate"], 24_000);
    assert_eq!(body["format"], "wav");
    Ok(())
}
