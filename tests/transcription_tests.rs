//! Gemini transcriber tests against a mock API

use std::fs;

use ai_screenshooter::application::ports::{TranscriptionError, Transcriber};
use ai_screenshooter::infrastructure::GeminiTranscriber;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/v1beta/models/test-model:generateContent";

fn transcriber(server: &MockServer) -> GeminiTranscriber {
    GeminiTranscriber::new("key-abc")
        .with_model("test-model")
        .with_base_url(format!("{}/v1beta/models", server.uri()))
}

fn audio_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("recording_1.flac");
    fs::write(&path, b"fLaC-not-really").unwrap();
    path
}

fn text_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    })
}

#[tokio::test]
async fn transcript_is_returned_trimmed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(query_param("key", "key-abc"))
        .and(body_string_contains("audio/flac"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("  two sum please \n")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let text = transcriber(&server)
        .transcribe(&audio_file(&dir))
        .await
        .unwrap();
    assert_eq!(text, "two sum please");
}

#[tokio::test]
async fn forbidden_is_invalid_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = transcriber(&server)
        .transcribe(&audio_file(&dir))
        .await
        .unwrap_err();
    assert!(matches!(err, TranscriptionError::InvalidApiKey));
}

#[tokio::test]
async fn too_many_requests_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = transcriber(&server)
        .transcribe(&audio_file(&dir))
        .await
        .unwrap_err();
    assert!(matches!(err, TranscriptionError::RateLimited));
}

#[tokio::test]
async fn blank_transcript_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("   ")))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = transcriber(&server)
        .transcribe(&audio_file(&dir))
        .await
        .unwrap_err();
    assert!(matches!(err, TranscriptionError::EmptyResponse));
}

/// Requires a real GEMINI_API_KEY
#[tokio::test]
#[ignore = "Requires GEMINI_API_KEY and network access"]
async fn live_api_accepts_request() {
    let Ok(key) = std::env::var("GEMINI_API_KEY") else {
        return;
    };
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recording_live.flac");
    let samples = vec![0i16; 16_000];
    let encoded = ai_screenshooter::infrastructure::recording::encode_to_flac(&samples, 16_000).unwrap();
    fs::write(&path, encoded).unwrap();

    let result = GeminiTranscriber::new(key).transcribe(&path).await;
    assert!(!matches!(result, Err(TranscriptionError::InvalidApiKey)));
}
