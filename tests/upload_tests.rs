//! Uploader integration tests against a mock session endpoint

use std::fs;

use ai_screenshooter::application::ports::{UploadError, Uploader};
use ai_screenshooter::infrastructure::HttpUploader;
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SESSION_PATH: &str = "/api/v1/sessions/code-challenge";

fn uploader(server: &MockServer) -> HttpUploader {
    HttpUploader::new(format!("{}{}", server.uri(), SESSION_PATH), "token-123")
}

#[tokio::test]
async fn screenshots_are_sent_as_multipart_files() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SESSION_PATH))
        .and(header("authorization", "Bearer token-123"))
        .and(body_string_contains("name=\"files\"; filename=\"screenshot_0.jpg\""))
        .and(body_string_contains("name=\"files\"; filename=\"screenshot_1.jpg\""))
        .and(body_string_contains("image/jpeg"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let first = dir.path().join("screenshot_0.jpg");
    let second = dir.path().join("screenshot_1.jpg");
    fs::write(&first, b"jpeg-0").unwrap();
    fs::write(&second, b"jpeg-1").unwrap();

    uploader(&server)
        .upload_screenshots(&[first, second])
        .await
        .unwrap();
}

#[tokio::test]
async fn text_goes_to_chat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}/chat", SESSION_PATH)))
        .and(header("authorization", "Bearer token-123"))
        .and(body_json(serde_json::json!({ "message": "fn main() {}" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    uploader(&server).send_message("fn main() {}").await.unwrap();
}

#[tokio::test]
async fn server_rejection_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}/chat", SESSION_PATH)))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .mount(&server)
        .await;

    let err = uploader(&server).send_message("hi").await.unwrap_err();
    match err {
        UploadError::Rejected { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "bad token");
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_request_failure() {
    let server = MockServer::start().await;
    let base = format!("{}{}", server.uri(), SESSION_PATH);
    drop(server);

    let err = HttpUploader::new(base, "t")
        .send_message("hi")
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::RequestFailed(_)));
}
