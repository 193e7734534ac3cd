//! HTTP uploader for the session endpoint
//!
//! Screenshots go to the base URL as one multipart request with a `files`
//! part per image; text goes to `<base>/chat` as `{"message": ...}`.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use tracing::debug;

use crate::application::ports::{UploadError, Uploader};

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    message: &'a str,
}

/// Bearer-authenticated uploader
pub struct HttpUploader {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl HttpUploader {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url)
    }

    async fn build_form(files: &[PathBuf]) -> Result<Form, UploadError> {
        let mut form = Form::new();
        for path in files {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| UploadError::ReadFailed {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;

            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "screenshot.jpg".to_string());

            let part = Part::bytes(bytes)
                .file_name(file_name)
                .mime_str("image/jpeg")
                .map_err(|e| UploadError::RequestFailed(e.to_string()))?;
            form = form.part("files", part);
        }
        Ok(form)
    }

    /// Map a non-2xx response to `Rejected`
    async fn check(response: reqwest::Response) -> Result<(), UploadError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(UploadError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn upload_screenshots(&self, files: &[PathBuf]) -> Result<(), UploadError> {
        if files.is_empty() {
            return Err(UploadError::NothingToUpload);
        }

        let form = Self::build_form(files).await?;
        debug!(count = files.len(), url = %self.base_url, "uploading screenshots");

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::RequestFailed(e.to_string()))?;

        Self::check(response).await
    }

    async fn send_message(&self, text: &str) -> Result<(), UploadError> {
        let url = self.chat_url();
        debug!(chars = text.chars().count(), url = %url, "sending chat message");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&ChatMessage { message: text })
            .send()
            .await
            .map_err(|e| UploadError::RequestFailed(e.to_string()))?;

        Self::check(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let uploader = HttpUploader::new("http://localhost:8082/api/", "t");
        assert_eq!(uploader.base_url(), "http://localhost:8082/api");
        assert_eq!(uploader.chat_url(), "http://localhost:8082/api/chat");
    }

    #[test]
    fn chat_message_shape() {
        let json = serde_json::to_string(&ChatMessage { message: "hi" }).unwrap();
        assert_eq!(json, r#"{"message":"hi"}"#);
    }

    #[tokio::test]
    async fn empty_batch_is_rejected_locally() {
        let uploader = HttpUploader::new("http://127.0.0.1:9", "t");
        let err = uploader.upload_screenshots(&[]).await.unwrap_err();
        assert!(matches!(err, UploadError::NothingToUpload));
    }

    #[tokio::test]
    async fn unreadable_file_fails_before_sending() {
        let uploader = HttpUploader::new("http://127.0.0.1:9", "t");
        let err = uploader
            .upload_screenshots(&[PathBuf::from("/nonexistent/screenshot_0.jpg")])
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::ReadFailed { .. }));
    }
}
