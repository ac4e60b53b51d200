//! HttpMediaUploader -- [`MediaUploader`] for a third-party image host.
//!
//! Sends a multipart form (`file`, plus `upload_preset` when configured) to
//! the configured upload URL and reads the durable URL from the response
//! (`secure_url`, falling back to `url`).

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use larder_core::repository::media::MediaUploader;
use larder_types::config::MediaConfig;
use larder_types::error::{GatewayOperation, PersistenceError};

use super::{build_client, check_status, transport_error};

const OPERATION: GatewayOperation = GatewayOperation::UploadImage;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

impl UploadResponse {
    fn into_url(self) -> Option<String> {
        self.secure_url
            .or(self.url)
            .filter(|url| !url.trim().is_empty())
    }
}

pub struct HttpMediaUploader {
    client: reqwest::Client,
    upload_url: Option<String>,
    upload_preset: Option<String>,
    token: Option<SecretString>,
}

impl HttpMediaUploader {
    pub fn new(
        config: &MediaConfig,
        timeout_secs: u64,
        token: Option<SecretString>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            upload_url: config.upload_url.clone(),
            upload_preset: config.upload_preset.clone(),
            token,
        })
    }

    /// Whether an upload URL is configured at all.
    pub fn is_configured(&self) -> bool {
        self.upload_url.is_some()
    }
}

impl MediaUploader for HttpMediaUploader {
    async fn upload_image(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, PersistenceError> {
        let url = self
            .upload_url
            .as_deref()
            .ok_or_else(|| PersistenceError::new(OPERATION, "no media upload URL configured"))?;
        if bytes.is_empty() {
            return Err(PersistenceError::new(OPERATION, "image is empty"));
        }

        let size = bytes.len();
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let mut form = reqwest::multipart::Form::new().part("file", part);
        if let Some(preset) = &self.upload_preset {
            form = form.text("upload_preset", preset.clone());
        }

        let mut request = self.client.post(url).multipart(form);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        tracing::debug!(file_name, size, "uploading image");
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(OPERATION, e))?;
        let response = check_status(OPERATION, response).await?;

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| PersistenceError::new(OPERATION, format!("malformed response: {e}")))?;
        body.into_url()
            .ok_or_else(|| PersistenceError::new(OPERATION, "response carried no URL"))
    }
}
