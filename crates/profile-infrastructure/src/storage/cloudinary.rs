// ============================================================================
// Profile Infrastructure - Cloudinary Photo Store
// File: crates/profile-infrastructure/src/storage/cloudinary.rs
// ============================================================================
//! Photo storage backed by the Cloudinary upload API.
//!
//! Requests are signed with SHA-256, so the Cloudinary account must have its
//! signature algorithm set to SHA-256.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{error, info};

use profile_core::error::DomainError;
use profile_core::ports::{PhotoStore, PhotoUpload, UploadedPhoto};
use profile_shared::config::PhotoStorageSettings;

pub struct CloudinaryPhotoStore {
    client: reqwest::Client,
    settings: PhotoStorageSettings,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

/// `k1=v1&k2=v2` over the parameters sorted by key, as Cloudinary signs them.
fn string_to_sign(params: &[(&str, String)]) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(string_to_sign(params).as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

impl CloudinaryPhotoStore {
    pub fn new(settings: PhotoStorageSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{}",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.cloud_name,
            action
        )
    }

    /// Adds `api_key`, `timestamp` and `signature` to the signed parameters.
    fn signed_form(&self, params: Vec<(&'static str, String)>) -> Form {
        let mut params = params;
        params.push(("timestamp", Utc::now().timestamp().to_string()));
        let signature = sign(&params, &self.settings.api_secret);

        let mut form = Form::new()
            .text("api_key", self.settings.api_key.clone())
            .text("signature", signature);
        for (key, value) in params {
            form = form.text(key, value);
        }
        form
    }

    async fn send(&self, action: &str, form: Form) -> Result<reqwest::Response, DomainError> {
        let response = self
            .client
            .post(self.endpoint(action))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("Cloudinary {} request failed: {}", action, e);
                DomainError::StorageError(e.to_string())
            })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => format!("Photo storage responded with {}", status),
        };
        error!("Cloudinary {} rejected: {}", action, message);
        Err(DomainError::StorageError(message))
    }
}

#[async_trait]
impl PhotoStore for CloudinaryPhotoStore {
    async fn upload(&self, upload: PhotoUpload) -> Result<UploadedPhoto, DomainError> {
        let mut file = Part::bytes(upload.bytes.to_vec()).file_name(upload.file_name);
        if let Some(content_type) = upload.content_type {
            file = file
                .mime_str(&content_type)
                .map_err(|e| DomainError::StorageError(format!("Invalid content type: {}", e)))?;
        }

        let form = self
            .signed_form(vec![
                ("folder", self.settings.folder.clone()),
                ("transformation", self.settings.transformation.clone()),
            ])
            .part("file", file);

        let response = self.send("upload", form).await?;
        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| DomainError::StorageError(format!("Unreadable upload response: {}", e)))?;

        info!("Uploaded photo {}", body.public_id);
        Ok(UploadedPhoto {
            url: body.secure_url,
            public_id: Some(body.public_id),
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), DomainError> {
        let form = self.signed_form(vec![("public_id", public_id.to_string())]);

        let response = self.send("destroy", form).await?;
        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| DomainError::StorageError(format!("Unreadable destroy response: {}", e)))?;

        if body.result == "ok" {
            info!("Deleted photo {}", public_id);
            Ok(())
        } else {
            error!("Cloudinary could not delete {}: {}", public_id, body.result);
            Err(DomainError::StorageError(body.result))
        }
    }
}
