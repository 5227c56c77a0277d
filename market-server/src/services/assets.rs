//! Asset Host integration
//!
//! Uploads validated image bytes to the external asset host and returns
//! the hosted URL. Files are sent as base64 data URIs in a form upload,
//! which every major image host accepts.

use base64::Engine;

use crate::utils::{AppError, ErrorCode};

/// Client for the external image hosting service
#[derive(Debug, Clone)]
pub struct AssetHost {
    http: reqwest::Client,
    upload_url: String,
    upload_preset: String,
}

impl AssetHost {
    pub fn new(upload_url: String, upload_preset: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            upload_url,
            upload_preset,
        }
    }

    /// Upload image bytes and return the hosted URL
    pub async fn upload(&self, bytes: &[u8], content_type: &str) -> Result<String, AppError> {
        let data_uri = format!(
            "data:{};base64,{}",
            content_type,
            base64::engine::general_purpose::STANDARD.encode(bytes)
        );

        let resp: serde_json::Value = self
            .http
            .post(&self.upload_url)
            .form(&[
                ("file", data_uri),
                ("upload_preset", self.upload_preset.clone()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::dependency(
                    ErrorCode::AssetHostError,
                    format!("Asset host request failed: {e}"),
                )
            })?
            .json()
            .await
            .map_err(|e| {
                AppError::dependency(
                    ErrorCode::AssetHostError,
                    format!("Asset host returned an unreadable response: {e}"),
                )
            })?;

        resp["secure_url"]
            .as_str()
            .or_else(|| resp["url"].as_str())
            .map(String::from)
            .ok_or_else(|| {
                AppError::dependency(
                    ErrorCode::AssetHostError,
                    format!("Asset host upload failed: {resp}"),
                )
            })
    }
}
