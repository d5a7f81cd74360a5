//! Hosting provider upload client.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use reelsmith_models::{AssetLocation, PublishRequest, Visibility};

use crate::config::UploadConfig;
use crate::error::{UploadError, UploadResult};
use crate::token::TokenCache;

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    /// Provider-assigned video id
    pub video_id: String,
    /// Terminal visibility of the hosted video
    pub visibility: Visibility,
}

/// Upload metadata resource, provider wire shape.
#[derive(Debug, Serialize)]
struct VideoResource {
    snippet: VideoSnippet,
    status: VideoStatusResource,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    description: String,
    tags: Vec<String>,
    category_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatusResource {
    privacy_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    publish_at: Option<DateTime<Utc>>,
    self_declared_made_for_kids: bool,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
}

/// Client for the video hosting provider's resumable upload API.
pub struct UploadClient {
    config: UploadConfig,
    http: Client,
    token: TokenCache,
}

impl UploadClient {
    /// Create a new upload client.
    pub fn new(config: UploadConfig) -> UploadResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(UploadError::Network)?;
        let token = TokenCache::new(http.clone(), config.clone());

        Ok(Self {
            config,
            http,
            token,
        })
    }

    /// Publish an asset with the given metadata.
    ///
    /// Acquires a fresh access token if the cached one is expired, then runs
    /// the resumable flow: a metadata init call, followed by a PUT of the
    /// payload to the session URL the provider hands back. One attempt per
    /// call; retry policy belongs to the caller.
    ///
    /// A scheduled `publish_at` overrides the requested visibility for the
    /// interim state: the video is created private and the provider flips it
    /// to the requested visibility when the schedule elapses.
    pub async fn upload(
        &self,
        asset: &AssetLocation,
        publish: &PublishRequest,
    ) -> UploadResult<UploadReceipt> {
        let access_token = self.token.get_token().await?;
        let payload = self.load_asset(asset).await?;

        let session_url = self.begin_session(&access_token, publish, payload.len()).await?;
        debug!(session_url = %session_url, "resumable upload session opened");

        let response = self
            .http
            .put(&session_url)
            .bearer_auth(&access_token)
            .header("Content-Type", "video/mp4")
            .body(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::from_status(status, &body));
        }

        let uploaded: UploadResponse = response.json().await?;
        info!(
            video_id = %uploaded.id,
            visibility = %publish.visibility,
            scheduled = publish.is_scheduled(),
            "asset uploaded"
        );

        Ok(UploadReceipt {
            video_id: uploaded.id,
            visibility: publish.visibility,
        })
    }

    /// Open a resumable upload session, returning the session URL.
    async fn begin_session(
        &self,
        access_token: &str,
        publish: &PublishRequest,
        payload_len: usize,
    ) -> UploadResult<String> {
        let url = format!(
            "{}/videos?uploadType=resumable&part=snippet,status",
            self.config.upload_base_url
        );

        let metadata = VideoResource {
            snippet: VideoSnippet {
                title: publish.title.clone(),
                description: publish.description.clone(),
                tags: publish.tags.clone(),
                category_id: self.config.category_id.clone(),
            },
            status: VideoStatusResource {
                // Scheduling takes precedence: a scheduled video must sit
                // private until the publish time elapses.
                privacy_status: if publish.is_scheduled() {
                    Visibility::Private.as_str().to_string()
                } else {
                    publish.visibility.as_str().to_string()
                },
                publish_at: publish.publish_at,
                self_declared_made_for_kids: false,
            },
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .header("X-Upload-Content-Type", "video/mp4")
            .header("X-Upload-Content-Length", payload_len.to_string())
            .json(&metadata)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::from_status(status, &body));
        }

        response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .ok_or_else(|| UploadError::upload("missing session URL in init response"))
    }

    /// Materialize the asset payload.
    async fn load_asset(&self, asset: &AssetLocation) -> UploadResult<Vec<u8>> {
        match asset {
            AssetLocation::File { path } => Ok(tokio::fs::read(path).await?),
            AssetLocation::Remote { uri } => {
                let response = self.http.get(uri.clone()).send().await?;
                if !response.status().is_success() {
                    return Err(UploadError::upload(format!(
                        "asset fetch returned {}",
                        response.status()
                    )));
                }
                Ok(response.bytes().await?.to_vec())
            }
        }
    }
}
