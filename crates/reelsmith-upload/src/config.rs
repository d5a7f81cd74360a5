//! Upload client configuration.

use std::time::Duration;

/// Configuration for the hosting provider client.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Long-lived refresh credential
    pub refresh_token: String,
    /// OAuth token endpoint base URL
    pub oauth_base_url: String,
    /// Resumable upload endpoint base URL
    pub upload_base_url: String,
    /// Category id applied to uploads
    pub category_id: String,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl UploadConfig {
    /// Build a config for the given credentials with default endpoints.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            oauth_base_url: "https://oauth2.googleapis.com".to_string(),
            upload_base_url: "https://www.googleapis.com/upload/youtube/v3".to_string(),
            category_id: "22".to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Create config from environment variables.
    ///
    /// Returns `None` unless the full OAuth credential triple is present;
    /// the pipeline maps an absent config to a `skipped` upload outcome.
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("YOUTUBE_CLIENT_ID").ok()?;
        let client_secret = std::env::var("YOUTUBE_CLIENT_SECRET").ok()?;
        let refresh_token = std::env::var("YOUTUBE_REFRESH_TOKEN").ok()?;

        Some(Self {
            client_id,
            client_secret,
            refresh_token,
            oauth_base_url: std::env::var("YOUTUBE_OAUTH_URL")
                .unwrap_or_else(|_| "https://oauth2.googleapis.com".to_string()),
            upload_base_url: std::env::var("YOUTUBE_UPLOAD_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com/upload/youtube/v3".to_string()),
            category_id: std::env::var("YOUTUBE_CATEGORY_ID").unwrap_or_else(|_| "22".to_string()),
            timeout: Duration::from_secs(
                std::env::var("YOUTUBE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
        })
    }
}
