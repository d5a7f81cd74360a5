//! Access token caching for the hosting provider.
//!
//! Provides a thread-safe, async-aware token cache with:
//! - Refresh margin to avoid token expiry during requests
//! - Single-flight pattern to prevent thundering herd on refresh
//! - Graceful fallback to the existing valid token on refresh failure

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::UploadConfig;
use crate::error::{UploadError, UploadResult};

// =============================================================================
// Constants
// =============================================================================

/// Refresh margin: refresh the token 60 seconds before expiry.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Conservative token TTL when the provider omits `expires_in` (50 minutes).
/// OAuth access tokens are typically valid for 60 minutes.
const TOKEN_DEFAULT_TTL: Duration = Duration::from_secs(50 * 60);

// =============================================================================
// Token Cache
// =============================================================================

/// Successful refresh-token exchange response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

/// Cached token with expiration tracking.
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    /// Check if the token is still valid with refresh margin.
    fn is_valid(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }

    /// Check if the token is technically still usable (even if refresh is needed).
    fn is_usable(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Thread-safe token cache with single-flight refresh.
pub struct TokenCache {
    http: Client,
    config: UploadConfig,
    cache: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    /// Create a new token cache.
    pub fn new(http: Client, config: UploadConfig) -> Self {
        Self {
            http,
            config,
            cache: RwLock::new(None),
        }
    }

    /// Invalidate the cached token.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        *cache = None;
    }

    /// Get a valid access token, refreshing if necessary.
    ///
    /// This method implements the single-flight pattern:
    /// - Fast path: return the cached token if still valid
    /// - Slow path: acquire the write lock and refresh (double-check first)
    /// - Fallback: on refresh failure, use the existing token if still usable
    pub async fn get_token(&self) -> UploadResult<String> {
        // Fast path: check read lock first
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        // Slow path: acquire write lock and refresh
        let mut cache = self.cache.write().await;

        // Double-check: another task may have refreshed while we waited
        if let Some(cached) = cache.as_ref() {
            if cached.is_valid() {
                return Ok(cached.access_token.clone());
            }
        }

        self.refresh_token(&mut cache).await
    }

    /// Exchange the refresh credential for a new access token.
    async fn refresh_token(&self, cache: &mut Option<CachedToken>) -> UploadResult<String> {
        let url = format!("{}/token", self.config.oauth_base_url);

        let refresh_result = self
            .http
            .post(&url)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", self.config.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await;

        let failure = match refresh_result {
            Ok(response) if response.status().is_success() => {
                let token: TokenResponse = response.json().await?;
                let ttl = token
                    .expires_in
                    .map(Duration::from_secs)
                    .unwrap_or(TOKEN_DEFAULT_TTL);

                *cache = Some(CachedToken {
                    access_token: token.access_token.clone(),
                    expires_at: Instant::now() + ttl,
                });

                debug!(ttl_secs = ttl.as_secs(), "refreshed hosting provider access token");
                return Ok(token.access_token);
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                format!("token endpoint returned {status}: {body}")
            }
            Err(e) => format!("token endpoint unreachable: {e}"),
        };

        // On refresh failure, check if the existing token is still usable
        if let Some(cached) = cache.as_ref() {
            if cached.is_usable() {
                warn!("token refresh failed, using existing token: {}", failure);
                return Ok(cached.access_token.clone());
            }
        }

        Err(UploadError::auth(format!(
            "failed to obtain access token: {failure}"
        )))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(oauth_base_url: String) -> UploadConfig {
        UploadConfig {
            oauth_base_url,
            ..UploadConfig::new("client-id", "client-secret", "refresh-token")
        }
    }

    fn cache_for(server: &MockServer) -> TokenCache {
        TokenCache::new(Client::new(), test_config(server.uri()))
    }

    #[test]
    fn refresh_margin_is_conservative() {
        assert_eq!(TOKEN_REFRESH_MARGIN, Duration::from_secs(60));
        assert!(TOKEN_DEFAULT_TTL < Duration::from_secs(60 * 60));
    }

    #[tokio::test]
    async fn token_is_cached_across_calls() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "token-a",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cache = cache_for(&server);
        assert_eq!(cache.get_token().await.unwrap(), "token-a");
        assert_eq!(cache.get_token().await.unwrap(), "token-a");
    }

    #[tokio::test]
    async fn refresh_failure_with_empty_cache_is_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })),
            )
            .mount(&server)
            .await;

        let cache = cache_for(&server);
        let err = cache.get_token().await.unwrap_err();
        assert!(matches!(err, UploadError::Auth(_)));
        assert!(err.to_string().contains("invalid_grant"));
    }

    #[tokio::test]
    async fn refresh_failure_falls_back_to_usable_token() {
        let server = MockServer::start().await;

        // First exchange succeeds with a token inside the refresh margin:
        // usable, but due for refresh on the next call.
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "token-a",
                "expires_in": 30
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let cache = cache_for(&server);
        assert_eq!(cache.get_token().await.unwrap(), "token-a");
        // Second call attempts a refresh, hits the 500, and falls back.
        assert_eq!(cache.get_token().await.unwrap(), "token-a");
    }

    #[tokio::test]
    async fn invalidate_forces_refresh() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "token-a",
                "expires_in": 3600
            })))
            .expect(2)
            .mount(&server)
            .await;

        let cache = cache_for(&server);
        cache.get_token().await.unwrap();
        cache.invalidate().await;
        cache.get_token().await.unwrap();
    }
}
