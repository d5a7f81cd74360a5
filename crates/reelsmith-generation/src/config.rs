//! Generation client configuration.

use std::time::Duration;

/// Configuration for the generation provider client.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Provider API key
    pub api_key: String,
    /// Provider API base URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Initial delay between status polls (doubles up to `poll_max_interval`)
    pub poll_interval: Duration,
    /// Ceiling on the per-poll delay
    pub poll_max_interval: Duration,
    /// Hard ceiling on total wait for a job to reach a terminal state
    pub max_wait: Duration,
    /// Directory for assets downloaded with `keep_local`
    pub work_dir: String,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl GenerationConfig {
    /// Build a config for the given credentials with default tuning.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "veo-3.0-generate-001".to_string(),
            poll_interval: Duration::from_secs(5),
            poll_max_interval: Duration::from_secs(20),
            max_wait: Duration::from_secs(300),
            work_dir: "/tmp/reelsmith".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Create config from environment variables.
    ///
    /// Returns `None` when no API key is configured, which the pipeline
    /// treats as a signal to run against the mock provider.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GENERATION_API_KEY").ok()?;

        Some(Self {
            api_key,
            base_url: std::env::var("GENERATION_API_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string()),
            model: std::env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| "veo-3.0-generate-001".to_string()),
            poll_interval: Duration::from_secs(
                std::env::var("GENERATION_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            poll_max_interval: Duration::from_secs(
                std::env::var("GENERATION_POLL_MAX_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(20),
            ),
            max_wait: Duration::from_secs(
                std::env::var("GENERATION_MAX_WAIT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            work_dir: std::env::var("GENERATION_WORK_DIR")
                .unwrap_or_else(|_| "/tmp/reelsmith".to_string()),
            timeout: Duration::from_secs(
                std::env::var("GENERATION_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_bounded() {
        let config = GenerationConfig::new("key");
        assert!(config.poll_interval <= config.poll_max_interval);
        assert!(config.poll_max_interval < config.max_wait);
    }
}
