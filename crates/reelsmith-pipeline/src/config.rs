//! Factory configuration and mode selection.

use std::fmt;

use reelsmith_generation::GenerationConfig;
use reelsmith_upload::UploadConfig;

/// Which providers a run executes against. Decided once per factory and
/// applied to both legs; a run never mixes mock generation with live upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    /// Real provider clients
    Live,
    /// Deterministic local stand-ins, no network
    Mock,
}

impl PipelineMode {
    pub fn is_mock(&self) -> bool {
        matches!(self, PipelineMode::Mock)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineMode::Live => "live",
            PipelineMode::Mock => "mock",
        }
    }
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration injected into the factory constructor.
///
/// Leaf clients never read the environment themselves; everything ambient
/// flows in through this struct.
#[derive(Debug, Clone, Default)]
pub struct FactoryConfig {
    /// Force the mock provider even when credentials are present
    pub mock_mode: bool,
    /// Generation provider credentials; absent routes the run to the mock
    pub generation: Option<GenerationConfig>,
    /// Upload provider credentials; absent yields a `skipped` upload outcome
    pub upload: Option<UploadConfig>,
}

impl FactoryConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            mock_mode: std::env::var("MOCK_PIPELINE")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            generation: GenerationConfig::from_env(),
            upload: UploadConfig::from_env(),
        }
    }

    /// Resolve the execution mode: mock when forced, or when generation
    /// credentials are missing.
    pub fn mode(&self) -> PipelineMode {
        if self.mock_mode || self.generation.is_none() {
            PipelineMode::Mock
        } else {
            PipelineMode::Live
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_generation_credentials_route_to_mock() {
        let config = FactoryConfig::default();
        assert_eq!(config.mode(), PipelineMode::Mock);
    }

    #[test]
    fn mock_flag_overrides_credentials() {
        let config = FactoryConfig {
            mock_mode: true,
            generation: Some(GenerationConfig::new("key")),
            upload: None,
        };
        assert_eq!(config.mode(), PipelineMode::Mock);
    }

    #[test]
    fn credentials_without_flag_run_live() {
        let config = FactoryConfig {
            mock_mode: false,
            generation: Some(GenerationConfig::new("key")),
            upload: None,
        };
        assert_eq!(config.mode(), PipelineMode::Live);
    }
}
