//! Generation job results and asset descriptors.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Unique identifier for a generation job, opaque to everything but the
/// provider that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provider-side job state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    /// Submitted, not yet terminal
    #[default]
    Pending,
    /// Job produced a retrievable asset
    Completed,
    /// Provider reported a terminal failure
    Failed,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Pending => "pending",
            GenerationStatus::Completed => "completed",
            GenerationStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more polling expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationStatus::Completed | GenerationStatus::Failed)
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the finished asset lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetLocation {
    /// Provider-hosted asset, fetchable over HTTP
    Remote { uri: Url },
    /// Asset downloaded to the local filesystem
    File { path: PathBuf },
}

impl AssetLocation {
    pub fn remote(uri: Url) -> Self {
        Self::Remote { uri }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// The remote URI, if this asset has not been localized.
    pub fn as_remote(&self) -> Option<&Url> {
        match self {
            AssetLocation::Remote { uri } => Some(uri),
            AssetLocation::File { .. } => None,
        }
    }

    /// The local path, if the asset was downloaded.
    pub fn as_file(&self) -> Option<&Path> {
        match self {
            AssetLocation::File { path } => Some(path),
            AssetLocation::Remote { .. } => None,
        }
    }
}

/// Provider detail attached to a generation result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    /// True when the result came from the deterministic mock provider
    pub mock: bool,

    /// Model identifier the provider used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Provider operation name backing the job
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

/// The outcome of one generation job. Immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub job_id: JobId,
    pub asset: AssetLocation,
    pub metadata: GenerationMetadata,
    pub status: GenerationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_terminality() {
        assert!(!GenerationStatus::Pending.is_terminal());
        assert!(GenerationStatus::Completed.is_terminal());
        assert!(GenerationStatus::Failed.is_terminal());
    }

    #[test]
    fn asset_location_accessors() {
        let remote = AssetLocation::remote("https://cdn.example.com/a.mp4".parse().unwrap());
        assert!(remote.as_remote().is_some());
        assert!(remote.as_file().is_none());

        let local = AssetLocation::file("/tmp/reelsmith/a.mp4");
        assert!(local.as_file().is_some());
        assert!(local.as_remote().is_none());
    }

    #[test]
    fn result_serializes_camel_case() {
        let result = GenerationResult {
            job_id: JobId::from_string("op-123"),
            asset: AssetLocation::remote("https://cdn.example.com/a.mp4".parse().unwrap()),
            metadata: GenerationMetadata {
                mock: true,
                model: Some("mock".to_string()),
                operation: None,
            },
            status: GenerationStatus::Completed,
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["jobId"], "op-123");
        assert_eq!(value["metadata"]["mock"], true);
        assert_eq!(value["status"], "completed");
    }
}
