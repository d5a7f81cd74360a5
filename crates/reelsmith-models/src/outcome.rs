//! Upload outcomes and the aggregated pipeline result.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::generation::GenerationResult;
use crate::publish::Visibility;

/// Why the upload leg was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The caller did not ask for an upload
    NotRequested,
    /// The run executed against the mock provider
    MockMode,
    /// No upload credentials configured
    MissingCredentials,
    /// The generated asset is not in a completed state
    GenerationIncomplete,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NotRequested => "not requested",
            SkipReason::MockMode => "mock mode",
            SkipReason::MissingCredentials => "missing credentials",
            SkipReason::GenerationIncomplete => "generation incomplete",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What happened on the upload leg of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    /// The asset was handed to the hosting provider
    Uploaded {
        #[serde(rename = "videoId")]
        video_id: String,
        visibility: Visibility,
    },
    /// The upload leg was never attempted
    Skipped { reason: SkipReason },
    /// The upload was attempted and failed; the generated asset is unaffected
    Failed { cause: String },
}

impl UploadOutcome {
    pub fn uploaded(video_id: impl Into<String>, visibility: Visibility) -> Self {
        Self::Uploaded {
            video_id: video_id.into(),
            visibility,
        }
    }

    pub fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }

    pub fn failed(cause: impl Into<String>) -> Self {
        Self::Failed {
            cause: cause.into(),
        }
    }

    /// The wire-level `status` tag.
    pub fn status(&self) -> &'static str {
        match self {
            UploadOutcome::Uploaded { .. } => "uploaded",
            UploadOutcome::Skipped { .. } => "skipped",
            UploadOutcome::Failed { .. } => "failed",
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, UploadOutcome::Uploaded { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, UploadOutcome::Skipped { .. })
    }
}

/// The single object returned per pipeline run. Owns its nested results and
/// is never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    /// The generation leg, always present on a successful run
    pub video: GenerationResult,

    /// The upload leg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<UploadOutcome>,

    /// Wall-clock duration of the run in milliseconds
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_is_tagged_by_status() {
        let uploaded = UploadOutcome::uploaded("abc123", Visibility::Public);
        let value = serde_json::to_value(&uploaded).unwrap();
        assert_eq!(value["status"], "uploaded");
        assert_eq!(value["videoId"], "abc123");
        assert_eq!(value["visibility"], "public");

        let skipped = UploadOutcome::skipped(SkipReason::MockMode);
        let value = serde_json::to_value(&skipped).unwrap();
        assert_eq!(value["status"], "skipped");
        assert_eq!(value["reason"], "mock_mode");

        let failed = UploadOutcome::failed("quota exhausted");
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["cause"], "quota exhausted");
    }

    #[test]
    fn skip_reason_display_is_human_readable() {
        assert_eq!(SkipReason::NotRequested.to_string(), "not requested");
        assert_eq!(SkipReason::MockMode.to_string(), "mock mode");
        assert_eq!(
            SkipReason::MissingCredentials.to_string(),
            "missing credentials"
        );
    }

    #[test]
    fn outcome_round_trips() {
        let original = UploadOutcome::skipped(SkipReason::NotRequested);
        let json = serde_json::to_string(&original).unwrap();
        let decoded: UploadOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, original);
    }
}
