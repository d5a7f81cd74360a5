//! Content request definitions.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

use crate::publish::{normalize_tags, PublishRequest, Visibility};

/// Minimum accepted clip duration in seconds.
pub const MIN_DURATION_SECONDS: i64 = 3;
/// Maximum accepted clip duration in seconds.
pub const MAX_DURATION_SECONDS: i64 = 120;
/// Duration applied when the caller does not specify one.
pub const DEFAULT_DURATION_SECONDS: i64 = 15;

/// Target aspect ratio for generated video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum AspectRatio {
    /// 9:16 portrait, the short-form default
    #[default]
    #[serde(rename = "9:16")]
    Vertical,
    /// 16:9 landscape
    #[serde(rename = "16:9")]
    Widescreen,
    /// 1:1 square
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    /// The provider-facing ratio string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Vertical => "9:16",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Square => "1:1",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = AspectRatioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "9:16" | "vertical" | "portrait" => Ok(AspectRatio::Vertical),
            "16:9" | "widescreen" | "landscape" => Ok(AspectRatio::Widescreen),
            "1:1" | "square" => Ok(AspectRatio::Square),
            _ => Err(AspectRatioParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown aspect ratio: {0}")]
pub struct AspectRatioParseError(String);

/// Parameters submitted to the video generation provider.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Text prompt describing the clip
    pub prompt: String,

    /// Target aspect ratio
    #[serde(default)]
    pub aspect_ratio: AspectRatio,

    /// Clip length in seconds, valid range [3, 120]
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: i64,

    /// Things the provider should avoid rendering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,

    /// Named visual style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_preset: Option<String>,

    /// Soundtrack / audio direction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_prompt: Option<String>,
}

fn default_duration_seconds() -> i64 {
    DEFAULT_DURATION_SECONDS
}

impl GenerationRequest {
    /// Clamp the duration into the accepted range and trim the prompt.
    ///
    /// Out-of-range durations are coerced rather than rejected; an empty
    /// prompt is left for `ContentFactoryRequest::validate` (or the client's
    /// own guard) to refuse before any network call.
    pub fn normalized(mut self) -> Self {
        self.prompt = self.prompt.trim().to_string();
        self.duration_seconds = self
            .duration_seconds
            .clamp(MIN_DURATION_SECONDS, MAX_DURATION_SECONDS);
        self
    }
}

/// The full inbound request: generation parameters, publish metadata, and the
/// per-run switches.
///
/// The boundary layer is expected to have schema-validated this already; the
/// `Validate` derive re-checks the same minimums before the pipeline spends a
/// provider call on a bad request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContentFactoryRequest {
    #[validate(length(min = 1, message = "prompt must not be empty"))]
    pub prompt: String,

    #[serde(default)]
    pub aspect_ratio: AspectRatio,

    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_preset: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_prompt: Option<String>,

    /// Hosted video title
    #[validate(length(min = 3, message = "title must be at least 3 characters"))]
    pub title: String,

    /// Hosted video description
    #[validate(length(min = 10, message = "description must be at least 10 characters"))]
    pub description: String,

    /// Tags, deduplicated and `#`-stripped before upload
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub visibility: Visibility,

    /// Scheduled publish time; absent means publish immediately
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_at: Option<DateTime<Utc>>,

    /// Whether to push the finished asset to the hosting provider
    #[serde(default)]
    pub upload_to_youtube: bool,

    /// Keep the downloaded asset on disk after the run
    #[serde(default)]
    pub keep_local_file: bool,
}

impl ContentFactoryRequest {
    /// Extract the generation leg of the request, normalized.
    pub fn generation(&self) -> GenerationRequest {
        GenerationRequest {
            prompt: self.prompt.clone(),
            aspect_ratio: self.aspect_ratio,
            duration_seconds: self.duration_seconds,
            negative_prompt: self.negative_prompt.clone(),
            style_preset: self.style_preset.clone(),
            audio_prompt: self.audio_prompt.clone(),
        }
        .normalized()
    }

    /// Extract the publish leg of the request with normalized tags.
    pub fn publish(&self) -> PublishRequest {
        PublishRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            tags: normalize_tags(&self.tags),
            visibility: self.visibility,
            publish_at: self.publish_at,
        }
    }
}
