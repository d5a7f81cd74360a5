//! Publish metadata for the hosting provider.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use validator::Validate;

/// Publication state of a hosted video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Visible to everyone
    Public,
    /// Visible to the owner only (the provider default)
    #[default]
    Private,
    /// Reachable by link, not listed
    Unlisted,
}

impl Visibility {
    /// The provider-facing privacy status string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Unlisted => "unlisted",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata for publishing a finished asset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    #[validate(length(min = 3))]
    pub title: String,

    #[validate(length(min = 10))]
    pub description: String,

    /// Already deduplicated and `#`-stripped (see [`normalize_tags`])
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub visibility: Visibility,

    /// Scheduled publish time; absent means publish immediately
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_at: Option<DateTime<Utc>>,
}

impl PublishRequest {
    /// Whether this request asks for a scheduled (future) publish.
    pub fn is_scheduled(&self) -> bool {
        self.publish_at.is_some()
    }
}

/// Strip leading `#`, trim whitespace, drop empties, and deduplicate while
/// preserving first-seen order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for tag in tags {
        let cleaned = tag.trim().trim_start_matches('#').trim().to_string();
        if cleaned.is_empty() {
            continue;
        }
        if seen.insert(cleaned.clone()) {
            result.push(cleaned);
        }
    }

    result
}
