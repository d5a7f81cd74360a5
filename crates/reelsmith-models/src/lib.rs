//! Shared data models for the reelsmith content pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Content requests (generation + publish metadata)
//! - Generation jobs and asset descriptors
//! - Upload outcomes and the aggregated pipeline result

pub mod generation;
pub mod outcome;
pub mod publish;
pub mod request;

// Re-export common types
pub use generation::{
    AssetLocation, GenerationMetadata, GenerationResult, GenerationStatus, JobId,
};
pub use outcome::{PipelineResult, SkipReason, UploadOutcome};
pub use publish::{normalize_tags, PublishRequest, Visibility};
pub use request::{
    AspectRatio, AspectRatioParseError, ContentFactoryRequest, GenerationRequest,
    DEFAULT_DURATION_SECONDS, MAX_DURATION_SECONDS, MIN_DURATION_SECONDS,
};
