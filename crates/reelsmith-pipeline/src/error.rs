//! Pipeline error types.
//!
//! Generation-leg failures abort a run and surface here. Upload-leg failures
//! never do: they are folded into the returned result as a `failed` outcome
//! so a successfully generated asset is not lost to a publishing error.

use thiserror::Error;

use reelsmith_generation::GenerationError;

pub type FactoryResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad input reached the core despite boundary checks
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Generation failed or timed out; no upload was attempted
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// A required component could not be constructed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
