//! Generation client error types.

use thiserror::Error;

pub type GenError<T> = Result<T, GenerationError>;

#[derive(Debug, Error)]
pub enum GenerationError {
    /// The provider rejected or errored the job
    #[error("Generation failed: {0}")]
    Failed(String),

    /// The polling budget elapsed before the job reached a terminal state
    #[error("Generation timed out after {waited_secs}s (budget {budget_secs}s)")]
    Timeout { waited_secs: u64, budget_secs: u64 },

    #[error("Invalid generation request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerationError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether a whole-run retry could plausibly succeed.
    ///
    /// A terminal provider failure is not retried automatically anywhere;
    /// this only informs the caller's own retry decision.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::Timeout { .. } | GenerationError::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_distinct_from_failure() {
        let timeout = GenerationError::Timeout {
            waited_secs: 300,
            budget_secs: 300,
        };
        assert!(timeout.is_retryable());
        assert!(timeout.to_string().contains("300"));

        let failed = GenerationError::failed("safety filter rejected prompt");
        assert!(!failed.is_retryable());
    }
}
