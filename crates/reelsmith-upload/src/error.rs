//! Upload client error types.

use reqwest::StatusCode;
use thiserror::Error;

pub type UploadResult<T> = Result<T, UploadError>;

#[derive(Debug, Error)]
pub enum UploadError {
    /// Token acquisition/refresh rejected, or quota/permission denied
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The provider rejected the upload metadata
    #[error("Upload metadata rejected: {0}")]
    Validation(String),

    /// Transient or provider-side upload error
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl UploadError {
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    /// Classify a non-success provider response.
    ///
    /// Quota and permission rejections surface as `Auth`; malformed metadata
    /// as `Validation`; everything else is treated as a transient upload
    /// error eligible for a caller-level retry.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 | 403 => Self::auth(format!("provider returned {status}: {body}")),
            400 | 422 => Self::validation(format!("provider returned {status}: {body}")),
            _ => Self::upload(format!("provider returned {status}: {body}")),
        }
    }

    /// Whether a caller-level retry of the upload leg could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, UploadError::Upload(_) | UploadError::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(matches!(
            UploadError::from_status(StatusCode::FORBIDDEN, "quotaExceeded"),
            UploadError::Auth(_)
        ));
        assert!(matches!(
            UploadError::from_status(StatusCode::BAD_REQUEST, "invalidTitle"),
            UploadError::Validation(_)
        ));
        assert!(matches!(
            UploadError::from_status(StatusCode::INTERNAL_SERVER_ERROR, ""),
            UploadError::Upload(_)
        ));
    }

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(UploadError::upload("503").is_retryable());
        assert!(!UploadError::auth("bad refresh token").is_retryable());
        assert!(!UploadError::validation("title too short").is_retryable());
    }
}
