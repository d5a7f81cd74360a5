//! HTTP client for the video hosting provider.
//!
//! Handles OAuth2 refresh-token exchange behind a cached access token,
//! and the resumable two-step upload (metadata init, then payload PUT)
//! with visibility and scheduled-publish semantics.

pub mod client;
pub mod config;
pub mod error;
pub mod token;

pub use client::{UploadClient, UploadReceipt};
pub use config::UploadConfig;
pub use error::{UploadError, UploadResult};
pub use token::TokenCache;
