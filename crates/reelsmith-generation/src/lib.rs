//! HTTP client for the video generation provider.
//!
//! Submits a generation job, polls the provider's long-running operation
//! until it reaches a terminal state, and resolves the finished asset.

pub mod client;
pub mod config;
pub mod error;

pub use client::GenerationClient;
pub use config::GenerationConfig;
pub use error::{GenError, GenerationError};
