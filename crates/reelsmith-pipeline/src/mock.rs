//! Deterministic stand-ins for the provider clients.
//!
//! Used for offline development and credential-less operation. Results are
//! derived from the request contents alone, tagged so downstream consumers
//! can detect mock mode and adjust messaging.

use sha2::{Digest, Sha256};
use url::Url;

use reelsmith_models::{
    AssetLocation, GenerationMetadata, GenerationRequest, GenerationResult, GenerationStatus,
    JobId, PublishRequest,
};
use reelsmith_upload::UploadReceipt;

/// Network-free analog of both provider clients. Always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockProvider;

impl MockProvider {
    /// Produce a structurally valid generation result for the request.
    ///
    /// The job id is a digest of the prompt, so repeated runs of the same
    /// request are identical.
    pub fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        let digest = Sha256::digest(request.prompt.as_bytes());
        let job_id = JobId::from_string(format!("mock-{}", hex::encode(&digest[..6])));

        let uri: Url = format!("https://assets.mock.invalid/{job_id}.mp4")
            .parse()
            .expect("mock asset uri");

        GenerationResult {
            job_id,
            asset: AssetLocation::remote(uri),
            metadata: GenerationMetadata {
                mock: true,
                model: Some("mock".to_string()),
                operation: None,
            },
            status: GenerationStatus::Completed,
        }
    }

    /// Produce a synthetic upload receipt for the publish metadata.
    pub fn upload(&self, publish: &PublishRequest) -> UploadReceipt {
        let digest = Sha256::digest(publish.title.as_bytes());

        UploadReceipt {
            video_id: format!("mock-video-{}", hex::encode(&digest[..4])),
            visibility: publish.visibility,
        }
    }
}
