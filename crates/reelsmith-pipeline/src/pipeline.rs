//! Content run orchestration.

use std::time::Instant;

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use reelsmith_generation::GenerationClient;
use reelsmith_models::{
    ContentFactoryRequest, GenerationStatus, PipelineResult, SkipReason, UploadOutcome,
};
use reelsmith_upload::UploadClient;

use crate::config::{FactoryConfig, PipelineMode};
use crate::error::{FactoryResult, PipelineError};
use crate::mock::MockProvider;

/// The orchestrator: one instance drives any number of sequential runs
/// against a fixed configuration.
pub struct ContentFactory {
    mode: PipelineMode,
    generator: Option<GenerationClient>,
    uploader: Option<UploadClient>,
    mock: MockProvider,
}

impl ContentFactory {
    /// Build the factory, resolving the execution mode once.
    ///
    /// Live clients are only constructed when the mode calls for them, so a
    /// mock-mode factory carries no credentials at all.
    pub fn new(config: FactoryConfig) -> FactoryResult<Self> {
        let mode = config.mode();

        let generator = match (mode, config.generation) {
            (PipelineMode::Live, Some(cfg)) => Some(GenerationClient::new(cfg)?),
            _ => None,
        };

        let uploader = match (mode, config.upload) {
            (PipelineMode::Live, Some(cfg)) => {
                Some(UploadClient::new(cfg).map_err(|e| PipelineError::config(e.to_string()))?)
            }
            _ => None,
        };

        Ok(Self {
            mode,
            generator,
            uploader,
            mock: MockProvider,
        })
    }

    /// The mode this factory resolved to.
    pub fn mode(&self) -> PipelineMode {
        self.mode
    }

    /// Drive one request end to end.
    ///
    /// Generation must complete before the upload leg is considered; a
    /// generation failure aborts the run with no upload attempt. An upload
    /// failure does not: it is captured inside the returned result so the
    /// caller keeps the generated asset and can retry publishing on its own.
    pub async fn run(&self, request: &ContentFactoryRequest) -> FactoryResult<PipelineResult> {
        let started = Instant::now();
        let run_id = Uuid::new_v4();

        request
            .validate()
            .map_err(|e| PipelineError::validation(e.to_string()))?;

        let generation_request = request.generation();
        let publish = request.publish();

        info!(
            run_id = %run_id,
            mode = %self.mode,
            aspect = %generation_request.aspect_ratio,
            duration_secs = generation_request.duration_seconds,
            "starting content run"
        );

        let video = match (self.mode, &self.generator) {
            (PipelineMode::Mock, _) => self.mock.generate(&generation_request),
            (PipelineMode::Live, Some(client)) => {
                client
                    .generate(&generation_request, request.keep_local_file)
                    .await?
            }
            (PipelineMode::Live, None) => {
                return Err(PipelineError::config(
                    "generation client missing in live mode",
                ))
            }
        };

        info!(run_id = %run_id, job_id = %video.job_id, "generation leg complete");

        let youtube = if !request.upload_to_youtube {
            UploadOutcome::skipped(SkipReason::NotRequested)
        } else if video.status != GenerationStatus::Completed {
            UploadOutcome::skipped(SkipReason::GenerationIncomplete)
        } else if self.mode.is_mock() {
            UploadOutcome::skipped(SkipReason::MockMode)
        } else if let Some(uploader) = &self.uploader {
            match uploader.upload(&video.asset, &publish).await {
                Ok(receipt) => {
                    info!(run_id = %run_id, video_id = %receipt.video_id, "upload leg complete");
                    UploadOutcome::uploaded(receipt.video_id, receipt.visibility)
                }
                Err(e) => {
                    warn!(run_id = %run_id, error = %e, "upload leg failed, keeping generated asset");
                    UploadOutcome::failed(e.to_string())
                }
            }
        } else {
            UploadOutcome::skipped(SkipReason::MissingCredentials)
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        info!(run_id = %run_id, duration_ms, outcome = youtube.status(), "content run finished");

        Ok(PipelineResult {
            video,
            youtube: Some(youtube),
            duration_ms,
        })
    }

    /// Drive a batch of requests strictly sequentially.
    ///
    /// One run fully completes, polling and upload included, before the next
    /// begins; this keeps provider rate limits and upload quota predictable.
    /// A failed run is captured in place so the rest of the batch proceeds.
    pub async fn run_batch(
        &self,
        requests: &[ContentFactoryRequest],
    ) -> Vec<FactoryResult<PipelineResult>> {
        let mut results = Vec::with_capacity(requests.len());

        for (index, request) in requests.iter().enumerate() {
            info!(batch_index = index, total = requests.len(), "starting batch item");
            results.push(self.run(request).await);
        }

        results
    }
}
