//! Generation provider client.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use reelsmith_models::{
    AssetLocation, GenerationMetadata, GenerationRequest, GenerationResult, GenerationStatus,
    JobId,
};

use crate::config::GenerationConfig;
use crate::error::{GenError, GenerationError};

/// Submit request for the provider's long-running generation endpoint.
#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<Instance>,
    parameters: Parameters,
}

#[derive(Debug, Serialize)]
struct Instance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters {
    aspect_ratio: String,
    duration_seconds: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OperationRef {
    name: String,
}

/// Long-running operation as reported by the status endpoint.
#[derive(Debug, Deserialize)]
struct Operation {
    #[serde(default)]
    done: bool,
    error: Option<OperationError>,
    response: Option<OperationResponse>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    code: Option<i64>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSample {
    video: VideoRef,
}

#[derive(Debug, Deserialize)]
struct VideoRef {
    uri: String,
}

/// Client for the video generation provider.
pub struct GenerationClient {
    config: GenerationConfig,
    http: Client,
}

impl GenerationClient {
    /// Create a new generation client.
    pub fn new(config: GenerationConfig) -> GenError<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GenerationError::Network)?;

        Ok(Self { config, http })
    }

    /// Submit a generation job and wait for it to materialize into an asset.
    ///
    /// Polls the provider's operation endpoint with capped-exponential
    /// backoff until the job is terminal or `max_wait` elapses. A terminal
    /// provider failure is never resubmitted here.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        keep_local: bool,
    ) -> GenError<GenerationResult> {
        let request = request.clone().normalized();
        if request.prompt.is_empty() {
            return Err(GenerationError::invalid_request("prompt must not be empty"));
        }

        let operation = self.submit(&request).await?;
        info!(operation = %operation, model = %self.config.model, "generation job submitted");

        let uri = self.wait_for_asset(&operation).await?;
        let job_id = JobId::from_string(
            operation.rsplit('/').next().unwrap_or(&operation).to_string(),
        );

        let asset = if keep_local {
            let path = self.download(&uri, &job_id).await?;
            AssetLocation::file(path)
        } else {
            let parsed = uri
                .parse()
                .map_err(|e| GenerationError::failed(format!("provider returned bad asset URI: {e}")))?;
            AssetLocation::remote(parsed)
        };

        Ok(GenerationResult {
            job_id,
            asset,
            metadata: GenerationMetadata {
                mock: false,
                model: Some(self.config.model.clone()),
                operation: Some(operation),
            },
            status: GenerationStatus::Completed,
        })
    }

    /// Submit the job, returning the provider operation name.
    async fn submit(&self, request: &GenerationRequest) -> GenError<String> {
        let url = format!(
            "{}/models/{}:predictLongRunning",
            self.config.base_url, self.config.model
        );

        let body = PredictRequest {
            instances: vec![Instance {
                prompt: compose_prompt(request),
            }],
            parameters: Parameters {
                aspect_ratio: request.aspect_ratio.as_str().to_string(),
                duration_seconds: request.duration_seconds,
                negative_prompt: request.negative_prompt.clone(),
            },
        };

        debug!(url = %url, "submitting generation job");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::failed(format!(
                "provider returned {status}: {body}"
            )));
        }

        let op: OperationRef = response.json().await?;
        Ok(op.name)
    }

    /// Poll the operation until terminal, returning the asset URI.
    async fn wait_for_asset(&self, operation: &str) -> GenError<String> {
        let started = Instant::now();
        let mut attempt = 0u32;

        loop {
            let elapsed = started.elapsed();
            if elapsed >= self.config.max_wait {
                warn!(operation = %operation, "generation polling budget exhausted");
                return Err(GenerationError::Timeout {
                    waited_secs: elapsed.as_secs(),
                    budget_secs: self.config.max_wait.as_secs(),
                });
            }

            let delay = self
                .delay_for_attempt(attempt)
                .min(self.config.max_wait - elapsed);
            tokio::time::sleep(delay).await;

            let op = self.poll(operation).await?;
            if op.done {
                return resolve_operation(op);
            }

            debug!(operation = %operation, attempt, "generation job still pending");
            attempt += 1;
        }
    }

    async fn poll(&self, operation: &str) -> GenError<Operation> {
        let url = format!("{}/{}", self.config.base_url, operation);

        let response = self
            .http
            .get(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::failed(format!(
                "status poll returned {status}: {body}"
            )));
        }

        Ok(response.json().await?)
    }

    /// Download the finished asset into the work directory.
    async fn download(&self, uri: &str, job_id: &JobId) -> GenError<PathBuf> {
        tokio::fs::create_dir_all(&self.config.work_dir).await?;
        let path = PathBuf::from(&self.config.work_dir).join(format!("{job_id}.mp4"));

        let response = self
            .http
            .get(uri)
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::failed(format!(
                "asset download returned {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(&path, &bytes).await?;
        info!(path = %path.display(), size = bytes.len(), "asset downloaded");

        Ok(path)
    }

    /// Capped-exponential poll delay.
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .config
            .poll_interval
            .saturating_mul(2u32.saturating_pow(attempt.min(16)));
        delay.min(self.config.poll_max_interval)
    }
}

/// Fold the optional style and audio directions into the prompt text.
fn compose_prompt(request: &GenerationRequest) -> String {
    let mut prompt = request.prompt.clone();
    if let Some(style) = &request.style_preset {
        prompt.push_str(&format!(", {style} style"));
    }
    if let Some(audio) = &request.audio_prompt {
        prompt.push_str(&format!(". Audio: {audio}"));
    }
    prompt
}

/// Map a terminal operation to its asset URI or provider failure.
fn resolve_operation(op: Operation) -> GenError<String> {
    if let Some(error) = op.error {
        let message = error.message.unwrap_or_else(|| "unspecified".to_string());
        return Err(GenerationError::failed(match error.code {
            Some(code) => format!("provider error {code}: {message}"),
            None => format!("provider error: {message}"),
        }));
    }

    op.response
        .and_then(|r| r.generate_video_response)
        .and_then(|r| r.generated_samples.into_iter().next())
        .map(|sample| sample.video.uri)
        .ok_or_else(|| GenerationError::failed("operation completed without an asset"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsmith_models::AspectRatio;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> GenerationConfig {
        GenerationConfig {
            base_url,
            model: "veo-test".to_string(),
            poll_interval: Duration::from_millis(10),
            poll_max_interval: Duration::from_millis(20),
            max_wait: Duration::from_millis(500),
            ..GenerationConfig::new("test-key")
        }
    }

    fn test_request() -> GenerationRequest {
        GenerationRequest {
            prompt: "a corgi surfing at sunset".to_string(),
            aspect_ratio: AspectRatio::Vertical,
            duration_seconds: 8,
            negative_prompt: None,
            style_preset: None,
            audio_prompt: None,
        }
    }

    const OPERATION: &str = "models/veo-test/operations/op-42";

    async fn mount_submit(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/models/veo-test:predictLongRunning"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": OPERATION })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn generate_polls_until_completed() {
        let server = MockServer::start().await;
        mount_submit(&server).await;

        Mock::given(method("GET"))
            .and(path(format!("/{OPERATION}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": OPERATION,
                "done": false
            })))
            .up_to_n_times(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/{OPERATION}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": OPERATION,
                "done": true,
                "response": {
                    "generateVideoResponse": {
                        "generatedSamples": [
                            { "video": { "uri": "https://cdn.example.com/op-42.mp4" } }
                        ]
                    }
                }
            })))
            .mount(&server)
            .await;

        let client = GenerationClient::new(test_config(server.uri())).unwrap();
        let result = client.generate(&test_request(), false).await.unwrap();

        assert_eq!(result.status, GenerationStatus::Completed);
        assert_eq!(result.job_id.as_str(), "op-42");
        assert!(!result.metadata.mock);
        assert_eq!(
            result.asset.as_remote().unwrap().as_str(),
            "https://cdn.example.com/op-42.mp4"
        );
    }

    #[tokio::test]
    async fn submit_sends_clamped_duration_and_ratio() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/veo-test:predictLongRunning"))
            .and(body_partial_json(json!({
                "parameters": { "aspectRatio": "9:16", "durationSeconds": 120 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": OPERATION })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/{OPERATION}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": OPERATION,
                "done": true,
                "response": {
                    "generateVideoResponse": {
                        "generatedSamples": [
                            { "video": { "uri": "https://cdn.example.com/op-42.mp4" } }
                        ]
                    }
                }
            })))
            .mount(&server)
            .await;

        let client = GenerationClient::new(test_config(server.uri())).unwrap();
        let mut request = test_request();
        request.duration_seconds = 200;
        client.generate(&request, false).await.unwrap();
    }

    #[tokio::test]
    async fn provider_failure_is_terminal() {
        let server = MockServer::start().await;
        mount_submit(&server).await;

        Mock::given(method("GET"))
            .and(path(format!("/{OPERATION}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": OPERATION,
                "done": true,
                "error": { "code": 3, "message": "prompt rejected by safety filter" }
            })))
            .mount(&server)
            .await;

        let client = GenerationClient::new(test_config(server.uri())).unwrap();
        let err = client.generate(&test_request(), false).await.unwrap_err();

        match err {
            GenerationError::Failed(msg) => {
                assert!(msg.contains("safety filter"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn never_terminal_job_times_out() {
        let server = MockServer::start().await;
        mount_submit(&server).await;

        Mock::given(method("GET"))
            .and(path(format!("/{OPERATION}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": OPERATION,
                "done": false
            })))
            .mount(&server)
            .await;

        let mut config = test_config(server.uri());
        config.max_wait = Duration::from_millis(60);

        let client = GenerationClient::new(config).unwrap();
        let err = client.generate(&test_request(), false).await.unwrap_err();

        assert!(matches!(err, GenerationError::Timeout { .. }));
    }

    #[tokio::test]
    async fn keep_local_downloads_the_asset() {
        let server = MockServer::start().await;
        mount_submit(&server).await;

        let asset_url = format!("{}/assets/op-42.mp4", server.uri());
        Mock::given(method("GET"))
            .and(path(format!("/{OPERATION}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": OPERATION,
                "done": true,
                "response": {
                    "generateVideoResponse": {
                        "generatedSamples": [{ "video": { "uri": asset_url } }]
                    }
                }
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/assets/op-42.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"not-really-mp4".to_vec()))
            .mount(&server)
            .await;

        let work_dir = tempfile::tempdir().unwrap();
        let mut config = test_config(server.uri());
        config.work_dir = work_dir.path().to_string_lossy().to_string();

        let client = GenerationClient::new(config).unwrap();
        let result = client.generate(&test_request(), true).await.unwrap();

        let path = result.asset.as_file().unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"not-really-mp4");
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected_before_dispatch() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/veo-test:predictLongRunning"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": OPERATION })))
            .expect(0)
            .mount(&server)
            .await;

        let client = GenerationClient::new(test_config(server.uri())).unwrap();
        let mut request = test_request();
        request.prompt = "   ".to_string();

        let err = client.generate(&request, false).await.unwrap_err();
        assert!(matches!(err, GenerationError::InvalidRequest(_)));
    }

    #[test]
    fn compose_prompt_appends_style_and_audio() {
        let mut request = test_request();
        request.style_preset = Some("claymation".to_string());
        request.audio_prompt = Some("upbeat synthwave".to_string());

        let prompt = compose_prompt(&request);
        assert!(prompt.starts_with("a corgi surfing at sunset"));
        assert!(prompt.contains("claymation style"));
        assert!(prompt.contains("Audio: upbeat synthwave"));
    }
}
