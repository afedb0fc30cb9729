//! Render backend abstraction and its HTTP implementation.

use std::time::Duration;

use reelcut_common::{BackendConfig, ReelcutError, ReelcutResult};

use crate::job::{JobHandle, JobStatus};
use crate::request::RenderRequest;

/// The external service that produces the final video.
#[async_trait::async_trait]
pub trait RenderBackend: Send + Sync {
    /// Start a render. Returns as soon as the backend has queued it.
    async fn submit(&self, request: &RenderRequest) -> ReelcutResult<JobHandle>;

    /// Current status of a job.
    async fn status(&self, job_id: &str) -> ReelcutResult<JobStatus>;

    /// Backend name for logs.
    fn name(&self) -> &str;
}

/// Talks to the processing backend's REST API.
#[derive(Debug, Clone)]
pub struct HttpRenderBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRenderBackend {
    pub fn new(config: &BackendConfig) -> ReelcutResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ReelcutError::backend(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn read_status(response: reqwest::Response, what: &str) -> ReelcutResult<JobStatus> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReelcutError::backend(format!(
                "{what} returned {status}: {body}"
            )));
        }
        response
            .json::<JobStatus>()
            .await
            .map_err(|e| ReelcutError::backend(format!("invalid {what} response: {e}")))
    }
}

#[async_trait::async_trait]
impl RenderBackend for HttpRenderBackend {
    async fn submit(&self, request: &RenderRequest) -> ReelcutResult<JobHandle> {
        let url = format!("{}/api/videos/{}/render", self.base_url, request.source_id);
        tracing::info!(%url, source_id = %request.source_id, "Submitting render job");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ReelcutError::backend(format!("request to {url} failed: {e}")))?;

        let accepted = Self::read_status(response, "render submission").await?;
        tracing::info!(job_id = %accepted.job_id, "Render job accepted");
        Ok(JobHandle::new(accepted.job_id, request.source_id.clone()))
    }

    async fn status(&self, job_id: &str) -> ReelcutResult<JobStatus> {
        let url = format!("{}/api/jobs/{}", self.base_url, job_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ReelcutError::backend(format!("request to {url} failed: {e}")))?;
        Self::read_status(response, "job status").await
    }

    fn name(&self) -> &str {
        "http"
    }
}
