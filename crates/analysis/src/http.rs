//! Backend filler detection over HTTP.

use std::time::Duration;

use reelcut_common::{BackendConfig, ReelcutError, ReelcutResult};
use reelcut_edit_model::DetectedFiller;
use serde::{Deserialize, Serialize};

use crate::detector::FillerDetector;

/// Body of `GET /api/videos/{id}/detect-fillers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectFillersResponse {
    pub fillers: Vec<DetectedFiller>,
    pub total_duration: f64,
    pub filler_duration: f64,
}

/// Error body the backend sends with 4xx/5xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Asks the processing backend to run detection on a stored transcript.
#[derive(Debug, Clone)]
pub struct HttpFillerDetector {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFillerDetector {
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

    /// Full response including the backend's duration totals.
    pub async fn fetch(&self, source_id: &str) -> ReelcutResult<DetectFillersResponse> {
        let url = format!("{}/api/videos/{}/detect-fillers", self.base_url, source_id);
        tracing::debug!(%url, "Requesting filler detection");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ReelcutError::backend(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.detail)
                .unwrap_or(body);
            return Err(ReelcutError::detection(format!(
                "backend returned {status} for {source_id}: {detail}"
            )));
        }

        let mut parsed: DetectFillersResponse = response
            .json()
            .await
            .map_err(|e| ReelcutError::backend(format!("invalid detection response: {e}")))?;
        parsed.fillers.sort_by(|a, b| a.start.total_cmp(&b.start));
        Ok(parsed)
    }
}

#[async_trait::async_trait]
impl FillerDetector for HttpFillerDetector {
    async fn detect(&self, source_id: &str) -> ReelcutResult<Vec<DetectedFiller>> {
        Ok(self.fetch(source_id).await?.fillers)
    }
}
