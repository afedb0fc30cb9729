//! Detector abstraction and the driver that feeds a deletion list.

use reelcut_common::ReelcutResult;
use reelcut_edit_model::{DeletionList, DetectedFiller};

/// Anything that can produce filler/silence candidates for a source.
#[async_trait::async_trait]
pub trait FillerDetector: Send + Sync {
    /// Candidates for `source_id`, sorted by start time.
    async fn detect(&self, source_id: &str) -> ReelcutResult<Vec<DetectedFiller>>;
}

/// Run `detector` and record the outcome on `list`.
///
/// The list is marked running while the detector works. On success the
/// candidates replace any previous ones and the count is returned. On
/// failure the list carries the error message and the error is returned.
/// Confirmed deletions are untouched either way.
pub async fn detect_fillers(
    list: &mut DeletionList,
    detector: &dyn FillerDetector,
    source_id: &str,
) -> ReelcutResult<usize> {
    *list = list.begin_detection();

    match detector.detect(source_id).await {
        Ok(candidates) => {
            let count = candidates.len();
            tracing::info!(source_id, count, "Filler detection finished");
            *list = list.with_candidates(candidates);
            Ok(count)
        }
        Err(e) => {
            tracing::warn!(source_id, error = %e, "Filler detection failed");
            *list = list.detection_failed(e.to_string());
            Err(e)
        }
    }
}
