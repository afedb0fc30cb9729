//! Watches a submitted render job until it finishes.

use std::time::Duration;

use reelcut_common::{BackendConfig, ReelcutError, ReelcutResult};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::backend::RenderBackend;
use crate::job::{JobHandle, JobState, JobStatus, JobTracker};

/// Polling policy for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPoller {
    pub interval: Duration,
    /// Give up after this long. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Failed status requests in a row before giving up.
    pub max_consecutive_errors: u32,
}

impl Default for JobPoller {
    fn default() -> Self {
        Self::from(&BackendConfig::default())
    }
}

impl From<&BackendConfig> for JobPoller {
    fn from(config: &BackendConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.poll_interval_ms),
            timeout: config.job_timeout_secs.map(Duration::from_secs),
            max_consecutive_errors: config.max_consecutive_poll_errors.max(1),
        }
    }
}

impl JobPoller {
    /// Poll `backend` until the job completes, fails, times out, or
    /// `cancel` fires.
    ///
    /// `on_update` sees every status change. Cancelling only stops the
    /// watch; the backend keeps rendering.
    pub async fn watch<F>(
        &self,
        backend: &dyn RenderBackend,
        handle: &JobHandle,
        cancel: CancellationToken,
        mut on_update: F,
    ) -> ReelcutResult<JobStatus>
    where
        F: FnMut(&JobStatus) + Send,
    {
        let job_id = handle.job_id.as_str();
        let deadline = self.timeout.map(|t| Instant::now() + t);
        let mut tracker = JobTracker::new(job_id);
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut consecutive_errors = 0u32;

        tracing::info!(
            job_id,
            backend = backend.name(),
            interval_ms = self.interval.as_millis() as u64,
            "Watching render job"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(job_id)),
                _ = until(deadline) => return Err(timed_out(job_id)),
                _ = ticker.tick() => {}
            }

            let report = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(job_id)),
                _ = until(deadline) => return Err(timed_out(job_id)),
                report = backend.status(job_id) => report,
            };

            match report {
                Ok(report) => {
                    consecutive_errors = 0;
                    if tracker.apply(report) {
                        on_update(tracker.status());
                    }
                }
                Err(e) => {
                    consecutive_errors += 1;
                    tracing::warn!(
                        job_id,
                        attempt = consecutive_errors,
                        error = %e,
                        "Job status poll failed"
                    );
                    if consecutive_errors >= self.max_consecutive_errors {
                        return Err(ReelcutError::backend(format!(
                            "giving up on job {job_id} after {consecutive_errors} failed polls: {e}"
                        )));
                    }
                    continue;
                }
            }

            let status = tracker.status();
            match status.status {
                JobState::Completed => return Ok(status.clone()),
                JobState::Failed => {
                    let message = status
                        .error
                        .clone()
                        .unwrap_or_else(|| "render failed".to_string());
                    return Err(ReelcutError::job_failed(job_id, message));
                }
                JobState::Pending | JobState::Processing => {}
            }
        }
    }
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn cancelled(job_id: &str) -> ReelcutError {
    tracing::info!(job_id, "Stopped watching render job");
    ReelcutError::Cancelled
}

fn timed_out(job_id: &str) -> ReelcutError {
    tracing::warn!(job_id, "Render job watch timed out");
    ReelcutError::JobTimedOut {
        job_id: job_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RenderRequest;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted status reports, then repeats the last one.
    struct ScriptedBackend {
        reports: Mutex<VecDeque<Result<JobStatus, String>>>,
        last: Mutex<Option<JobStatus>>,
        polls: Mutex<u32>,
    }

    impl ScriptedBackend {
        fn new(reports: Vec<Result<JobStatus, String>>) -> Self {
            Self {
                reports: Mutex::new(reports.into()),
                last: Mutex::new(None),
                polls: Mutex::new(0),
            }
        }

        fn polls(&self) -> u32 {
            *self.polls.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl RenderBackend for ScriptedBackend {
        async fn submit(&self, request: &RenderRequest) -> ReelcutResult<JobHandle> {
            Ok(JobHandle::new("job1", request.source_id.clone()))
        }

        async fn status(&self, _job_id: &str) -> ReelcutResult<JobStatus> {
            *self.polls.lock().unwrap() += 1;
            let next = self.reports.lock().unwrap().pop_front();
            match next {
                Some(Ok(status)) => {
                    *self.last.lock().unwrap() = Some(status.clone());
                    Ok(status)
                }
                Some(Err(message)) => Err(ReelcutError::backend(message)),
                None => self
                    .last
                    .lock()
                    .unwrap()
                    .clone()
                    .ok_or_else(|| ReelcutError::backend("no status scripted")),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn status(state: JobState, progress: u32) -> JobStatus {
        JobStatus {
            job_id: "job1".into(),
            status: state,
            progress,
            output_url: None,
            error: None,
        }
    }

    fn fast() -> JobPoller {
        JobPoller {
            interval: Duration::from_millis(5),
            timeout: Some(Duration::from_secs(5)),
            max_consecutive_errors: 3,
        }
    }

    fn handle() -> JobHandle {
        JobHandle::new("job1", "vid-1")
    }

    #[tokio::test]
    async fn test_watch_reports_progress_until_completed() {
        let mut done = status(JobState::Completed, 100);
        done.output_url = Some("/api/jobs/job1/download".into());
        let backend = ScriptedBackend::new(vec![
            Ok(status(JobState::Pending, 0)),
            Ok(status(JobState::Processing, 30)),
            Ok(status(JobState::Processing, 20)),
            Ok(status(JobState::Processing, 80)),
            Ok(done),
        ]);

        let mut seen = Vec::new();
        let result = fast()
            .watch(&backend, &handle(), CancellationToken::new(), |s| {
                seen.push((s.status, s.progress))
            })
            .await
            .unwrap();

        assert_eq!(result.output_url.as_deref(), Some("/api/jobs/job1/download"));
        assert_eq!(
            seen,
            vec![
                (JobState::Processing, 30),
                (JobState::Processing, 80),
                (JobState::Completed, 100),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_job_surfaces_backend_message() {
        let mut failed = status(JobState::Failed, 40);
        failed.error = Some("voice clone unavailable".into());
        let backend = ScriptedBackend::new(vec![Ok(status(JobState::Processing, 40)), Ok(failed)]);

        let err = fast()
            .watch(&backend, &handle(), CancellationToken::new(), |_| {})
            .await
            .unwrap_err();

        match err {
            ReelcutError::JobFailed { job_id, message } => {
                assert_eq!(job_id, "job1");
                assert_eq!(message, "voice clone unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_transient_errors_are_tolerated() {
        let backend = ScriptedBackend::new(vec![
            Err("connection reset".into()),
            Err("connection reset".into()),
            Ok(status(JobState::Completed, 100)),
        ]);

        let result = fast()
            .watch(&backend, &handle(), CancellationToken::new(), |_| {})
            .await
            .unwrap();
        assert_eq!(result.status, JobState::Completed);
        assert_eq!(backend.polls(), 3);
    }

    #[tokio::test]
    async fn test_too_many_errors_give_up() {
        let backend = ScriptedBackend::new(vec![
            Err("down".into()),
            Err("down".into()),
            Err("down".into()),
            Ok(status(JobState::Completed, 100)),
        ]);

        let err = fast()
            .watch(&backend, &handle(), CancellationToken::new(), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, ReelcutError::Backend { .. }));
        assert_eq!(backend.polls(), 3);
    }

    #[tokio::test]
    async fn test_timeout_while_processing() {
        let backend = ScriptedBackend::new(vec![Ok(status(JobState::Processing, 10))]);
        let poller = JobPoller {
            timeout: Some(Duration::from_millis(60)),
            ..fast()
        };

        let err = poller
            .watch(&backend, &handle(), CancellationToken::new(), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, ReelcutError::JobTimedOut { ref job_id } if job_id == "job1"));
    }

    #[tokio::test]
    async fn test_cancel_abandons_watch() {
        let backend = ScriptedBackend::new(vec![Ok(status(JobState::Processing, 10))]);
        let poller = JobPoller {
            timeout: None,
            ..fast()
        };
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            trigger.cancel();
        });

        let err = poller
            .watch(&backend, &handle(), token, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, ReelcutError::Cancelled));
        assert!(backend.polls() >= 1);
    }
}
