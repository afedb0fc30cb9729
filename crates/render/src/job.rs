//! Render job status and its transition rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a render job.
///
/// The backend reports several named processing stages. They all map to
/// [`JobState::Processing`]; the progress number carries the detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    #[serde(
        alias = "generating_voice",
        alias = "syncing_lips",
        alias = "replacing_visuals",
        alias = "composing"
    )]
    Processing,
    Completed,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether a job may move from `self` to `next`. Staying put is allowed.
    pub fn can_transition_to(&self, next: JobState) -> bool {
        use JobState::*;
        match (self, next) {
            (a, b) if *a == b => true,
            (Pending, Processing | Completed | Failed) => true,
            (Processing, Completed | Failed) => true,
            _ => false,
        }
    }
}

/// Status document returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub job_id: String,
    pub status: JobState,

    /// Percent complete, `0..=100`.
    #[serde(default)]
    pub progress: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobStatus {
    pub fn pending(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            status: JobState::Pending,
            progress: 0,
            output_url: None,
            error: None,
        }
    }
}

/// A submitted job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobHandle {
    pub job_id: String,
    pub source_id: String,
    pub submitted_at: DateTime<Utc>,
}

impl JobHandle {
    pub fn new(job_id: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            source_id: source_id.into(),
            submitted_at: Utc::now(),
        }
    }
}

/// Folds backend status reports into a consistent view of one job.
///
/// Reports that would move the job backwards (a completed job going back
/// to processing, progress dropping) are ignored. Progress never exceeds
/// 100 and reads 100 once the job completes.
#[derive(Debug, Clone)]
pub struct JobTracker {
    status: JobStatus,
}

impl JobTracker {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            status: JobStatus::pending(job_id),
        }
    }

    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.status.is_terminal()
    }

    /// Apply a report. Returns `true` if the visible status changed.
    pub fn apply(&mut self, report: JobStatus) -> bool {
        if report.job_id != self.status.job_id {
            tracing::warn!(
                expected = %self.status.job_id,
                got = %report.job_id,
                "Ignoring status for a different job"
            );
            return false;
        }

        let current = self.status.status;
        if !current.can_transition_to(report.status) {
            tracing::warn!(
                job_id = %report.job_id,
                from = ?current,
                to = ?report.status,
                "Ignoring illegal job state transition"
            );
            return false;
        }
        if current.is_terminal() {
            return false;
        }

        let mut next = self.status.clone();
        next.status = report.status;

        let reported = report.progress.min(100);
        if reported < next.progress {
            tracing::debug!(
                job_id = %report.job_id,
                from = next.progress,
                to = reported,
                "Ignoring progress regression"
            );
        } else {
            next.progress = reported;
        }
        if next.status == JobState::Completed {
            next.progress = 100;
        }
        if report.output_url.is_some() {
            next.output_url = report.output_url;
        }
        if report.error.is_some() {
            next.error = report.error;
        }

        if next == self.status {
            return false;
        }
        if next.status != current && next.status.is_terminal() {
            tracing::info!(
                job_id = %next.job_id,
                status = ?next.status,
                output_url = ?next.output_url,
                "Render job finished"
            );
        }
        self.status = next;
        true
    }
}
