//! Error types shared across Reelcut crates.

use std::path::PathBuf;

/// Top-level error type for Reelcut operations.
#[derive(Debug, thiserror::Error)]
pub enum ReelcutError {
    #[error("Edit error: {message}")]
    Edit { message: String },

    #[error("Detection error: {message}")]
    Detection { message: String },

    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error("Render job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },

    #[error("Render job {job_id} did not finish before the timeout")]
    JobTimedOut { job_id: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ReelcutError.
pub type ReelcutResult<T> = Result<T, ReelcutError>;

impl ReelcutError {
    pub fn edit(msg: impl Into<String>) -> Self {
        Self::Edit {
            message: msg.into(),
        }
    }

    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection {
            message: msg.into(),
        }
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn job_failed(job_id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::JobFailed {
            job_id: job_id.into(),
            message: msg.into(),
        }
    }

    /// Whether retrying the same call later could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Backend { .. } | Self::Io(_))
    }
}
