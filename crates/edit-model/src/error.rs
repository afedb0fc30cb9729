//! Errors raised at the fallible edges of the edit model.

use std::path::PathBuf;

/// Errors that can occur when loading sources or replaying edit scripts.
///
/// Interactive mutators never produce these; they reject bad input by
/// returning the state unchanged.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("Invalid source duration: {duration} (must be a positive number of seconds)")]
    InvalidDuration { duration: f64 },

    #[error("No segment at index {index} (session has {count} segments)")]
    UnknownSegment { index: usize, count: usize },

    #[error("Invalid time range [{start}, {end})")]
    InvalidRange { start: f64, end: f64 },

    #[error("Invalid edit script: {message}")]
    InvalidScript { message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl EditError {
    pub fn invalid_script(msg: impl Into<String>) -> Self {
        Self::InvalidScript {
            message: msg.into(),
        }
    }
}
