//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Render/analysis backend connection settings.
    pub backend: BackendConfig,

    /// Interactive editing tunables.
    pub editor: EditorConfig,

    /// Filler and silence detection settings.
    pub detection: DetectionConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Where the render/transcription backend lives and how to talk to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend API (no trailing slash).
    pub base_url: String,

    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,

    /// Interval between job status polls.
    pub poll_interval_ms: u64,

    /// Give up watching a job after this long. `None` waits forever.
    pub job_timeout_secs: Option<u64>,

    /// Consecutive failed status polls tolerated before the watch errors out.
    pub max_consecutive_poll_errors: u32,
}

/// Interactive editing tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Minimum content a trim gesture must leave in a clip (seconds).
    pub min_clip_secs: f64,

    /// Maximum gap between selected words that still joins them into one deletion.
    pub word_gap_secs: f64,

    /// Width of the trim handle hit zone at each clip edge (pixels).
    pub edge_handle_px: f64,

    /// Pointer travel below which a press counts as a click (pixels).
    pub drag_threshold_px: f64,

    /// Playhead nudge for arrow keys (seconds).
    pub nudge_secs: f64,

    /// Maximum undo depth.
    pub history_depth: usize,
}

/// Filler and silence detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum gap between words flagged as silence (seconds).
    pub silence_threshold_secs: f64,

    /// Words added to the built-in filler vocabulary.
    pub extra_filler_words: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "reelcut=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 30,
            poll_interval_ms: 2000,
            job_timeout_secs: Some(1800),
            max_consecutive_poll_errors: 3,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_clip_secs: 0.5,
            word_gap_secs: 0.3,
            edge_handle_px: 8.0,
            drag_threshold_px: 3.0,
            nudge_secs: 0.1,
            history_depth: 100,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            silence_threshold_secs: 1.5,
            extra_filler_words: vec![],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("reelcut").join("config.json")
}
