//! Non-timeline edit instructions forwarded to the render backend.

use serde::{Deserialize, Serialize};

use crate::error::EditError;

/// How a marked screen region is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementKind {
    #[default]
    Text,
    Blur,
    Remove,
    Image,
}

/// A screen region to replace over a source-time window.
///
/// Region coordinates are percentages (`0..=100`) of the frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualReplacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub start_time: f64,
    pub end_time: f64,

    #[serde(rename = "replacement_type", default)]
    pub kind: ReplacementKind,

    /// Replacement text, or an image reference for [`ReplacementKind::Image`].
    #[serde(rename = "replacement_value", default)]
    pub value: String,

    /// Follow the region as it moves.
    #[serde(rename = "enable_tracking", default)]
    pub tracking: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
}

impl VisualReplacement {
    /// Check the region lies inside the frame and the window is not empty.
    pub fn validate(&self) -> Result<(), EditError> {
        if !(self.start_time.is_finite() && self.end_time.is_finite())
            || self.start_time >= self.end_time
        {
            return Err(EditError::InvalidRange {
                start: self.start_time,
                end: self.end_time,
            });
        }

        let in_frame = |v: f64| (0.0..=100.0).contains(&v);
        if !(in_frame(self.x) && in_frame(self.y))
            || self.width <= 0.0
            || self.height <= 0.0
            || self.x + self.width > 100.0
            || self.y + self.height > 100.0
        {
            return Err(EditError::invalid_script(format!(
                "replacement region ({}, {}, {}x{}) is outside the frame",
                self.x, self.y, self.width, self.height
            )));
        }

        Ok(())
    }

    /// Region in pixels for a `frame_w` x `frame_h` frame: `(x, y, w, h)`.
    pub fn pixel_rect(&self, frame_w: u32, frame_h: u32) -> (u32, u32, u32, u32) {
        let px = |pct: f64, extent: u32| (pct / 100.0 * f64::from(extent)).round() as u32;
        (
            px(self.x, frame_w),
            px(self.y, frame_h),
            px(self.width, frame_w),
            px(self.height, frame_h),
        )
    }
}

/// Replace the spoken words in a window with synthesized speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSubstitution {
    pub original_text: String,
    pub new_text: String,
    pub start_time: f64,
    pub end_time: f64,

    /// Voice to synthesize with. The backend's cloned voice if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
}

impl VoiceSubstitution {
    pub fn validate(&self) -> Result<(), EditError> {
        if !(self.start_time.is_finite() && self.end_time.is_finite())
            || self.start_time >= self.end_time
        {
            return Err(EditError::InvalidRange {
                start: self.start_time,
                end: self.end_time,
            });
        }
        if self.new_text.trim().is_empty() {
            return Err(EditError::invalid_script("voice substitution has no new text"));
        }
        Ok(())
    }
}
