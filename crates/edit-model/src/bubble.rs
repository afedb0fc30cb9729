//! Camera bubble overlay settings.
//!
//! The bubble is composited by the render backend; the edit model only
//! records where it goes, how big it is, and when it shows.

use serde::{Deserialize, Serialize};

/// Smallest bubble, as a fraction of frame width.
pub const MIN_BUBBLE_SIZE: f64 = 0.05;

/// Largest bubble, as a fraction of frame width.
pub const MAX_BUBBLE_SIZE: f64 = 1.0;

/// Anchor for the bubble within the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BubblePosition {
    #[default]
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
    /// Placed at `custom_x`/`custom_y`.
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BubbleShape {
    #[default]
    Circle,
    Square,
    Rounded,
}

/// A source-time range with an explicit visibility flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubbleVisibility {
    pub start: f64,
    pub end: f64,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

/// Pixel placement of the bubble's top-left corner within a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubblePlacement {
    pub x: i64,
    pub y: i64,
    pub size_px: i64,
}

/// Camera bubble overlay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleSettings {
    #[serde(default)]
    pub position: BubblePosition,

    /// Normalized horizontal position for [`BubblePosition::Custom`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_x: Option<f64>,

    /// Normalized vertical position for [`BubblePosition::Custom`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_y: Option<f64>,

    /// Diameter as a fraction of frame width.
    #[serde(default = "default_size")]
    pub size: f64,

    #[serde(default)]
    pub shape: BubbleShape,

    /// Visibility windows. Empty means always visible.
    #[serde(default)]
    pub visibility: Vec<BubbleVisibility>,

    /// Distance from the frame edge for corner positions.
    #[serde(default = "default_padding")]
    pub padding_px: u32,
}

impl Default for BubbleSettings {
    fn default() -> Self {
        Self {
            position: BubblePosition::default(),
            custom_x: None,
            custom_y: None,
            size: default_size(),
            shape: BubbleShape::default(),
            visibility: Vec::new(),
            padding_px: default_padding(),
        }
    }
}

impl BubbleSettings {
    /// Set the size, clamped to a usable range.
    pub fn with_size(&self, size: f64) -> Self {
        let size = if size.is_finite() {
            size.clamp(MIN_BUBBLE_SIZE, MAX_BUBBLE_SIZE)
        } else {
            default_size()
        };
        Self {
            size,
            ..self.clone()
        }
    }

    /// Drop the bubble at a normalized point.
    pub fn move_to(&self, x: f64, y: f64) -> Self {
        Self {
            position: BubblePosition::Custom,
            custom_x: Some(x.clamp(0.0, 1.0)),
            custom_y: Some(y.clamp(0.0, 1.0)),
            ..self.clone()
        }
    }

    /// Snap to one of the corner anchors, forgetting any custom point.
    pub fn snap_to(&self, position: BubblePosition) -> Self {
        Self {
            position,
            custom_x: None,
            custom_y: None,
            ..self.clone()
        }
    }

    /// Where the bubble lands in a `frame_w` x `frame_h` frame.
    ///
    /// A custom position without both coordinates falls back to the
    /// bottom-left corner.
    pub fn placement(&self, frame_w: u32, frame_h: u32) -> BubblePlacement {
        let w = i64::from(frame_w);
        let h = i64::from(frame_h);
        let size_px = (f64::from(frame_w) * self.size) as i64;
        let pad = i64::from(self.padding_px);

        let (x, y) = match (self.position, self.custom_x, self.custom_y) {
            (BubblePosition::Custom, Some(cx), Some(cy)) => {
                ((cx * w as f64) as i64, (cy * h as f64) as i64)
            }
            (BubblePosition::BottomRight, _, _) => (w - size_px - pad, h - size_px - pad),
            (BubblePosition::TopLeft, _, _) => (pad, pad),
            (BubblePosition::TopRight, _, _) => (w - size_px - pad, pad),
            _ => (pad, h - size_px - pad),
        };

        BubblePlacement { x, y, size_px }
    }

    /// Whether the bubble shows at source time `t`.
    ///
    /// A hidden window that covers `t` wins. Otherwise, if any visible
    /// windows exist the bubble only shows inside one of them; with no
    /// visible windows it is always shown.
    pub fn is_visible_at(&self, t: f64) -> bool {
        let covers = |v: &&BubbleVisibility| t >= v.start && t <= v.end;

        if self.visibility.iter().filter(|v| !v.visible).any(|v| covers(&v)) {
            return false;
        }

        let mut shown = self.visibility.iter().filter(|v| v.visible).peekable();
        if shown.peek().is_none() {
            return true;
        }
        shown.any(|v| covers(&v))
    }
}

fn default_size() -> f64 {
    0.25
}

fn default_padding() -> u32 {
    30
}

fn visible_by_default() -> bool {
    true
}
