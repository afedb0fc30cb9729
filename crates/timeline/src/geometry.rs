//! Time/pixel conversion for a rendered timeline track.
//!
//! Clips are drawn at their `output_start`, so this is the display view
//! of the store. Playback sequencing lives in [`crate::playback`].

use serde::{Deserialize, Serialize};

use reelcut_edit_model::{SegmentId, SegmentStore};

/// Sum of active clip durations: the content length after edits.
pub fn output_duration(store: &SegmentStore) -> f64 {
    store
        .ordered_segments()
        .iter()
        .map(|s| s.clip_duration())
        .sum()
}

/// Span the ruler must show: the source duration or the furthest
/// active clip end, whichever is larger.
pub fn timeline_duration(store: &SegmentStore) -> f64 {
    store
        .ordered_segments()
        .iter()
        .map(|s| s.output_end())
        .fold(store.source_duration(), f64::max)
}

/// A track of `width_px` pixels showing `timeline_duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackGeometry {
    pub width_px: f64,
    pub timeline_duration: f64,
}

impl TrackGeometry {
    pub fn new(width_px: f64, timeline_duration: f64) -> Self {
        Self {
            width_px: width_px.max(1.0),
            timeline_duration: timeline_duration.max(0.0),
        }
    }

    pub fn for_store(width_px: f64, store: &SegmentStore) -> Self {
        Self::new(width_px, timeline_duration(store))
    }

    pub fn px_per_sec(&self) -> f64 {
        if self.timeline_duration > 0.0 {
            self.width_px / self.timeline_duration
        } else {
            0.0
        }
    }

    pub fn time_to_px(&self, t: f64) -> f64 {
        t * self.px_per_sec()
    }

    /// Pixel offset to time, clamped to the track.
    pub fn px_to_time(&self, px: f64) -> f64 {
        (px / self.width_px * self.timeline_duration).clamp(0.0, self.timeline_duration)
    }

    /// A pixel distance as seconds, unclamped and signed.
    pub fn px_to_secs(&self, dx: f64) -> f64 {
        dx / self.width_px * self.timeline_duration
    }
}

/// Where a clip is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipRect {
    pub id: SegmentId,
    pub left_px: f64,
    pub width_px: f64,
    pub deleted: bool,
    pub selected: bool,
}

impl ClipRect {
    pub fn right_px(&self) -> f64 {
        self.left_px + self.width_px
    }

    fn contains(&self, px: f64) -> bool {
        px >= self.left_px && px <= self.right_px()
    }
}

/// Rectangles for every segment, deleted ones included, in order.
pub fn clip_rects(
    store: &SegmentStore,
    geometry: &TrackGeometry,
    selected: Option<SegmentId>,
) -> Vec<ClipRect> {
    store
        .all_segments()
        .iter()
        .map(|s| ClipRect {
            id: s.id,
            left_px: geometry.time_to_px(s.output_start),
            width_px: geometry.time_to_px(s.clip_duration()),
            deleted: s.is_deleted(),
            selected: selected == Some(s.id),
        })
        .collect()
}

/// What a press at a given pixel lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    LeftEdge(SegmentId),
    RightEdge(SegmentId),
    Body(SegmentId),
    Empty,
}

/// Resolve a press.
///
/// Later clips are drawn on top, so they are tested first. Deleted clips
/// have no trim handles but can still be selected for restore.
pub fn hit_test(rects: &[ClipRect], px: f64, edge_handle_px: f64) -> HitTarget {
    for rect in rects.iter().rev() {
        if !rect.deleted {
            if (px - rect.left_px).abs() <= edge_handle_px {
                return HitTarget::LeftEdge(rect.id);
            }
            if (px - rect.right_px()).abs() <= edge_handle_px {
                return HitTarget::RightEdge(rect.id);
            }
        }
    }
    rects
        .iter()
        .rev()
        .find(|r| r.contains(px))
        .map_or(HitTarget::Empty, |r| HitTarget::Body(r.id))
}
