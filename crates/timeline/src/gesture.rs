//! Pointer gestures on the timeline track.
//!
//! A gesture captures the store and track geometry at press time. Every
//! pointer move recomputes the live store from that snapshot and the
//! total pointer travel, never from the previous move, so rounding does
//! not accumulate and dragging back to the origin restores the original
//! state exactly.

use reelcut_edit_model::{SegmentId, SegmentStore};

use crate::geometry::{HitTarget, TrackGeometry};

/// What a press turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Scrub the playhead.
    Seek,
    /// Press on a clip body. A click until travel passes the drag threshold.
    Move(SegmentId),
    TrimLeft(SegmentId),
    TrimRight(SegmentId),
}

impl From<HitTarget> for GestureKind {
    fn from(target: HitTarget) -> Self {
        match target {
            HitTarget::LeftEdge(id) => GestureKind::TrimLeft(id),
            HitTarget::RightEdge(id) => GestureKind::TrimRight(id),
            HitTarget::Body(id) => GestureKind::Move(id),
            HitTarget::Empty => GestureKind::Seek,
        }
    }
}

/// An in-flight press/drag/release sequence.
#[derive(Debug, Clone)]
pub struct Gesture {
    pub kind: GestureKind,
    pub origin_px: f64,
    pub snapshot: SegmentStore,
    pub geometry: TrackGeometry,
    dragging: bool,
}

impl Gesture {
    pub fn begin(
        kind: GestureKind,
        origin_px: f64,
        snapshot: SegmentStore,
        geometry: TrackGeometry,
    ) -> Self {
        Self {
            kind,
            origin_px,
            snapshot,
            geometry,
            dragging: false,
        }
    }

    /// Latch into drag mode once travel exceeds `threshold_px`.
    pub fn track(&mut self, px: f64, threshold_px: f64) -> bool {
        if !self.dragging && (px - self.origin_px).abs() > threshold_px {
            self.dragging = true;
        }
        self.dragging
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Live state for the pointer at `px`.
    pub fn preview(&self, px: f64, min_clip_secs: f64) -> SegmentStore {
        if !self.dragging {
            return self.snapshot.clone();
        }
        let delta = self.geometry.px_to_secs(px - self.origin_px);
        match self.kind {
            GestureKind::Seek => self.snapshot.clone(),
            GestureKind::Move(id) => self
                .snapshot
                .get(id)
                .map_or_else(|| self.snapshot.clone(), |s| {
                    self.snapshot.move_segment(id, s.output_start + delta)
                }),
            GestureKind::TrimLeft(id) => trim_left(&self.snapshot, id, delta, min_clip_secs),
            GestureKind::TrimRight(id) => trim_right(&self.snapshot, id, delta, min_clip_secs),
        }
    }

    /// State to commit on release.
    ///
    /// A finished body drag becomes a reorder at the drop position and
    /// every clip is laid back end to end, so the drawn order matches
    /// playback.
    pub fn finish(&self, px: f64, min_clip_secs: f64) -> SegmentStore {
        let live = self.preview(px, min_clip_secs);
        match self.kind {
            GestureKind::Move(id) if self.dragging => {
                let Some(dropped) = live.get(id) else {
                    return live;
                };
                let index = drop_index(&self.snapshot, id, dropped.output_start);
                self.snapshot.reorder_segments(id, index).pack_output_starts()
            }
            _ => live,
        }
    }
}

/// Drag a clip's left edge by `delta` seconds.
///
/// The trim is clamped so at least `min_clip_secs` remains. The clip's
/// `output_start` moves by the trim actually applied so its right edge
/// stays where it was drawn.
pub fn trim_left(store: &SegmentStore, id: SegmentId, delta: f64, min_clip_secs: f64) -> SegmentStore {
    let Some(segment) = store.get(id) else {
        return store.clone();
    };
    let max = segment.max_trim(segment.trim_end, min_clip_secs);
    let trim_start = (segment.trim_start + delta).clamp(0.0, max);
    let applied = trim_start - segment.trim_start;

    store
        .trim_segment(id, trim_start, segment.trim_end)
        .move_segment(id, segment.output_start + applied)
}

/// Drag a clip's right edge by `delta` seconds. Dragging right widens.
pub fn trim_right(store: &SegmentStore, id: SegmentId, delta: f64, min_clip_secs: f64) -> SegmentStore {
    let Some(segment) = store.get(id) else {
        return store.clone();
    };
    let max = segment.max_trim(segment.trim_start, min_clip_secs);
    let trim_end = (segment.trim_end - delta).clamp(0.0, max);
    store.trim_segment(id, segment.trim_start, trim_end)
}

/// Order index for a clip dropped at `output_start`: the number of other
/// clips whose drawn midpoint lies before the dropped clip's midpoint.
pub fn drop_index(snapshot: &SegmentStore, id: SegmentId, output_start: f64) -> usize {
    let Some(moving) = snapshot.get(id) else {
        return 0;
    };
    let center = output_start + moving.clip_duration() / 2.0;
    snapshot
        .all_segments()
        .iter()
        .filter(|s| s.id != id)
        .filter(|s| s.output_start + s.clip_duration() / 2.0 < center)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcut_edit_model::MIN_CLIP_SECS;

    fn three_clips() -> (SegmentStore, Vec<SegmentId>) {
        let store = SegmentStore::new()
            .initialize(9.0)
            .split_at_time(3.0)
            .split_at_time(6.0);
        let ids = store.all_segments().iter().map(|s| s.id).collect();
        (store, ids)
    }

    #[test]
    fn test_left_trim_keeps_right_edge() {
        let (store, ids) = three_clips();
        let trimmed = trim_left(&store, ids[1], 1.0, MIN_CLIP_SECS);
        let s = trimmed.get(ids[1]).unwrap();
        assert_eq!(s.trim_start, 1.0);
        assert_eq!(s.output_start, 4.0);
        assert_eq!(s.output_end(), 6.0);
    }

    #[test]
    fn test_left_trim_clamps_at_minimum() {
        let (store, ids) = three_clips();
        let trimmed = trim_left(&store, ids[1], 10.0, MIN_CLIP_SECS);
        let s = trimmed.get(ids[1]).unwrap();
        assert_eq!(s.trim_start, 2.5);
        assert_eq!(s.clip_duration(), 0.5);
        assert_eq!(s.output_end(), 6.0);

        let widened = trim_left(&trimmed, ids[1], -10.0, MIN_CLIP_SECS);
        assert_eq!(widened.get(ids[1]).unwrap().trim_start, 0.0);
        assert_eq!(widened.get(ids[1]).unwrap().output_start, 3.0);
    }

    #[test]
    fn test_right_trim_clamps() {
        let (store, ids) = three_clips();
        let trimmed = trim_right(&store, ids[0], -5.0, MIN_CLIP_SECS);
        let s = trimmed.get(ids[0]).unwrap();
        assert_eq!(s.trim_end, 2.5);
        assert_eq!(s.output_start, 0.0);

        let untouched = trim_right(&store, ids[0], 5.0, MIN_CLIP_SECS);
        assert_eq!(untouched.get(ids[0]).unwrap().trim_end, 0.0);
    }

    #[test]
    fn test_preview_is_computed_from_snapshot() {
        let (store, ids) = three_clips();
        let geometry = TrackGeometry::new(900.0, 9.0);
        let mut gesture = Gesture::begin(GestureKind::TrimRight(ids[0]), 300.0, store.clone(), geometry);

        assert!(gesture.track(200.0, 3.0));
        let live = gesture.preview(200.0, MIN_CLIP_SECS);
        assert_eq!(live.get(ids[0]).unwrap().trim_end, 1.0);

        assert_eq!(gesture.preview(300.0, MIN_CLIP_SECS), store);
    }

    #[test]
    fn test_small_travel_is_not_a_drag() {
        let (store, ids) = three_clips();
        let geometry = TrackGeometry::new(900.0, 9.0);
        let mut gesture = Gesture::begin(GestureKind::Move(ids[1]), 450.0, store.clone(), geometry);
        assert!(!gesture.track(452.0, 3.0));
        assert_eq!(gesture.finish(452.0, MIN_CLIP_SECS), store);
    }

    #[test]
    fn test_move_drop_reorders_and_packs() {
        let (store, ids) = three_clips();
        let geometry = TrackGeometry::new(900.0, 9.0);
        let mut gesture = Gesture::begin(GestureKind::Move(ids[2]), 750.0, store.clone(), geometry);

        assert!(gesture.track(50.0, 3.0));
        let live = gesture.preview(50.0, MIN_CLIP_SECS);
        assert_eq!(live.get(ids[2]).unwrap().output_start, 0.0);
        assert_eq!(live.get(ids[2]).unwrap().order, 2.0);

        let committed = gesture.finish(50.0, MIN_CLIP_SECS);
        let order: Vec<SegmentId> = committed.all_segments().iter().map(|s| s.id).collect();
        assert_eq!(order, vec![ids[2], ids[0], ids[1]]);
        let starts: Vec<f64> = committed.all_segments().iter().map(|s| s.output_start).collect();
        assert_eq!(starts, vec![0.0, 3.0, 6.0]);
    }

    #[test]
    fn test_drop_index_counts_midpoints() {
        let (store, ids) = three_clips();
        assert_eq!(drop_index(&store, ids[0], 3.6), 1);
        assert_eq!(drop_index(&store, ids[0], 7.0), 2);
        assert_eq!(drop_index(&store, ids[0], 0.0), 0);
    }
}
