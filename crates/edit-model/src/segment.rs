//! The segment store: how output time maps onto ranges of source time.
//!
//! A recording starts as one segment spanning the whole source. Splits,
//! soft deletes, trims, moves, and reorders each produce a new store;
//! the source itself is never touched.
//!
//! # Sequencing
//!
//! `order` is the authoritative sequencing key. `output_start` is a
//! display coordinate for the timeline and may be stale or overlapping
//! after a drag. Anything that needs one linear timeline (playback,
//! render) walks [`SegmentStore::ordered_segments`] and sums
//! [`Segment::clip_duration`].

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::range::TimeRange;

/// Splits closer than this to either end of the source are rejected.
pub const SPLIT_EDGE_GUARD_SECS: f64 = 0.1;

/// Content a trim gesture must leave in a clip.
pub const MIN_CLIP_SECS: f64 = 0.5;

/// Opaque segment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(Uuid);

impl SegmentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SegmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Soft-delete status. A deleted segment keeps all of its geometry so a
/// restore puts it back exactly where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStatus {
    #[default]
    Active,
    Deleted,
}

/// A contiguous reference into the source recording, placed on the
/// output timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,

    /// Source-time start of the referenced range (seconds).
    pub original_start: f64,

    /// Source-time end of the referenced range (seconds).
    pub original_end: f64,

    /// Seconds hidden at the start of the range. Reversible.
    pub trim_start: f64,

    /// Seconds hidden at the end of the range. Reversible.
    pub trim_end: f64,

    /// Position on the output timeline (display coordinate).
    pub output_start: f64,

    /// Dense rank used to linearize segments.
    pub order: f64,

    #[serde(default)]
    pub status: SegmentStatus,
}

impl Segment {
    /// A fresh segment covering `[0, duration)` with no trims.
    pub fn full_span(duration: f64) -> Self {
        Self {
            id: SegmentId::new(),
            original_start: 0.0,
            original_end: duration,
            trim_start: 0.0,
            trim_end: 0.0,
            output_start: 0.0,
            order: 0.0,
            status: SegmentStatus::Active,
        }
    }

    pub fn effective_start(&self) -> f64 {
        self.original_start + self.trim_start
    }

    pub fn effective_end(&self) -> f64 {
        self.original_end - self.trim_end
    }

    /// Playable length after trims.
    pub fn clip_duration(&self) -> f64 {
        self.effective_end() - self.effective_start()
    }

    /// Length of the referenced source range, ignoring trims.
    pub fn original_duration(&self) -> f64 {
        self.original_end - self.original_start
    }

    /// Where this clip ends on the output timeline (display coordinate).
    pub fn output_end(&self) -> f64 {
        self.output_start + self.clip_duration()
    }

    pub fn effective_range(&self) -> TimeRange {
        TimeRange {
            start: self.effective_start(),
            end: self.effective_end(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.status == SegmentStatus::Deleted
    }

    pub fn is_active(&self) -> bool {
        self.status == SegmentStatus::Active
    }

    /// Whether `t` is strictly inside the effective range. Boundary
    /// points are excluded so a split never yields an empty child.
    pub fn contains_source_time(&self, t: f64) -> bool {
        t > self.effective_start() && t < self.effective_end()
    }

    /// Largest value one trim may take, given the opposite trim, while
    /// keeping at least `min_clip_secs` of content. Never negative.
    pub fn max_trim(&self, other_trim: f64, min_clip_secs: f64) -> f64 {
        (self.original_duration() - other_trim - min_clip_secs).max(0.0)
    }
}

/// A single structural or geometric edit, as issued by the timeline or
/// an edit script.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentEdit {
    Split { at: f64 },
    Delete { id: SegmentId },
    Restore { id: SegmentId },
    Trim {
        id: SegmentId,
        trim_start: f64,
        trim_end: f64,
    },
    Move { id: SegmentId, output_start: f64 },
    Reorder { id: SegmentId, index: usize },
}

/// Ordered list of segments for one source recording.
///
/// The backing vector is always sorted by `order`, and `order` is
/// `0..n-1` after every structural change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentStore {
    segments: Vec<Segment>,
    source_duration: f64,
}

impl SegmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list with one full-span segment.
    ///
    /// No-op if segments already exist, so repeated initialization from
    /// several views cannot clobber edits. Non-positive durations are
    /// ignored.
    pub fn initialize(&self, duration: f64) -> Self {
        if !self.segments.is_empty() {
            tracing::trace!("Initialize skipped: store already populated");
            return self.clone();
        }
        if !(duration.is_finite() && duration > 0.0) {
            tracing::debug!(duration, "Initialize rejected: invalid duration");
            return self.clone();
        }

        tracing::debug!(duration, "Segment store initialized");
        Self {
            segments: vec![Segment::full_span(duration)],
            source_duration: duration,
        }
    }

    /// Tear the store down, ready for a new source.
    pub fn reset(&self) -> Self {
        Self::default()
    }

    /// Split the active segment containing source time `t` in two.
    ///
    /// Rejected when `t` is within [`SPLIT_EDGE_GUARD_SECS`] of either
    /// end of the source, or when no active segment contains it.
    pub fn split_at_time(&self, t: f64) -> Self {
        if !t.is_finite()
            || t <= SPLIT_EDGE_GUARD_SECS
            || t >= self.source_duration - SPLIT_EDGE_GUARD_SECS
        {
            tracing::trace!(at = t, "Split rejected: too close to a timeline edge");
            return self.clone();
        }

        let Some(index) = self
            .segments
            .iter()
            .position(|s| s.is_active() && s.contains_source_time(t))
        else {
            tracing::trace!(at = t, "Split rejected: no active segment contains time");
            return self.clone();
        };

        let parent = &self.segments[index];
        let left = Segment {
            original_end: t,
            trim_end: 0.0,
            ..parent.clone()
        };
        let right = Segment {
            id: SegmentId::new(),
            original_start: t,
            trim_start: 0.0,
            output_start: left.output_start + left.clip_duration(),
            order: parent.order + 0.5,
            ..parent.clone()
        };

        tracing::debug!(
            at = t,
            left = %left.id,
            right = %right.id,
            "Segment split"
        );

        let mut segments = self.segments.clone();
        segments[index] = left;
        segments.push(right);
        sort_by_order(&mut segments);
        renumber(&mut segments);

        self.with_segments(segments)
    }

    /// Soft-delete a segment. Geometry is left untouched.
    pub fn delete_segment(&self, id: SegmentId) -> Self {
        self.set_status(id, SegmentStatus::Deleted)
    }

    /// Undo a soft delete.
    pub fn restore_segment(&self, id: SegmentId) -> Self {
        self.set_status(id, SegmentStatus::Active)
    }

    /// Set both trims. Negative values are clamped to zero; the minimum
    /// remaining content is the caller's responsibility.
    pub fn trim_segment(&self, id: SegmentId, trim_start: f64, trim_end: f64) -> Self {
        self.update(id, |segment| {
            segment.trim_start = trim_start.max(0.0);
            segment.trim_end = trim_end.max(0.0);
            tracing::debug!(
                segment_id = %segment.id,
                trim_start = segment.trim_start,
                trim_end = segment.trim_end,
                "Segment trimmed"
            );
        })
    }

    /// Move a segment on the output timeline. Overlaps are not resolved.
    pub fn move_segment(&self, id: SegmentId, new_output_start: f64) -> Self {
        self.update(id, |segment| {
            segment.output_start = new_output_start.max(0.0);
            tracing::debug!(
                segment_id = %segment.id,
                output_start = segment.output_start,
                "Segment moved"
            );
        })
    }

    /// Move a segment to `new_index` in the order sequence. Indexes past
    /// the end append. `output_start` is untouched.
    pub fn reorder_segments(&self, id: SegmentId, new_index: usize) -> Self {
        let Some(position) = self.position(id) else {
            tracing::trace!(segment_id = %id, "Reorder rejected: unknown segment");
            return self.clone();
        };

        let mut segments = self.segments.clone();
        let segment = segments.remove(position);
        let index = new_index.min(segments.len());
        segments.insert(index, segment);
        renumber(&mut segments);

        tracing::debug!(segment_id = %id, from = position, to = index, "Segment reordered");
        self.with_segments(segments)
    }

    /// Lay every segment end to end in `order` sequence, deleted ones
    /// included so a later restore lands in its own slot.
    pub fn pack_output_starts(&self) -> Self {
        let mut segments = self.segments.clone();
        let mut cursor = 0.0;
        for segment in &mut segments {
            segment.output_start = cursor;
            cursor += segment.clip_duration();
        }
        self.with_segments(segments)
    }

    /// Apply one edit.
    pub fn apply(&self, edit: &SegmentEdit) -> Self {
        match *edit {
            SegmentEdit::Split { at } => self.split_at_time(at),
            SegmentEdit::Delete { id } => self.delete_segment(id),
            SegmentEdit::Restore { id } => self.restore_segment(id),
            SegmentEdit::Trim {
                id,
                trim_start,
                trim_end,
            } => self.trim_segment(id, trim_start, trim_end),
            SegmentEdit::Move { id, output_start } => self.move_segment(id, output_start),
            SegmentEdit::Reorder { id, index } => self.reorder_segments(id, index),
        }
    }

    /// Active segments in playback order. The canonical read path for
    /// the timeline and the render builder.
    pub fn ordered_segments(&self) -> Vec<&Segment> {
        self.segments.iter().filter(|s| s.is_active()).collect()
    }

    /// The active segment playing at output time `t`, placing clips end
    /// to end in order. The last clip owns its end point.
    pub fn segment_at_output_time(&self, t: f64) -> Option<&Segment> {
        if !(t.is_finite() && t >= 0.0) {
            return None;
        }
        let ordered = self.ordered_segments();
        let mut cursor = 0.0;
        let count = ordered.len();
        for (i, segment) in ordered.into_iter().enumerate() {
            let end = cursor + segment.clip_duration();
            if t < end || (i + 1 == count && t <= end) {
                return Some(segment);
            }
            cursor = end;
        }
        None
    }

    /// Every segment, deleted included, in order.
    pub fn all_segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Duration of the source this store was initialized with.
    pub fn source_duration(&self) -> f64 {
        self.source_duration
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn position(&self, id: SegmentId) -> Option<usize> {
        self.segments.iter().position(|s| s.id == id)
    }

    fn set_status(&self, id: SegmentId, status: SegmentStatus) -> Self {
        self.update(id, |segment| {
            segment.status = status;
            tracing::debug!(segment_id = %segment.id, ?status, "Segment status changed");
        })
    }

    fn update(&self, id: SegmentId, f: impl FnOnce(&mut Segment)) -> Self {
        let Some(position) = self.position(id) else {
            tracing::trace!(segment_id = %id, "Edit rejected: unknown segment");
            return self.clone();
        };
        let mut segments = self.segments.clone();
        f(&mut segments[position]);
        self.with_segments(segments)
    }

    fn with_segments(&self, segments: Vec<Segment>) -> Self {
        Self {
            segments,
            source_duration: self.source_duration,
        }
    }
}

fn sort_by_order(segments: &mut [Segment]) {
    segments.sort_by(|a, b| a.order.total_cmp(&b.order));
}

fn renumber(segments: &mut [Segment]) {
    for (i, segment) in segments.iter_mut().enumerate() {
        segment.order = i as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(duration: f64) -> SegmentStore {
        SegmentStore::new().initialize(duration)
    }

    fn ranges(store: &SegmentStore) -> Vec<(f64, f64)> {
        store
            .ordered_segments()
            .iter()
            .map(|s| (s.effective_start(), s.effective_end()))
            .collect()
    }

    #[test]
    fn test_initialize_creates_full_span() {
        let store = store(10.0);
        assert_eq!(store.len(), 1);
        let s = &store.all_segments()[0];
        assert_eq!((s.original_start, s.original_end), (0.0, 10.0));
        assert_eq!((s.trim_start, s.trim_end, s.output_start, s.order), (0.0, 0.0, 0.0, 0.0));
        assert!(s.is_active());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let first = store(10.0).split_at_time(4.0);
        let second = first.initialize(30.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_initialize_ignores_invalid_duration() {
        assert!(SegmentStore::new().initialize(0.0).is_empty());
        assert!(SegmentStore::new().initialize(f64::NAN).is_empty());
    }

    #[test]
    fn test_split_produces_adjacent_children() {
        let original = store(10.0);
        let parent_id = original.all_segments()[0].id;
        let split = original.split_at_time(4.0);

        let all = split.all_segments();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, parent_id);
        assert_eq!((all[0].original_start, all[0].original_end), (0.0, 4.0));
        assert_eq!((all[1].original_start, all[1].original_end), (4.0, 10.0));
        assert_eq!(all[0].output_start, 0.0);
        assert_eq!(all[1].output_start, 4.0);
        assert_eq!((all[0].order, all[1].order), (0.0, 1.0));
    }

    #[test]
    fn test_split_keeps_outer_trims_on_the_right_child() {
        let s = store(10.0);
        let id = s.all_segments()[0].id;
        let split = s.trim_segment(id, 1.0, 2.0).split_at_time(5.0);

        let all = split.all_segments();
        assert_eq!((all[0].trim_start, all[0].trim_end), (1.0, 0.0));
        assert_eq!((all[1].trim_start, all[1].trim_end), (0.0, 2.0));
        assert_eq!(all[1].output_start, 4.0);
    }

    #[test]
    fn test_split_rejected_near_edges() {
        let s = store(10.0);
        assert_eq!(s.split_at_time(0.05), s);
        assert_eq!(s.split_at_time(0.1), s);
        assert_eq!(s.split_at_time(9.95), s);
        assert_eq!(s.split_at_time(f64::INFINITY), s);
    }

    #[test]
    fn test_split_rejected_inside_deleted_segment() {
        let s = store(10.0).split_at_time(4.0);
        let second = s.all_segments()[1].id;
        let deleted = s.delete_segment(second);
        assert_eq!(deleted.split_at_time(6.0), deleted);
    }

    #[test]
    fn test_split_rejected_on_existing_boundary() {
        let s = store(10.0).split_at_time(4.0);
        assert_eq!(s.split_at_time(4.0), s);
    }

    #[test]
    fn test_split_delete_restore_scenario() {
        let s = store(10.0).split_at_time(4.0);
        let second = s.all_segments()[1].id;

        let deleted = s.delete_segment(second);
        assert_eq!(ranges(&deleted), vec![(0.0, 4.0)]);

        let restored = deleted.restore_segment(second);
        assert_eq!(ranges(&restored), vec![(0.0, 4.0), (4.0, 10.0)]);
        let starts: Vec<f64> = restored.all_segments().iter().map(|s| s.output_start).collect();
        assert_eq!(starts, vec![0.0, 4.0]);
        assert_eq!(restored, s);
    }

    #[test]
    fn test_trim_clamps_negative_values() {
        let s = store(10.0);
        let id = s.all_segments()[0].id;
        let trimmed = s.trim_segment(id, -1.0, 2.0);
        let seg = trimmed.get(id).unwrap();
        assert_eq!((seg.trim_start, seg.trim_end), (0.0, 2.0));
        assert_eq!(seg.clip_duration(), 8.0);
    }

    #[test]
    fn test_move_clamps_to_zero_and_keeps_order() {
        let s = store(10.0).split_at_time(4.0);
        let second = s.all_segments()[1].id;
        let moved = s.move_segment(second, -3.0);
        assert_eq!(moved.get(second).unwrap().output_start, 0.0);
        assert_eq!(moved.get(second).unwrap().order, 1.0);
    }

    #[test]
    fn test_reorder_moves_segment_and_renumbers() {
        let s = store(10.0).split_at_time(3.0).split_at_time(6.0);
        let ids: Vec<SegmentId> = s.all_segments().iter().map(|s| s.id).collect();

        let reordered = s.reorder_segments(ids[2], 0);
        let new_ids: Vec<SegmentId> = reordered.all_segments().iter().map(|s| s.id).collect();
        assert_eq!(new_ids, vec![ids[2], ids[0], ids[1]]);
        let orders: Vec<f64> = reordered.all_segments().iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0.0, 1.0, 2.0]);
        assert_eq!(
            reordered.get(ids[2]).unwrap().output_start,
            s.get(ids[2]).unwrap().output_start
        );
    }

    #[test]
    fn test_reorder_past_end_appends() {
        let s = store(10.0).split_at_time(3.0).split_at_time(6.0);
        let first = s.all_segments()[0].id;
        let reordered = s.reorder_segments(first, 99);
        assert_eq!(reordered.all_segments()[2].id, first);
    }

    #[test]
    fn test_pack_output_starts_follows_order() {
        let s = store(10.0).split_at_time(3.0).split_at_time(6.0);
        let ids: Vec<SegmentId> = s.all_segments().iter().map(|s| s.id).collect();
        let packed = s
            .move_segment(ids[0], 20.0)
            .reorder_segments(ids[2], 0)
            .pack_output_starts();

        let starts: Vec<f64> = packed.all_segments().iter().map(|s| s.output_start).collect();
        assert_eq!(starts, vec![0.0, 4.0, 7.0]);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let s = store(10.0);
        let stranger = SegmentId::new();
        assert_eq!(s.delete_segment(stranger), s);
        assert_eq!(s.trim_segment(stranger, 1.0, 1.0), s);
        assert_eq!(s.move_segment(stranger, 2.0), s);
        assert_eq!(s.reorder_segments(stranger, 0), s);
    }

    #[test]
    fn test_apply_dispatches_edits() {
        let s = store(10.0);
        let id = s.all_segments()[0].id;
        let edited = s
            .apply(&SegmentEdit::Split { at: 5.0 })
            .apply(&SegmentEdit::Delete { id });
        assert_eq!(ranges(&edited), vec![(5.0, 10.0)]);
    }

    #[test]
    fn test_segment_at_output_time_ignores_output_start() {
        let s = store(10.0).split_at_time(4.0);
        let ids: Vec<SegmentId> = s.all_segments().iter().map(|s| s.id).collect();
        let reordered = s.reorder_segments(ids[1], 0).move_segment(ids[0], 50.0);

        assert_eq!(reordered.segment_at_output_time(1.0).unwrap().id, ids[1]);
        assert_eq!(reordered.segment_at_output_time(6.5).unwrap().id, ids[0]);
        assert_eq!(reordered.segment_at_output_time(10.0).unwrap().id, ids[0]);
        assert!(reordered.segment_at_output_time(10.5).is_none());
    }

    #[test]
    fn test_max_trim_keeps_minimum_clip() {
        let segment = Segment::full_span(10.0);
        assert_eq!(segment.max_trim(2.0, MIN_CLIP_SECS), 7.5);
        assert_eq!(Segment::full_span(0.4).max_trim(0.0, MIN_CLIP_SECS), 0.0);
    }
}
