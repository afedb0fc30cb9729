//! Output-to-source mapping for playback.
//!
//! The player reads the immutable source, so it only knows source time.
//! An [`OutputMap`] lays the kept ranges end to end in playback order,
//! and a [`PlaybackCursor`] watches the player's position and tells it
//! to jump whenever the current range runs out. Source frames between
//! kept ranges are never shown, however the segments were reordered.

use reelcut_common::TIME_EPSILON;
use reelcut_edit_model::{complement_ranges, DeletionList, SegmentId, SegmentStore, TimeRange};

/// One kept source range placed on the output timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappedRange {
    /// The segment this came from. `None` for deletion-model ranges.
    pub segment: Option<SegmentId>,
    pub source: TimeRange,
    pub output_start: f64,
}

impl MappedRange {
    pub fn output_end(&self) -> f64 {
        self.output_start + self.source.duration()
    }
}

/// Kept source ranges in playback order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputMap {
    ranges: Vec<MappedRange>,
    duration: f64,
}

impl OutputMap {
    /// Walk the active segments in order, summing clip durations.
    /// `output_start` on the segments is not consulted.
    pub fn from_segments(store: &SegmentStore) -> Self {
        Self::build(
            store
                .ordered_segments()
                .iter()
                .filter_map(|s| TimeRange::new(s.effective_start(), s.effective_end()).map(|r| (Some(s.id), r))),
        )
    }

    /// Everything in the source except the merged deletions.
    pub fn from_deletions(deletions: &DeletionList, source_duration: f64) -> Self {
        let cuts = deletions.merged_ranges();
        Self::build(
            complement_ranges(&cuts, source_duration)
                .into_iter()
                .map(|r| (None, r)),
        )
    }

    fn build(ranges: impl Iterator<Item = (Option<SegmentId>, TimeRange)>) -> Self {
        let mut cursor = 0.0;
        let ranges: Vec<MappedRange> = ranges
            .map(|(segment, source)| {
                let mapped = MappedRange {
                    segment,
                    source,
                    output_start: cursor,
                };
                cursor += source.duration();
                mapped
            })
            .collect();
        Self {
            ranges,
            duration: cursor,
        }
    }

    pub fn ranges(&self) -> &[MappedRange] {
        &self.ranges
    }

    /// Total output length.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Source time shown at output time `t`. The final instant maps to
    /// the end of the last range.
    pub fn output_to_source(&self, t: f64) -> Option<f64> {
        let last = self.ranges.last()?;
        if t < 0.0 || t > self.duration + TIME_EPSILON {
            return None;
        }
        let range = self
            .ranges
            .iter()
            .find(|r| t < r.output_end())
            .unwrap_or(last);
        Some((range.source.start + (t - range.output_start)).min(range.source.end))
    }

    /// Output time at which source time `t` plays, if it is kept. When
    /// the same source time is kept twice the first occurrence wins.
    pub fn source_to_output(&self, t: f64) -> Option<f64> {
        self.ranges
            .iter()
            .find(|r| r.source.contains(t))
            .map(|r| r.output_start + (t - r.source.start))
    }

    fn position_containing(&self, t: f64) -> Option<usize> {
        self.ranges.iter().position(|r| r.source.contains(t))
    }
}

/// What the player should do after reporting its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackStep {
    Continue,
    /// Jump the player to this source time.
    SeekSource(f64),
    /// Nothing left to play.
    End,
}

/// Tracks which kept range is playing.
#[derive(Debug, Clone, Default)]
pub struct PlaybackCursor {
    map: OutputMap,
    current: Option<usize>,
}

impl PlaybackCursor {
    pub fn new(map: OutputMap) -> Self {
        Self { map, current: None }
    }

    pub fn map(&self) -> &OutputMap {
        &self.map
    }

    /// Position the cursor at output time `t` and return the source time
    /// to seek the player to.
    pub fn seek_output(&mut self, t: f64) -> Option<f64> {
        let source = self.map.output_to_source(t)?;
        let ranges = self.map.ranges();
        self.current = ranges
            .iter()
            .position(|r| t < r.output_end())
            .or_else(|| ranges.len().checked_sub(1));
        Some(source)
    }

    /// Report the player's source position.
    pub fn tick(&mut self, source_time: f64) -> PlaybackStep {
        let ranges = self.map.ranges();

        if let Some(index) = self.current {
            if let Some(range) = ranges.get(index) {
                if source_time >= range.source.end - TIME_EPSILON {
                    return self.advance_from(index);
                }
                if source_time >= range.source.start - TIME_EPSILON {
                    return PlaybackStep::Continue;
                }
            }
        }

        // The player is somewhere we did not send it: find it again.
        if let Some(index) = self.map.position_containing(source_time) {
            self.current = Some(index);
            return PlaybackStep::Continue;
        }

        match ranges
            .iter()
            .enumerate()
            .filter(|(_, r)| r.source.start > source_time)
            .min_by(|a, b| a.1.source.start.total_cmp(&b.1.source.start))
        {
            Some((index, range)) => {
                self.current = Some(index);
                tracing::trace!(from = source_time, to = range.source.start, "Skipping unkept source");
                PlaybackStep::SeekSource(range.source.start)
            }
            None => {
                self.current = None;
                PlaybackStep::End
            }
        }
    }

    fn advance_from(&mut self, index: usize) -> PlaybackStep {
        match self.map.ranges().get(index + 1) {
            Some(next) => {
                self.current = Some(index + 1);
                tracing::trace!(range = index + 1, to = next.source.start, "Advancing to next range");
                PlaybackStep::SeekSource(next.source.start)
            }
            None => {
                self.current = None;
                PlaybackStep::End
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcut_edit_model::NewDeletion;

    fn reordered() -> (SegmentStore, Vec<SegmentId>) {
        let store = SegmentStore::new().initialize(10.0).split_at_time(4.0);
        let ids: Vec<SegmentId> = store.all_segments().iter().map(|s| s.id).collect();
        (store.reorder_segments(ids[1], 0), ids)
    }

    #[test]
    fn test_map_follows_order_not_output_start() {
        let (store, ids) = reordered();
        let map = OutputMap::from_segments(&store.move_segment(ids[0], 40.0));

        assert_eq!(map.duration(), 10.0);
        assert_eq!(map.ranges()[0].segment, Some(ids[1]));
        assert_eq!(map.output_to_source(0.0), Some(4.0));
        assert_eq!(map.output_to_source(6.5), Some(0.5));
        assert_eq!(map.output_to_source(10.0), Some(4.0));
        assert_eq!(map.output_to_source(10.5), None);
        assert_eq!(map.source_to_output(1.0), Some(7.0));
    }

    #[test]
    fn test_cursor_jumps_between_reordered_segments() {
        let (store, _) = reordered();
        let mut cursor = PlaybackCursor::new(OutputMap::from_segments(&store));

        assert_eq!(cursor.seek_output(0.0), Some(4.0));
        assert_eq!(cursor.tick(5.0), PlaybackStep::Continue);
        assert_eq!(cursor.tick(10.0), PlaybackStep::SeekSource(0.0));
        assert_eq!(cursor.tick(2.0), PlaybackStep::Continue);
        // Reaching 4.0 must not run on into the range already played.
        assert_eq!(cursor.tick(4.0), PlaybackStep::End);
    }

    #[test]
    fn test_cursor_skips_deleted_segment() {
        let store = SegmentStore::new().initialize(10.0).split_at_time(3.0).split_at_time(6.0);
        let middle = store.all_segments()[1].id;
        let mut cursor = PlaybackCursor::new(OutputMap::from_segments(&store.delete_segment(middle)));

        assert_eq!(cursor.seek_output(2.0), Some(2.0));
        assert_eq!(cursor.tick(3.0), PlaybackStep::SeekSource(6.0));
        assert_eq!(cursor.tick(6.1), PlaybackStep::Continue);
    }

    #[test]
    fn test_deletion_playback_skips_merged_cuts() {
        let (list, _) = DeletionList::new().add_deletion(NewDeletion::manual(2.0, 3.0));
        let (list, _) = list.add_deletion(NewDeletion::manual(2.5, 4.0));
        let map = OutputMap::from_deletions(&list, 10.0);
        assert_eq!(map.duration(), 8.0);

        let mut cursor = PlaybackCursor::new(map);
        assert_eq!(cursor.tick(1.0), PlaybackStep::Continue);
        assert_eq!(cursor.tick(2.0), PlaybackStep::SeekSource(4.0));
        // An external seek into a cut is pulled forward too.
        assert_eq!(cursor.tick(3.5), PlaybackStep::SeekSource(4.0));
        assert_eq!(cursor.tick(10.0), PlaybackStep::End);
    }

    #[test]
    fn test_empty_map_ends_immediately() {
        let store = SegmentStore::new().initialize(5.0);
        let only = store.all_segments()[0].id;
        let mut cursor = PlaybackCursor::new(OutputMap::from_segments(&store.delete_segment(only)));
        assert!(cursor.map().is_empty());
        assert_eq!(cursor.seek_output(0.0), None);
        assert_eq!(cursor.tick(0.0), PlaybackStep::End);
    }
}
