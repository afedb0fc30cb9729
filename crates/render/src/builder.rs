//! Projects an edit session onto a render request.
//!
//! Two entry points, one per editing model. A session uses either its
//! segment store or its deletion list to describe the cut; the builder
//! never reconciles the two.

use reelcut_edit_model::{DeletionList, EditSession, SegmentStore};

use crate::request::{CutRange, KeepRange, RenderRequest, RenderTimeline};

/// Active segments as source ranges, in `order` sequence.
pub fn keep_ranges(store: &SegmentStore) -> Vec<KeepRange> {
    store
        .ordered_segments()
        .into_iter()
        .filter(|s| s.clip_duration() > 0.0)
        .map(|s| KeepRange {
            source_start: s.effective_start(),
            source_end: s.effective_end(),
        })
        .collect()
}

/// Deletions clamped to the source, sorted by start. Overlaps are kept.
pub fn deletion_cuts(deletions: &DeletionList, source_duration: f64) -> Vec<CutRange> {
    deletions
        .edits()
        .iter()
        .filter_map(|d| d.range().clamp_to(source_duration))
        .map(|r| CutRange {
            start: r.start,
            end: r.end,
        })
        .collect()
}

/// Builds [`RenderRequest`]s from an [`EditSession`].
pub struct RenderRequestBuilder;

impl RenderRequestBuilder {
    /// Keep exactly the active segments, in playback order.
    pub fn from_segments(session: &EditSession) -> RenderRequest {
        let ranges = keep_ranges(&session.segments);
        let output_duration = ranges.iter().map(KeepRange::duration).sum();

        tracing::debug!(
            source_id = %session.source.id,
            ranges = ranges.len(),
            output_duration,
            "Built keep-range render request"
        );

        Self::request(
            session,
            RenderTimeline::KeepRanges {
                ranges,
                output_duration,
            },
        )
    }

    /// Keep the whole source except the deletion list.
    pub fn from_deletions(session: &EditSession) -> RenderRequest {
        let source_duration = session.source.duration_secs;
        let cuts = deletion_cuts(&session.deletions, source_duration);

        tracing::debug!(
            source_id = %session.source.id,
            cuts = cuts.len(),
            source_duration,
            "Built deletion render request"
        );

        Self::request(
            session,
            RenderTimeline::Deletions {
                cuts,
                source_duration,
            },
        )
    }

    fn request(session: &EditSession, timeline: RenderTimeline) -> RenderRequest {
        RenderRequest {
            source_id: session.source.id.clone(),
            timeline,
            voice_edits: session.voice_edits.clone(),
            visual_replacements: session.visual_replacements.clone(),
            bubble: session
                .source
                .camera_id
                .as_ref()
                .map(|_| session.bubble.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcut_edit_model::{NewDeletion, SegmentEdit, SourceMedia};

    fn session(camera: bool) -> EditSession {
        EditSession::new(SourceMedia {
            id: "vid-1".into(),
            duration_secs: 10.0,
            camera_id: camera.then(|| "cam-1".to_string()),
        })
        .unwrap()
    }

    #[test]
    fn test_keep_ranges_follow_order_and_trims() {
        let mut s = session(false);
        s.apply_segment_edit(&SegmentEdit::Split { at: 4.0 });
        let ids: Vec<_> = s.segments.all_segments().iter().map(|seg| seg.id).collect();
        s.apply_segment_edit(&SegmentEdit::Reorder { id: ids[1], index: 0 });
        s.apply_segment_edit(&SegmentEdit::Trim {
            id: ids[0],
            trim_start: 1.0,
            trim_end: 0.0,
        });

        let request = RenderRequestBuilder::from_segments(&s);
        match &request.timeline {
            RenderTimeline::KeepRanges {
                ranges,
                output_duration,
            } => {
                assert_eq!(
                    ranges,
                    &vec![
                        KeepRange { source_start: 4.0, source_end: 10.0 },
                        KeepRange { source_start: 1.0, source_end: 4.0 },
                    ]
                );
                assert!((output_duration - 9.0).abs() < 1e-9);
            }
            other => panic!("unexpected timeline: {other:?}"),
        }
        assert!(request.bubble.is_none());
    }

    #[test]
    fn test_deleted_segments_are_left_out() {
        let mut s = session(false);
        s.apply_segment_edit(&SegmentEdit::Split { at: 3.0 });
        s.apply_segment_edit(&SegmentEdit::Split { at: 6.0 });
        let middle = s.segments.all_segments()[1].id;
        s.apply_segment_edit(&SegmentEdit::Delete { id: middle });

        let request = RenderRequestBuilder::from_segments(&s);
        let kept: Vec<(f64, f64)> = request
            .timeline
            .resolved_ranges()
            .iter()
            .map(|r| (r.start, r.end))
            .collect();
        assert_eq!(kept, vec![(0.0, 3.0), (6.0, 10.0)]);
        assert!((request.timeline.output_duration() - s.output_duration()).abs() < 1e-9);
    }

    #[test]
    fn test_deletion_request_keeps_overlaps_for_renderer() {
        let mut s = session(true);
        let (list, _) = s.deletions.add_deletion(NewDeletion::manual(2.5, 4.0));
        let (list, _) = list.add_deletion(NewDeletion::manual(2.0, 3.0));
        let (list, _) = list.add_deletion(NewDeletion::manual(9.0, 12.0));
        s.deletions = list;

        let request = RenderRequestBuilder::from_deletions(&s);
        match &request.timeline {
            RenderTimeline::Deletions {
                cuts,
                source_duration,
            } => {
                assert_eq!(*source_duration, 10.0);
                assert_eq!(
                    cuts,
                    &vec![
                        CutRange { start: 2.0, end: 3.0 },
                        CutRange { start: 2.5, end: 4.0 },
                        CutRange { start: 9.0, end: 10.0 },
                    ]
                );
            }
            other => panic!("unexpected timeline: {other:?}"),
        }
        assert!((request.timeline.output_duration() - 7.0).abs() < 1e-9);
        assert_eq!(request.bubble, Some(s.bubble.clone()));
    }

    #[test]
    fn test_segment_and_deletion_models_are_independent() {
        let mut s = session(false);
        let (list, _) = s.deletions.add_deletion(NewDeletion::manual(1.0, 2.0));
        s.deletions = list;

        let from_segments = RenderRequestBuilder::from_segments(&s);
        assert!((from_segments.timeline.output_duration() - 10.0).abs() < 1e-9);
        let from_deletions = RenderRequestBuilder::from_deletions(&s);
        assert!((from_deletions.timeline.output_duration() - 9.0).abs() < 1e-9);
    }
}
