//! Edit scripts: a recorded sequence of edits replayed onto a fresh
//! session.
//!
//! ```json
//! {
//!   "source": { "id": "demo", "duration_secs": 60.0 },
//!   "edits": [
//!     { "op": "split", "at": 12.0 },
//!     { "op": "delete", "segment": 1 },
//!     { "op": "add_deletion", "start": 3.0, "end": 3.4 }
//!   ]
//! }
//! ```
//!
//! `segment` indexes the store's order-sorted list, deleted segments
//! included, as it stands when the op runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bubble::BubbleSettings;
use crate::deletion::{DeletionReason, NewDeletion};
use crate::error::EditError;
use crate::filler::DetectedFiller;
use crate::replacement::{VisualReplacement, VoiceSubstitution};
use crate::segment::{SegmentEdit, SegmentId};
use crate::session::{EditSession, SourceMedia};
use crate::transcript::Transcript;

/// One scripted operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptOp {
    Split {
        at: f64,
    },
    Delete {
        segment: usize,
    },
    Restore {
        segment: usize,
    },
    /// Trims are clamped so the clip keeps its minimum length.
    Trim {
        segment: usize,
        #[serde(default)]
        trim_start: f64,
        #[serde(default)]
        trim_end: f64,
    },
    Move {
        segment: usize,
        output_start: f64,
    },
    Reorder {
        segment: usize,
        index: usize,
    },
    /// Delete transcript words, grouped into contiguous runs.
    DeleteWords {
        word_ids: Vec<String>,
    },
    AddDeletion {
        start: f64,
        end: f64,
        #[serde(default)]
        reason: DeletionReason,
    },
    /// Apply the script's filler candidates: all of them, or just `ids`.
    ApplyFillers {
        #[serde(default)]
        ids: Option<Vec<String>>,
    },
    Bubble(BubbleSettings),
    ReplaceVisual(VisualReplacement),
    SubstituteVoice(VoiceSubstitution),
}

/// A source plus the edits to replay onto it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditScript {
    pub source: SourceMedia,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Transcript>,

    /// Candidates from a previous detection pass, used by `apply_fillers`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fillers: Vec<DetectedFiller>,

    #[serde(default)]
    pub edits: Vec<ScriptOp>,
}

/// Tunables for replay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayOptions {
    /// Word gap that splits a selection into separate deletions.
    pub word_gap_secs: f64,
    /// Content every trimmed clip keeps.
    pub min_clip_secs: f64,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            word_gap_secs: crate::deletion::WORD_GROUP_GAP_SECS,
            min_clip_secs: crate::segment::MIN_CLIP_SECS,
        }
    }
}

impl EditScript {
    /// Load a script from a JSON file.
    pub fn load(path: &Path) -> Result<Self, EditError> {
        let content = std::fs::read_to_string(path).map_err(|source| EditError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| EditError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, EditError> {
        serde_json::from_str(json).map_err(|e| EditError::invalid_script(e.to_string()))
    }

    /// Build a session and apply every op in sequence.
    ///
    /// Ops that the editor would silently ignore (a split on a boundary)
    /// are ignored here too. Ops that cannot be resolved at all (a
    /// segment index out of range) fail the replay.
    pub fn replay(&self, options: ReplayOptions) -> Result<EditSession, EditError> {
        let mut session = EditSession::new(self.source.clone())?;
        if let Some(transcript) = &self.transcript {
            session = session.with_transcript(transcript.clone());
        }

        for (step, op) in self.edits.iter().enumerate() {
            self.apply_op(&mut session, op, options)?;
            tracing::trace!(step, ?op, "Script op applied");
        }

        tracing::info!(
            source_id = %self.source.id,
            ops = self.edits.len(),
            segments = session.segments.len(),
            deletions = session.deletions.len(),
            "Edit script replayed"
        );
        Ok(session)
    }

    fn apply_op(
        &self,
        session: &mut EditSession,
        op: &ScriptOp,
        options: ReplayOptions,
    ) -> Result<(), EditError> {
        match op {
            ScriptOp::Split { at } => {
                session.apply_segment_edit(&SegmentEdit::Split { at: *at });
            }
            ScriptOp::Delete { segment } => {
                let id = segment_id(session, *segment)?;
                session.apply_segment_edit(&SegmentEdit::Delete { id });
            }
            ScriptOp::Restore { segment } => {
                let id = segment_id(session, *segment)?;
                session.apply_segment_edit(&SegmentEdit::Restore { id });
            }
            ScriptOp::Trim {
                segment,
                trim_start,
                trim_end,
            } => {
                let id = segment_id(session, *segment)?;
                let (trim_start, trim_end) = session
                    .segments
                    .get(id)
                    .map(|s| {
                        let start = trim_start.max(0.0).min(s.max_trim(0.0, options.min_clip_secs));
                        let end = trim_end.max(0.0).min(s.max_trim(start, options.min_clip_secs));
                        (start, end)
                    })
                    .unwrap_or((0.0, 0.0));
                session.apply_segment_edit(&SegmentEdit::Trim {
                    id,
                    trim_start,
                    trim_end,
                });
            }
            ScriptOp::Move {
                segment,
                output_start,
            } => {
                let id = segment_id(session, *segment)?;
                session.apply_segment_edit(&SegmentEdit::Move {
                    id,
                    output_start: *output_start,
                });
            }
            ScriptOp::Reorder { segment, index } => {
                let id = segment_id(session, *segment)?;
                session.apply_segment_edit(&SegmentEdit::Reorder { id, index: *index });
            }
            ScriptOp::DeleteWords { word_ids } => {
                if session.transcript.is_none() {
                    return Err(EditError::invalid_script(
                        "delete_words used without a transcript",
                    ));
                }
                session.delete_words(word_ids, options.word_gap_secs);
            }
            ScriptOp::AddDeletion { start, end, reason } => {
                let (deletions, id) = session.deletions.add_deletion(NewDeletion {
                    start_time: *start,
                    end_time: *end,
                    reason: *reason,
                    ..NewDeletion::default()
                });
                if id.is_none() {
                    return Err(EditError::InvalidRange {
                        start: *start,
                        end: *end,
                    });
                }
                session.deletions = deletions;
            }
            ScriptOp::ApplyFillers { ids } => {
                let staged = session.deletions.with_candidates(self.fillers.clone());
                session.deletions = match ids {
                    Some(ids) => staged.apply_filler_deletions(ids),
                    None => staged.apply_all_fillers(),
                };
            }
            ScriptOp::Bubble(settings) => {
                session.bubble = settings.with_size(settings.size);
            }
            ScriptOp::ReplaceVisual(replacement) => {
                session.add_visual_replacement(replacement.clone())?;
            }
            ScriptOp::SubstituteVoice(edit) => {
                session.add_voice_substitution(edit.clone())?;
            }
        }
        Ok(())
    }
}

fn segment_id(session: &EditSession, index: usize) -> Result<SegmentId, EditError> {
    session
        .segments
        .all_segments()
        .get(index)
        .map(|s| s.id)
        .ok_or(EditError::UnknownSegment {
            index,
            count: session.segments.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubble::BubblePosition;

    fn replay(json: &str) -> Result<EditSession, EditError> {
        EditScript::from_json(json)?.replay(ReplayOptions::default())
    }

    #[test]
    fn test_split_delete_restore_script() {
        let session = replay(
            r#"{
                "source": {"id": "v", "duration_secs": 10.0},
                "edits": [
                    {"op": "split", "at": 4.0},
                    {"op": "delete", "segment": 1},
                    {"op": "restore", "segment": 1},
                    {"op": "delete", "segment": 0}
                ]
            }"#,
        )
        .unwrap();

        let ordered = session.segments.ordered_segments();
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].effective_range().start, 4.0);
        assert_eq!(session.output_duration(), 6.0);
    }

    #[test]
    fn test_trim_is_clamped_to_minimum_clip() {
        let session = replay(
            r#"{
                "source": {"id": "v", "duration_secs": 4.0},
                "edits": [{"op": "trim", "segment": 0, "trim_start": 3.0, "trim_end": 3.0}]
            }"#,
        )
        .unwrap();
        let seg = &session.segments.all_segments()[0];
        assert_eq!(seg.trim_start, 3.0);
        assert_eq!(seg.trim_end, 0.5);
        assert!((seg.clip_duration() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_segment_fails_replay() {
        let err = replay(
            r#"{"source": {"id": "v", "duration_secs": 4.0}, "edits": [{"op": "delete", "segment": 3}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, EditError::UnknownSegment { index: 3, count: 1 }));
    }

    #[test]
    fn test_apply_selected_fillers() {
        let session = replay(
            r#"{
                "source": {"id": "v", "duration_secs": 10.0},
                "fillers": [
                    {"id": "f1", "type": "filler", "text": "um", "start": 2.0, "end": 2.5},
                    {"id": "f2", "type": "silence", "text": "[1.6s silence]", "start": 5.0, "end": 6.6}
                ],
                "edits": [{"op": "apply_fillers", "ids": ["f2"]}]
            }"#,
        )
        .unwrap();
        assert_eq!(session.deletions.len(), 1);
        assert_eq!(session.deletions.edits()[0].reason, DeletionReason::Silence);
        assert!(session.deletions.candidates().is_empty());
    }

    #[test]
    fn test_bubble_and_overlays() {
        let session = replay(
            r#"{
                "source": {"id": "v", "duration_secs": 10.0},
                "edits": [
                    {"op": "bubble", "position": "top-right", "size": 4.0},
                    {"op": "replace_visual", "x": 10, "y": 10, "width": 20, "height": 5,
                     "start_time": 1.0, "end_time": 3.0, "replacement_type": "text",
                     "replacement_value": "Acme"},
                    {"op": "substitute_voice", "original_text": "Hi Bob", "new_text": "Hi Alice",
                     "start_time": 0.2, "end_time": 0.9}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(session.bubble.position, BubblePosition::TopRight);
        assert_eq!(session.bubble.size, 1.0);
        assert_eq!(session.visual_replacements.len(), 1);
        assert_eq!(session.voice_edits[0].new_text, "Hi Alice");
    }

    #[test]
    fn test_empty_deletion_fails_replay() {
        let err = replay(
            r#"{"source": {"id": "v", "duration_secs": 4.0}, "edits": [{"op": "add_deletion", "start": 2.0, "end": 1.0}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, EditError::InvalidRange { .. }));
    }

    #[test]
    fn test_delete_words_requires_transcript() {
        let err = replay(
            r#"{"source": {"id": "v", "duration_secs": 4.0}, "edits": [{"op": "delete_words", "word_ids": ["w1"]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, EditError::InvalidScript { .. }));
    }
}
