//! The per-recording editing context.
//!
//! An [`EditSession`] owns everything the editor knows about one source:
//! its segment store, deletion list, overlay and replacement marks, and
//! the transcript used for word selection. Sessions are plain values
//! handed to whoever drives them; nothing here is global.

use serde::{Deserialize, Serialize};

use crate::bubble::BubbleSettings;
use crate::deletion::{DeletionEdit, DeletionId, DeletionList};
use crate::error::EditError;
use crate::replacement::{VisualReplacement, VoiceSubstitution};
use crate::segment::{SegmentEdit, SegmentStore};
use crate::transcript::Transcript;

/// The immutable recording being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMedia {
    /// Backend identifier for the uploaded recording.
    pub id: String,

    pub duration_secs: f64,

    /// Separate camera recording, if the bubble is composited at render.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_id: Option<String>,
}

/// The undoable part of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSnapshot {
    pub segments: SegmentStore,
    pub deletions: Vec<DeletionEdit>,
}

/// Editing state for a single source recording.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub source: SourceMedia,
    pub segments: SegmentStore,
    pub deletions: DeletionList,
    pub bubble: BubbleSettings,
    pub visual_replacements: Vec<VisualReplacement>,
    pub voice_edits: Vec<VoiceSubstitution>,
    pub transcript: Option<Transcript>,
}

impl EditSession {
    /// Open a session on `source` with one full-span segment.
    pub fn new(source: SourceMedia) -> Result<Self, EditError> {
        validate_duration(source.duration_secs)?;

        let segments = SegmentStore::new().initialize(source.duration_secs);
        tracing::info!(
            source_id = %source.id,
            duration = source.duration_secs,
            "Edit session opened"
        );

        Ok(Self {
            source,
            segments,
            deletions: DeletionList::new(),
            bubble: BubbleSettings::default(),
            visual_replacements: Vec::new(),
            voice_edits: Vec::new(),
            transcript: None,
        })
    }

    /// Switch to a different recording, discarding all timeline state.
    pub fn load_source(&mut self, source: SourceMedia) -> Result<(), EditError> {
        *self = Self::new(source)?;
        Ok(())
    }

    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = Some(transcript);
        self
    }

    /// Apply a segment edit. Returns whether anything changed.
    pub fn apply_segment_edit(&mut self, edit: &SegmentEdit) -> bool {
        let next = self.segments.apply(edit);
        let changed = next != self.segments;
        self.segments = next;
        changed
    }

    /// Delete transcript words by id as grouped deletions.
    ///
    /// Unknown ids are skipped. Without a transcript nothing happens.
    pub fn delete_words(&mut self, word_ids: &[String], max_gap_secs: f64) -> Vec<DeletionId> {
        let Some(transcript) = &self.transcript else {
            tracing::debug!("Word deletion ignored: session has no transcript");
            return Vec::new();
        };
        let words = transcript.words_by_ids(word_ids);
        let (deletions, ids) = self.deletions.add_word_selection(&words, max_gap_secs);
        self.deletions = deletions;
        ids
    }

    pub fn add_visual_replacement(&mut self, replacement: VisualReplacement) -> Result<(), EditError> {
        replacement.validate()?;
        self.visual_replacements.push(replacement);
        Ok(())
    }

    pub fn add_voice_substitution(&mut self, edit: VoiceSubstitution) -> Result<(), EditError> {
        edit.validate()?;
        self.voice_edits.push(edit);
        Ok(())
    }

    /// Content length after segment edits: the sum of active clip
    /// durations in order.
    pub fn output_duration(&self) -> f64 {
        self.segments
            .ordered_segments()
            .iter()
            .map(|s| s.clip_duration())
            .sum()
    }

    pub fn snapshot(&self) -> EditSnapshot {
        EditSnapshot {
            segments: self.segments.clone(),
            deletions: self.deletions.edits().to_vec(),
        }
    }

    /// Put back an earlier snapshot. Filler candidates are kept.
    pub fn restore(&mut self, snapshot: EditSnapshot) {
        self.segments = snapshot.segments;
        self.deletions = self.deletions.replace_edits(snapshot.deletions);
    }
}

fn validate_duration(duration: f64) -> Result<(), EditError> {
    if duration.is_finite() && duration > 0.0 {
        Ok(())
    } else {
        Err(EditError::InvalidDuration { duration })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deletion::NewDeletion;
    use crate::transcript::{TranscriptSegment, TranscriptWord};

    fn source(duration: f64) -> SourceMedia {
        SourceMedia {
            id: "vid-1".into(),
            duration_secs: duration,
            camera_id: None,
        }
    }

    #[test]
    fn test_new_session_has_one_segment() {
        let session = EditSession::new(source(12.0)).unwrap();
        assert_eq!(session.segments.len(), 1);
        assert_eq!(session.output_duration(), 12.0);
        assert!(session.deletions.is_empty());
    }

    #[test]
    fn test_invalid_duration_is_rejected() {
        assert!(matches!(
            EditSession::new(source(-1.0)),
            Err(EditError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_load_source_resets_state() {
        let mut session = EditSession::new(source(10.0)).unwrap();
        assert!(session.apply_segment_edit(&SegmentEdit::Split { at: 4.0 }));
        session.deletions = session.deletions.add_deletion(NewDeletion::manual(1.0, 2.0)).0;

        session.load_source(source(30.0)).unwrap();
        assert_eq!(session.segments.len(), 1);
        assert_eq!(session.segments.source_duration(), 30.0);
        assert!(session.deletions.is_empty());
    }

    #[test]
    fn test_rejected_edit_reports_no_change() {
        let mut session = EditSession::new(source(10.0)).unwrap();
        assert!(!session.apply_segment_edit(&SegmentEdit::Split { at: 0.05 }));
    }

    #[test]
    fn test_snapshot_restore() {
        let mut session = EditSession::new(source(10.0)).unwrap();
        let before = session.snapshot();
        session.apply_segment_edit(&SegmentEdit::Split { at: 5.0 });
        session.deletions = session.deletions.add_deletion(NewDeletion::manual(1.0, 2.0)).0;

        session.restore(before.clone());
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_delete_words_groups_selection() {
        let word = |id: &str, s: f64, e: f64| TranscriptWord {
            id: id.into(),
            text: id.into(),
            start_time: s,
            end_time: e,
            confidence: 1.0,
        };
        let transcript = Transcript {
            segments: vec![TranscriptSegment {
                text: "a b c".into(),
                start_time: 0.0,
                end_time: 3.0,
                words: vec![word("a", 0.0, 1.0), word("b", 1.1, 2.0), word("c", 2.6, 3.0)],
            }],
            duration: 3.0,
            language: "en-US".into(),
        };
        let mut session = EditSession::new(source(3.0)).unwrap().with_transcript(transcript);

        let ids = session.delete_words(&["c".into(), "a".into(), "b".into()], 0.3);
        assert_eq!(ids.len(), 2);
        assert_eq!(session.deletions.edits()[0].end_time, 2.0);
    }
}
