//! The deletion list: source-time ranges marked for removal.
//!
//! This is the "mark ranges to cut" editing model, independent of the
//! segment store. Deletions are kept sorted by start time; overlapping
//! deletions coexist and are only merged when a render request or the
//! playback skipper needs their union.
//!
//! The list also carries the ephemeral filler/silence candidates from
//! the last detection pass and the state of that pass.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filler::{DetectedFiller, FillerKind};
use crate::range::{merge_ranges, TimeRange};
use crate::transcript::TranscriptWord;

/// Selected words closer than this are joined into one deletion.
pub const WORD_GROUP_GAP_SECS: f64 = 0.3;

/// Opaque deletion identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeletionId(Uuid);

impl DeletionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DeletionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeletionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a range was marked for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeletionReason {
    #[default]
    Manual,
    Filler,
    Silence,
}

impl From<FillerKind> for DeletionReason {
    fn from(kind: FillerKind) -> Self {
        match kind {
            FillerKind::Filler => DeletionReason::Filler,
            FillerKind::Silence => DeletionReason::Silence,
        }
    }
}

/// A range marked for removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletionEdit {
    pub id: DeletionId,
    pub start_time: f64,
    pub end_time: f64,
    pub reason: DeletionReason,

    /// Transcript words this deletion came from, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub word_ids: Vec<String>,

    /// Display text (the deleted words, or the filler label).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl DeletionEdit {
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Parameters for a new deletion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewDeletion {
    pub start_time: f64,
    pub end_time: f64,
    pub reason: DeletionReason,
    pub word_ids: Vec<String>,
    pub text: Option<String>,
}

impl NewDeletion {
    pub fn manual(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
            ..Self::default()
        }
    }
}

/// Progress of the most recent filler detection pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetectionState {
    #[default]
    Idle,
    Running,
    Ready,
    Failed { message: String },
}

/// A run of adjacent selected words.
#[derive(Debug, Clone, PartialEq)]
pub struct WordGroup {
    pub start_time: f64,
    pub end_time: f64,
    pub word_ids: Vec<String>,
    pub text: String,
}

/// Deletions plus the ephemeral candidate list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeletionList {
    edits: Vec<DeletionEdit>,
    #[serde(skip)]
    candidates: Vec<DetectedFiller>,
    #[serde(skip)]
    detection: DetectionState,
}

impl DeletionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a deletion and keep the list sorted by start time.
    ///
    /// Empty or inverted ranges are rejected: the list comes back
    /// unchanged and no id is issued.
    pub fn add_deletion(&self, deletion: NewDeletion) -> (Self, Option<DeletionId>) {
        let Some(range) = TimeRange::new(deletion.start_time, deletion.end_time) else {
            tracing::debug!(
                start = deletion.start_time,
                end = deletion.end_time,
                "Deletion rejected: empty or inverted range"
            );
            return (self.clone(), None);
        };

        let id = DeletionId::new();
        let mut edits = self.edits.clone();
        edits.push(DeletionEdit {
            id,
            start_time: range.start,
            end_time: range.end,
            reason: deletion.reason,
            word_ids: deletion.word_ids,
            text: deletion.text,
        });
        sort_by_start(&mut edits);

        tracing::debug!(deletion_id = %id, start = range.start, end = range.end, "Deletion added");
        (self.with_edits(edits), Some(id))
    }

    /// Delete a selection of transcript words as one deletion per
    /// contiguous group (see [`group_words`]).
    pub fn add_word_selection(
        &self,
        words: &[TranscriptWord],
        max_gap_secs: f64,
    ) -> (Self, Vec<DeletionId>) {
        let mut list = self.clone();
        let mut ids = Vec::new();
        for group in group_words(words, max_gap_secs) {
            let (next, id) = list.add_deletion(NewDeletion {
                start_time: group.start_time,
                end_time: group.end_time,
                reason: DeletionReason::Manual,
                word_ids: group.word_ids,
                text: Some(group.text),
            });
            list = next;
            ids.extend(id);
        }
        (list, ids)
    }

    pub fn remove_deletion(&self, id: DeletionId) -> Self {
        let edits: Vec<DeletionEdit> = self.edits.iter().filter(|d| d.id != id).cloned().collect();
        if edits.len() == self.edits.len() {
            tracing::trace!(deletion_id = %id, "Remove rejected: unknown deletion");
        }
        self.with_edits(edits)
    }

    pub fn clear_deletions(&self) -> Self {
        self.with_edits(Vec::new())
    }

    /// Mark a detection pass as in flight.
    pub fn begin_detection(&self) -> Self {
        Self {
            detection: DetectionState::Running,
            ..self.clone()
        }
    }

    /// Store the candidates from a finished detection pass.
    pub fn with_candidates(&self, candidates: Vec<DetectedFiller>) -> Self {
        Self {
            candidates,
            detection: DetectionState::Ready,
            ..self.clone()
        }
    }

    /// Record a failed detection pass. Existing deletions are untouched
    /// and previous candidates are dropped.
    pub fn detection_failed(&self, message: impl Into<String>) -> Self {
        Self {
            candidates: Vec::new(),
            detection: DetectionState::Failed {
                message: message.into(),
            },
            ..self.clone()
        }
    }

    /// Convert the selected candidates into deletions, then clear the
    /// candidate list. Ids not in the candidate list are ignored.
    pub fn apply_filler_deletions(&self, ids: &[String]) -> Self {
        let mut edits = self.edits.clone();
        let mut applied = 0usize;
        for candidate in self
            .candidates
            .iter()
            .filter(|c| ids.iter().any(|id| id == &c.id))
        {
            let Some(range) = candidate.range() else {
                continue;
            };
            edits.push(DeletionEdit {
                id: DeletionId::new(),
                start_time: range.start,
                end_time: range.end,
                reason: candidate.kind.into(),
                word_ids: Vec::new(),
                text: Some(candidate.text.clone()),
            });
            applied += 1;
        }
        sort_by_start(&mut edits);

        tracing::debug!(applied, requested = ids.len(), "Filler deletions applied");
        Self {
            edits,
            candidates: Vec::new(),
            detection: DetectionState::Idle,
        }
    }

    /// Apply every current candidate.
    pub fn apply_all_fillers(&self) -> Self {
        let ids: Vec<String> = self.candidates.iter().map(|c| c.id.clone()).collect();
        self.apply_filler_deletions(&ids)
    }

    /// Swap in a different set of deletions, keeping the candidate list
    /// and detection state. Used when restoring history.
    pub fn replace_edits(&self, edits: Vec<DeletionEdit>) -> Self {
        let mut edits = edits;
        sort_by_start(&mut edits);
        self.with_edits(edits)
    }

    /// Deletions sorted by start time.
    pub fn edits(&self) -> &[DeletionEdit] {
        &self.edits
    }

    pub fn candidates(&self) -> &[DetectedFiller] {
        &self.candidates
    }

    pub fn detection_state(&self) -> &DetectionState {
        &self.detection
    }

    pub fn get(&self, id: DeletionId) -> Option<&DeletionEdit> {
        self.edits.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Union of all deletion ranges, sorted and non-overlapping.
    pub fn merged_ranges(&self) -> Vec<TimeRange> {
        merge_ranges(self.edits.iter().map(DeletionEdit::range))
    }

    /// Seconds removed, counting overlaps once.
    pub fn total_deleted_secs(&self) -> f64 {
        self.merged_ranges().iter().map(TimeRange::duration).sum()
    }

    /// Whether source time `t` falls inside any deletion.
    pub fn contains(&self, t: f64) -> bool {
        self.edits.iter().any(|d| d.range().contains(t))
    }

    fn with_edits(&self, edits: Vec<DeletionEdit>) -> Self {
        Self {
            edits,
            ..self.clone()
        }
    }
}

fn sort_by_start(edits: &mut [DeletionEdit]) {
    edits.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
}

/// Group selected words into contiguous runs.
///
/// Words are sorted by start time. A word joins the current run while
/// its start is less than `max_gap_secs` after the previous word's end;
/// a larger gap closes the run.
pub fn group_words(words: &[TranscriptWord], max_gap_secs: f64) -> Vec<WordGroup> {
    let mut sorted: Vec<&TranscriptWord> = words.iter().collect();
    sorted.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    let mut groups: Vec<WordGroup> = Vec::new();
    let mut previous_end: Option<f64> = None;
    for word in sorted {
        match (groups.last_mut(), previous_end) {
            (Some(group), Some(end)) if word.start_time - end < max_gap_secs => {
                group.end_time = group.end_time.max(word.end_time);
                group.word_ids.push(word.id.clone());
                group.text.push(' ');
                group.text.push_str(&word.text);
            }
            _ => groups.push(WordGroup {
                start_time: word.start_time,
                end_time: word.end_time,
                word_ids: vec![word.id.clone()],
                text: word.text.clone(),
            }),
        }
        previous_end = Some(word.end_time);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(id: &str, start: f64, end: f64) -> TranscriptWord {
        TranscriptWord {
            id: id.to_string(),
            text: id.to_string(),
            start_time: start,
            end_time: end,
            confidence: 1.0,
        }
    }

    fn candidate(id: &str, kind: FillerKind, start: f64, end: f64) -> DetectedFiller {
        DetectedFiller {
            id: id.to_string(),
            kind,
            text: id.to_string(),
            start,
            end,
        }
    }

    #[test]
    fn test_add_keeps_list_sorted() {
        let list = DeletionList::new();
        let (list, a) = list.add_deletion(NewDeletion::manual(5.0, 6.0));
        let (list, b) = list.add_deletion(NewDeletion::manual(1.0, 2.0));
        let (list, c) = list.add_deletion(NewDeletion::manual(3.0, 4.0));
        assert!(a.is_some() && b.is_some() && c.is_some());

        let starts: Vec<f64> = list.edits().iter().map(|d| d.start_time).collect();
        assert_eq!(starts, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_add_rejects_empty_range() {
        let (list, id) = DeletionList::new().add_deletion(NewDeletion::manual(2.0, 2.0));
        assert!(id.is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn test_overlapping_deletions_coexist() {
        let (list, _) = DeletionList::new().add_deletion(NewDeletion::manual(1.0, 3.0));
        let (list, _) = list.add_deletion(NewDeletion::manual(2.0, 4.0));
        assert_eq!(list.len(), 2);
        assert_eq!(list.merged_ranges().len(), 1);
        assert!((list.total_deleted_secs() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_remove_and_clear() {
        let (list, a) = DeletionList::new().add_deletion(NewDeletion::manual(1.0, 2.0));
        let (list, _) = list.add_deletion(NewDeletion::manual(3.0, 4.0));
        let removed = list.remove_deletion(a.unwrap());
        assert_eq!(removed.len(), 1);
        assert_eq!(removed.edits()[0].start_time, 3.0);
        assert!(removed.clear_deletions().is_empty());
    }

    #[test]
    fn test_word_grouping_splits_on_large_gap() {
        let words = vec![word("a", 0.0, 1.0), word("b", 1.1, 2.0), word("c", 2.6, 3.0)];
        let groups = group_words(&words, WORD_GROUP_GAP_SECS);
        assert_eq!(groups.len(), 2);
        assert_eq!((groups[0].start_time, groups[0].end_time), (0.0, 2.0));
        assert_eq!((groups[1].start_time, groups[1].end_time), (2.6, 3.0));
        assert_eq!(groups[0].word_ids, vec!["a", "b"]);
    }

    #[test]
    fn test_word_grouping_sorts_selection_first() {
        let words = vec![word("c", 2.6, 3.0), word("a", 0.0, 1.0), word("b", 1.1, 2.0)];
        let (list, ids) = DeletionList::new().add_word_selection(&words, WORD_GROUP_GAP_SECS);
        assert_eq!(ids.len(), 2);
        assert_eq!(list.edits()[0].text.as_deref(), Some("a b"));
        assert_eq!(list.edits()[0].reason, DeletionReason::Manual);
        assert_eq!(list.edits()[1].word_ids, vec!["c"]);
    }

    #[test]
    fn test_apply_filler_deletions_scenario() {
        let list = DeletionList::new().with_candidates(vec![
            candidate("f2", FillerKind::Silence, 7.0, 7.3),
            candidate("f1", FillerKind::Filler, 2.0, 2.5),
        ]);
        assert_eq!(list.detection_state(), &DetectionState::Ready);

        let applied = list.apply_filler_deletions(&["f1".to_string(), "f2".to_string()]);
        assert_eq!(applied.len(), 2);
        assert_eq!(applied.edits()[0].start_time, 2.0);
        assert_eq!(applied.edits()[0].reason, DeletionReason::Filler);
        assert_eq!(applied.edits()[1].start_time, 7.0);
        assert_eq!(applied.edits()[1].reason, DeletionReason::Silence);
        assert!(applied.candidates().is_empty());
    }

    #[test]
    fn test_apply_subset_still_clears_candidates() {
        let list = DeletionList::new().with_candidates(vec![
            candidate("f1", FillerKind::Filler, 2.0, 2.5),
            candidate("f2", FillerKind::Filler, 4.0, 4.5),
        ]);
        let applied = list.apply_filler_deletions(&["f2".to_string(), "nope".to_string()]);
        assert_eq!(applied.len(), 1);
        assert_eq!(applied.edits()[0].start_time, 4.0);
        assert!(applied.candidates().is_empty());
    }

    #[test]
    fn test_detection_failure_keeps_deletions() {
        let (list, _) = DeletionList::new().add_deletion(NewDeletion::manual(1.0, 2.0));
        let failed = list.begin_detection().detection_failed("backend unreachable");
        assert_eq!(failed.len(), 1);
        assert!(matches!(
            failed.detection_state(),
            DetectionState::Failed { message } if message == "backend unreachable"
        ));
    }

    #[test]
    fn test_contains_is_half_open() {
        let (list, _) = DeletionList::new().add_deletion(NewDeletion::manual(1.0, 2.0));
        assert!(list.contains(1.0));
        assert!(list.contains(1.5));
        assert!(!list.contains(2.0));
    }
}
