//! Detected filler/silence candidates.
//!
//! Candidates are advisory. They only become durable deletions when the
//! user confirms them through [`DeletionList::apply_filler_deletions`].
//!
//! [`DeletionList::apply_filler_deletions`]: crate::deletion::DeletionList::apply_filler_deletions

use serde::{Deserialize, Serialize};

use crate::range::TimeRange;

/// What kind of dead air a candidate covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillerKind {
    Filler,
    Silence,
}

/// A backend- or locally-detected removal candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFiller {
    /// Short opaque id, unique within one detection pass.
    pub id: String,

    #[serde(rename = "type")]
    pub kind: FillerKind,

    /// Display text, e.g. `"um"` or `"[1.6s silence]"`.
    pub text: String,

    /// Source-time start (seconds).
    pub start: f64,

    /// Source-time end (seconds).
    pub end: f64,
}

impl DetectedFiller {
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    pub fn range(&self) -> Option<TimeRange> {
        TimeRange::new(self.start, self.end)
    }
}

/// Total seconds covered by a candidate list (overlaps counted once).
pub fn total_filler_secs(fillers: &[DetectedFiller]) -> f64 {
    crate::range::merge_ranges(fillers.iter().filter_map(DetectedFiller::range))
        .iter()
        .map(TimeRange::duration)
        .sum()
}
