//! Half-open source-time ranges and the set operations the renderer needs.

use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` range of source time in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    /// Build a range, rejecting empty, inverted, or non-finite bounds.
    pub fn new(start: f64, end: f64) -> Option<Self> {
        if start.is_finite() && end.is_finite() && start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `t` lies in `[start, end)`.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Intersect with `[0, duration)`. `None` if nothing remains.
    pub fn clamp_to(&self, duration: f64) -> Option<Self> {
        Self::new(self.start.max(0.0), self.end.min(duration))
    }
}

/// Sort ranges and coalesce any that overlap or touch.
pub fn merge_ranges(ranges: impl IntoIterator<Item = TimeRange>) -> Vec<TimeRange> {
    let mut sorted: Vec<TimeRange> = ranges.into_iter().collect();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<TimeRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// The parts of `[0, duration)` not covered by any cut.
///
/// Cuts are clamped to the source, then merged, so overlapping cuts
/// remove their union. Returns an empty list when everything is cut.
pub fn complement_ranges(cuts: &[TimeRange], duration: f64) -> Vec<TimeRange> {
    let merged = merge_ranges(cuts.iter().filter_map(|c| c.clamp_to(duration)));

    let mut keep = Vec::with_capacity(merged.len() + 1);
    let mut cursor = 0.0;
    for cut in &merged {
        if let Some(gap) = TimeRange::new(cursor, cut.start) {
            keep.push(gap);
        }
        cursor = cut.end;
    }
    if let Some(tail) = TimeRange::new(cursor, duration) {
        keep.push(tail);
    }
    keep
}
