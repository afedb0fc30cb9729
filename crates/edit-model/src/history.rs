//! Snapshot-based undo/redo history.
//!
//! - Undo/redo stacks of snapshots, each with a label
//! - Pushing a new entry clears the redo stack
//! - Batches collapse a whole gesture (a drag) into one entry
//! - Bounded depth; the oldest entries are evicted first
//!
//! The history never reads the live state itself. Callers pass the
//! current snapshot into [`History::undo`]/[`History::redo`] so it can be
//! parked on the opposite stack.

use std::collections::VecDeque;

/// A single entry in the undo/redo history.
#[derive(Debug, Clone)]
pub struct HistoryEntry<S> {
    /// Human-readable label describing the action (e.g. "Split", "Trim clip").
    pub label: String,
    pub snapshot: S,
}

/// Undo/redo stacks of state snapshots.
#[derive(Debug, Clone)]
pub struct History<S> {
    undo_stack: VecDeque<HistoryEntry<S>>,
    redo_stack: Vec<HistoryEntry<S>>,
    max_entries: usize,
    /// Label and "before" snapshot of an open batch.
    batch: Option<HistoryEntry<S>>,
}

impl<S> History<S> {
    pub fn new(max_entries: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_entries: max_entries.max(1),
            batch: None,
        }
    }

    /// Record the state *before* an action. Suppressed while batching.
    pub fn push(&mut self, label: &str, before: S) {
        if self.batch.is_some() {
            tracing::trace!(label, "Push suppressed: batch in progress");
            return;
        }
        self.commit(HistoryEntry {
            label: label.to_string(),
            snapshot: before,
        });
    }

    /// Undo the last action.
    ///
    /// `current` is parked on the redo stack; the snapshot to restore is
    /// returned. `None` (and `current` dropped) when there is nothing to
    /// undo.
    pub fn undo(&mut self, current: S) -> Option<S> {
        self.abandon_stuck_batch();
        let entry = self.undo_stack.pop_back()?;

        tracing::debug!(
            label = %entry.label,
            undo_remaining = self.undo_stack.len(),
            "Undo"
        );

        self.redo_stack.push(HistoryEntry {
            label: entry.label,
            snapshot: current,
        });
        Some(entry.snapshot)
    }

    /// Redo the last undone action. Mirror image of [`History::undo`].
    pub fn redo(&mut self, current: S) -> Option<S> {
        self.abandon_stuck_batch();
        let entry = self.redo_stack.pop()?;

        tracing::debug!(
            label = %entry.label,
            redo_remaining = self.redo_stack.len(),
            "Redo"
        );

        self.undo_stack.push_back(HistoryEntry {
            label: entry.label,
            snapshot: current,
        });
        self.evict();
        Some(entry.snapshot)
    }

    /// Open a batch. Individual pushes are suppressed until it ends.
    pub fn start_batch(&mut self, label: &str, before: S) {
        if self.batch.is_some() {
            tracing::warn!(label, "start_batch called while already batching, ignoring");
            return;
        }
        self.batch = Some(HistoryEntry {
            label: label.to_string(),
            snapshot: before,
        });
        tracing::trace!(label, "Batch started");
    }

    /// Close the batch. One entry is committed only if `changed`.
    pub fn end_batch(&mut self, changed: bool) {
        let Some(entry) = self.batch.take() else {
            return;
        };
        if changed {
            self.commit(entry);
        } else {
            tracing::trace!(label = %entry.label, "Batch ended without changes");
        }
    }

    pub fn is_batching(&self) -> bool {
        self.batch.is_some()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.back().map(|e| e.label.as_str())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|e| e.label.as_str())
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history, e.g. when a new source is loaded.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.batch = None;
        tracing::debug!("History cleared");
    }

    fn commit(&mut self, entry: HistoryEntry<S>) {
        self.redo_stack.clear();
        tracing::debug!(label = %entry.label, undo_depth = self.undo_stack.len() + 1, "History entry pushed");
        self.undo_stack.push_back(entry);
        self.evict();
    }

    fn evict(&mut self) {
        while self.undo_stack.len() > self.max_entries {
            self.undo_stack.pop_front();
        }
    }

    /// A batch left open (lost pointer-up) must not swallow undo.
    fn abandon_stuck_batch(&mut self) {
        if self.batch.take().is_some() {
            tracing::warn!("Ending stuck batch before undo/redo");
        }
    }
}
