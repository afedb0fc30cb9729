//! The timeline controller.
//!
//! Owns an [`EditSession`] and turns track input into edits on it. Each
//! completed user action (a keypress, a finished drag) becomes exactly
//! one undo entry; rejected edits leave no entry behind.
//!
//! The playhead is kept in timeline (display) seconds, the same space
//! the clips are drawn in. Playback itself is sequenced by
//! [`OutputMap`], which only follows segment order.

use reelcut_common::EditorConfig;
use reelcut_edit_model::{
    DeletionId, EditError, EditSession, EditSnapshot, History, NewDeletion, SegmentEdit, SegmentId,
    SourceMedia,
};

use crate::geometry::{self, ClipRect, HitTarget, TrackGeometry};
use crate::gesture::{Gesture, GestureKind};
use crate::keyboard::{map_key, Key, KeyCommand, Modifiers};
use crate::playback::{OutputMap, PlaybackCursor, PlaybackStep};

/// Interaction tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    pub min_clip_secs: f64,
    pub word_gap_secs: f64,
    pub edge_handle_px: f64,
    pub drag_threshold_px: f64,
    pub nudge_secs: f64,
    pub history_depth: usize,
}

impl From<&EditorConfig> for ControllerConfig {
    fn from(config: &EditorConfig) -> Self {
        Self {
            min_clip_secs: config.min_clip_secs,
            word_gap_secs: config.word_gap_secs,
            edge_handle_px: config.edge_handle_px,
            drag_threshold_px: config.drag_threshold_px,
            nudge_secs: config.nudge_secs,
            history_depth: config.history_depth,
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

/// Drives one editing session from timeline input.
pub struct TimelineController {
    session: EditSession,
    history: History<EditSnapshot>,
    config: ControllerConfig,
    track_width_px: f64,
    selection: Option<SegmentId>,
    playhead: f64,
    playing: bool,
    cursor: PlaybackCursor,
    gesture: Option<Gesture>,
}

impl TimelineController {
    pub fn new(session: EditSession, config: ControllerConfig) -> Self {
        Self {
            session,
            history: History::new(config.history_depth),
            config,
            track_width_px: 1000.0,
            selection: None,
            playhead: 0.0,
            playing: false,
            cursor: PlaybackCursor::default(),
            gesture: None,
        }
    }

    /// Switch to a new recording. History, selection, and playback reset.
    pub fn load_source(&mut self, source: SourceMedia) -> Result<(), EditError> {
        self.session.load_source(source)?;
        self.history.clear();
        self.selection = None;
        self.playhead = 0.0;
        self.playing = false;
        self.gesture = None;
        Ok(())
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Direct access for collaborators whose results are not undoable,
    /// such as filler detection filling the candidate list.
    pub fn session_mut(&mut self) -> &mut EditSession {
        &mut self.session
    }

    pub fn into_session(self) -> EditSession {
        self.session
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn selection(&self) -> Option<SegmentId> {
        self.selection
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ── Derived view ────────────────────────────────────────────────

    pub fn set_track_width(&mut self, width_px: f64) {
        self.track_width_px = width_px.max(1.0);
    }

    pub fn geometry(&self) -> TrackGeometry {
        TrackGeometry::for_store(self.track_width_px, &self.session.segments)
    }

    pub fn clip_rects(&self) -> Vec<ClipRect> {
        geometry::clip_rects(&self.session.segments, &self.geometry(), self.selection)
    }

    pub fn output_duration(&self) -> f64 {
        geometry::output_duration(&self.session.segments)
    }

    pub fn timeline_duration(&self) -> f64 {
        geometry::timeline_duration(&self.session.segments)
    }

    /// Source time under the playhead: the topmost active clip drawn
    /// there. `None` over a gap.
    pub fn source_time_at_playhead(&self) -> Option<f64> {
        self.session
            .segments
            .ordered_segments()
            .into_iter()
            .rev()
            .find(|s| self.playhead >= s.output_start && self.playhead < s.output_end())
            .map(|s| s.effective_start() + (self.playhead - s.output_start))
    }

    // ── Selection and playhead ──────────────────────────────────────

    pub fn select(&mut self, id: Option<SegmentId>) {
        self.selection = id.filter(|id| self.session.segments.get(*id).is_some());
    }

    /// Move the playhead, clamped to the ruler span.
    pub fn seek(&mut self, t: f64) {
        self.playhead = t.clamp(0.0, self.timeline_duration());
        tracing::trace!(playhead = self.playhead, "Playhead moved");
    }

    pub fn nudge(&mut self, steps: f64) {
        self.seek(self.playhead + steps * self.config.nudge_secs);
    }

    // ── Pointer gestures ────────────────────────────────────────────

    pub fn pointer_down(&mut self, px: f64) {
        if self.gesture.is_some() {
            tracing::debug!("Pointer down during a gesture, cancelling the previous one");
            self.pointer_cancel();
        }

        let geometry = self.geometry();
        let target = geometry::hit_test(&self.clip_rects(), px, self.config.edge_handle_px);
        let kind = GestureKind::from(target);

        if target == HitTarget::Empty {
            self.seek(geometry.px_to_time(px));
        }

        self.history.start_batch(gesture_label(kind), self.session.snapshot());
        self.gesture = Some(Gesture::begin(kind, px, self.session.segments.clone(), geometry));
        tracing::trace!(?kind, px, "Gesture started");
    }

    pub fn pointer_move(&mut self, px: f64) {
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        let dragging = gesture.track(px, self.config.drag_threshold_px);

        if gesture.kind == GestureKind::Seek {
            let t = gesture.geometry.px_to_time(px);
            self.seek(t);
        } else if dragging {
            self.session.segments = gesture.preview(px, self.config.min_clip_secs);
        }
    }

    /// Finish the gesture. Returns whether the segments changed.
    pub fn pointer_up(&mut self, px: f64) -> bool {
        let Some(mut gesture) = self.gesture.take() else {
            return false;
        };
        let dragging = gesture.track(px, self.config.drag_threshold_px);

        match gesture.kind {
            GestureKind::Seek => {
                self.seek(gesture.geometry.px_to_time(px));
            }
            GestureKind::Move(id) | GestureKind::TrimLeft(id) | GestureKind::TrimRight(id)
                if !dragging =>
            {
                self.select(Some(id));
                self.seek(gesture.geometry.px_to_time(px));
            }
            GestureKind::Move(id) | GestureKind::TrimLeft(id) | GestureKind::TrimRight(id) => {
                self.session.segments = gesture.finish(px, self.config.min_clip_secs);
                self.select(Some(id));
            }
        }

        let changed = self.session.segments != gesture.snapshot;
        self.history.end_batch(changed);
        if changed {
            tracing::debug!(kind = ?gesture.kind, "Gesture committed");
        }
        changed
    }

    /// Abandon the gesture and put the pre-press state back.
    pub fn pointer_cancel(&mut self) {
        if let Some(gesture) = self.gesture.take() {
            self.session.segments = gesture.snapshot;
            self.history.end_batch(false);
        }
    }

    // ── Edits ───────────────────────────────────────────────────────

    /// Split the clip under the playhead.
    pub fn split_at_playhead(&mut self) -> bool {
        let Some(at) = self.source_time_at_playhead() else {
            tracing::trace!(playhead = self.playhead, "Split ignored: no clip under playhead");
            return false;
        };
        self.commit("Split", |session| session.apply_segment_edit(&SegmentEdit::Split { at }))
    }

    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection else {
            return false;
        };
        self.commit("Delete clip", |session| session.apply_segment_edit(&SegmentEdit::Delete { id }))
    }

    pub fn restore_selected(&mut self) -> bool {
        let Some(id) = self.selection else {
            return false;
        };
        self.commit("Restore clip", |session| session.apply_segment_edit(&SegmentEdit::Restore { id }))
    }

    /// Mark a source range for removal.
    pub fn add_deletion(&mut self, start: f64, end: f64) -> Option<DeletionId> {
        let mut added = None;
        self.commit("Delete range", |session| {
            let (deletions, id) = session.deletions.add_deletion(NewDeletion::manual(start, end));
            session.deletions = deletions;
            added = id;
            id.is_some()
        });
        added
    }

    pub fn remove_deletion(&mut self, id: DeletionId) -> bool {
        self.commit("Remove deletion", |session| {
            let before = session.deletions.len();
            session.deletions = session.deletions.remove_deletion(id);
            session.deletions.len() != before
        })
    }

    /// Delete selected transcript words as grouped deletions.
    pub fn delete_words(&mut self, word_ids: &[String]) -> Vec<DeletionId> {
        let gap = self.config.word_gap_secs;
        let mut ids = Vec::new();
        self.commit("Delete words", |session| {
            ids = session.delete_words(word_ids, gap);
            !ids.is_empty()
        });
        ids
    }

    /// Confirm some of the current filler candidates.
    pub fn apply_filler_deletions(&mut self, ids: &[String]) -> bool {
        self.commit("Remove fillers", |session| {
            let before = session.deletions.len();
            session.deletions = session.deletions.apply_filler_deletions(ids);
            session.deletions.len() != before
        })
    }

    pub fn undo(&mut self) -> bool {
        self.pointer_cancel();
        let Some(snapshot) = self.history.undo(self.session.snapshot()) else {
            return false;
        };
        self.session.restore(snapshot);
        self.after_restore();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.pointer_cancel();
        let Some(snapshot) = self.history.redo(self.session.snapshot()) else {
            return false;
        };
        self.session.restore(snapshot);
        self.after_restore();
        true
    }

    // ── Playback ────────────────────────────────────────────────────

    /// Start playing from the playhead. Returns the source time the
    /// player should seek to, or `None` if there is nothing to play.
    pub fn play(&mut self) -> Option<f64> {
        self.cursor = PlaybackCursor::new(OutputMap::from_segments(&self.session.segments));
        let start = match self.source_time_at_playhead() {
            Some(t) => t,
            None => self.cursor.seek_output(0.0)?,
        };

        let start = match self.cursor.tick(start) {
            PlaybackStep::Continue => start,
            PlaybackStep::SeekSource(t) => t,
            PlaybackStep::End => return None,
        };
        self.playing = true;
        self.sync_playhead(start);
        tracing::debug!(source_time = start, "Playback started");
        Some(start)
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle_play(&mut self) -> Option<f64> {
        if self.playing {
            self.pause();
            None
        } else {
            self.play()
        }
    }

    /// Report the player's source position while playing.
    pub fn tick(&mut self, source_time: f64) -> PlaybackStep {
        if !self.playing {
            return PlaybackStep::Continue;
        }
        let step = self.cursor.tick(source_time);
        match step {
            PlaybackStep::Continue => self.sync_playhead(source_time),
            PlaybackStep::SeekSource(t) => self.sync_playhead(t),
            PlaybackStep::End => {
                self.playing = false;
                tracing::debug!("Playback reached the end");
            }
        }
        step
    }

    // ── Keyboard ────────────────────────────────────────────────────

    /// Handle a key press. Returns whether it was a timeline shortcut.
    pub fn handle_key(&mut self, key: Key, mods: Modifiers) -> bool {
        let Some(command) = map_key(key, mods) else {
            return false;
        };
        match command {
            KeyCommand::SplitAtPlayhead => {
                self.split_at_playhead();
            }
            KeyCommand::DeleteSelected => {
                self.delete_selected();
            }
            KeyCommand::RestoreSelected => {
                self.restore_selected();
            }
            KeyCommand::Nudge(steps) => self.nudge(steps),
            KeyCommand::TogglePlay => {
                self.toggle_play();
            }
            KeyCommand::ClearSelection => self.selection = None,
            KeyCommand::Undo => {
                self.undo();
            }
            KeyCommand::Redo => {
                self.redo();
            }
        }
        true
    }

    fn commit(&mut self, label: &str, edit: impl FnOnce(&mut EditSession) -> bool) -> bool {
        let before = self.session.snapshot();
        let changed = edit(&mut self.session);
        if changed {
            self.history.push(label, before);
        } else {
            tracing::trace!(label, "Edit had no effect");
        }
        changed
    }

    fn after_restore(&mut self) {
        if let Some(id) = self.selection {
            if self.session.segments.get(id).is_none() {
                self.selection = None;
            }
        }
        self.seek(self.playhead);
    }

    /// Put the playhead over the clip showing `source_time`.
    fn sync_playhead(&mut self, source_time: f64) {
        if let Some(s) = self
            .session
            .segments
            .ordered_segments()
            .into_iter()
            .find(|s| s.effective_range().contains(source_time))
        {
            self.playhead = s.output_start + (source_time - s.effective_start());
        }
    }
}

fn gesture_label(kind: GestureKind) -> &'static str {
    match kind {
        GestureKind::Seek => "Seek",
        GestureKind::Move(_) => "Move clip",
        GestureKind::TrimLeft(_) | GestureKind::TrimRight(_) => "Trim clip",
    }
}
