//! Timeline keyboard shortcuts.

use serde::{Deserialize, Serialize};

/// Keys the timeline reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Delete,
    Backspace,
    ArrowLeft,
    ArrowRight,
    Space,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    /// Cmd on macOS. Treated the same as Ctrl.
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        meta: false,
    };

    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A resolved shortcut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyCommand {
    SplitAtPlayhead,
    DeleteSelected,
    RestoreSelected,
    /// Move the playhead by this many nudge steps (negative is backwards).
    Nudge(f64),
    TogglePlay,
    ClearSelection,
    Undo,
    Redo,
}

/// Map a key press to a command. Shift multiplies nudges by ten.
pub fn map_key(key: Key, mods: Modifiers) -> Option<KeyCommand> {
    let step = if mods.shift { 10.0 } else { 1.0 };
    match key {
        Key::Char(c) if mods.command() => match c.to_ascii_lowercase() {
            'z' if mods.shift => Some(KeyCommand::Redo),
            'z' => Some(KeyCommand::Undo),
            'y' => Some(KeyCommand::Redo),
            _ => None,
        },
        Key::Char(c) => match c.to_ascii_lowercase() {
            's' => Some(KeyCommand::SplitAtPlayhead),
            'r' => Some(KeyCommand::RestoreSelected),
            _ => None,
        },
        Key::Delete | Key::Backspace => Some(KeyCommand::DeleteSelected),
        Key::ArrowLeft => Some(KeyCommand::Nudge(-step)),
        Key::ArrowRight => Some(KeyCommand::Nudge(step)),
        Key::Space => Some(KeyCommand::TogglePlay),
        Key::Escape => Some(KeyCommand::ClearSelection),
    }
}
