//! Reelcut Timeline
//!
//! Turns pointer and keyboard input on a rendered timeline track into
//! edit-model mutations and playhead seeks.
//!
//! - [`geometry`]: time and pixel conversion, per-clip rectangles, hit testing
//! - [`gesture`]: press/drag/release state for seek, move, and edge trims
//! - [`keyboard`]: shortcut map
//! - [`playback`]: output-to-source mapping and the segment boundary skipper
//! - [`controller`]: the stateful controller tying these to a session

pub mod controller;
pub mod geometry;
pub mod gesture;
pub mod keyboard;
pub mod playback;

pub use controller::{ControllerConfig, TimelineController};
pub use geometry::{ClipRect, HitTarget, TrackGeometry};
pub use gesture::GestureKind;
pub use keyboard::{Key, KeyCommand, Modifiers};
pub use playback::{OutputMap, PlaybackCursor, PlaybackStep};
