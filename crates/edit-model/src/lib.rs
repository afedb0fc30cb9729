//! Reelcut Edit Model
//!
//! Defines the non-destructive editing state for a single source recording:
//! - **Segments:** Ordered references into the immutable source, with trims,
//!   soft deletes, and an output-timeline position
//! - **Deletions:** Source-time ranges marked for removal, from manual word
//!   selection or confirmed filler/silence candidates
//! - **Session:** The per-recording container that owns both, plus bubble
//!   and replacement instructions handed to the renderer
//!
//! Every mutator is a pure function from the current state to a new one.
//! Invalid interactive requests (splitting at an edge, unknown ids) are
//! no-ops, not errors. Nothing here performs I/O except loading edit scripts.

pub mod bubble;
pub mod deletion;
pub mod error;
pub mod filler;
pub mod history;
pub mod range;
pub mod replacement;
pub mod script;
pub mod segment;
pub mod session;
pub mod transcript;

pub use bubble::*;
pub use deletion::*;
pub use error::*;
pub use filler::*;
pub use history::*;
pub use range::*;
pub use replacement::*;
pub use segment::*;
pub use session::*;
pub use transcript::*;
