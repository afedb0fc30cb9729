//! Reelcut Render Handoff
//!
//! Turns an edit session into instructions for the external render
//! backend and follows the resulting job to completion.
//!
//! # Flow
//!
//! ```text
//! EditSession ──┬── from_segments ──┐
//!               └── from_deletions ─┴── RenderRequest
//!                                          │
//!                                  RenderBackend::submit
//!                                          │
//!                                      JobHandle
//!                                          │
//!                          JobPoller::watch (JobTracker)
//!                                          │
//!                          completed / failed / timed out / cancelled
//! ```
//!
//! Nothing here mutates the session. Failed or abandoned jobs leave the
//! edit state exactly as it was.

pub mod backend;
pub mod builder;
pub mod job;
pub mod poller;
pub mod request;

pub use backend::*;
pub use builder::*;
pub use job::*;
pub use poller::*;
pub use request::*;
