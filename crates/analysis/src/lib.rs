//! Reelcut Filler Analysis
//!
//! Finds removal candidates in a recording:
//! - **Local detection:** filler words and long pauses from a word-level transcript
//! - **Backend detection:** the same analysis run by the processing backend
//! - **Driver:** [`detect_fillers`] runs any detector against a deletion list
//!
//! Candidates are advisory. Nothing here touches confirmed deletions.

pub mod detector;
pub mod http;
pub mod local;

pub use detector::*;
pub use http::HttpFillerDetector;
pub use local::*;
