//! Time helpers shared by the edit model, the timeline, and the CLI.
//!
//! All editor times are `f64` seconds. Comparisons between derived
//! values (sums of clip durations, pixel round-trips) go through
//! [`approx_eq`] so float noise never flips a boundary decision.

/// Tolerance used when comparing derived time values.
pub const TIME_EPSILON: f64 = 1e-9;

/// Compare two times within [`TIME_EPSILON`].
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIME_EPSILON
}

/// Format seconds as a compact editor timecode: `MM:SS.mmm`, or
/// `H:MM:SS.mmm` once the value reaches an hour. Negative input is
/// clamped to zero.
pub fn format_timecode(secs: f64) -> String {
    let total_ms = (secs.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}.{millis:03}")
    } else {
        format!("{minutes:02}:{seconds:02}.{millis:03}")
    }
}
