//! Show the timeline an edit script produces.

use std::path::PathBuf;

use reelcut_common::config::AppConfig;
use reelcut_common::format_timecode;
use reelcut_timeline::geometry::timeline_duration;

pub fn run(config: &AppConfig, path: PathBuf) -> anyhow::Result<()> {
    let (script, session) = super::replay(config, &path)?;

    println!("Source: {}", session.source.id);
    println!("  Duration: {}", format_timecode(session.source.duration_secs));
    if let Some(ref camera) = session.source.camera_id {
        println!("  Camera: {camera}");
    }
    if let Some(ref transcript) = session.transcript {
        println!("  Transcript: {} words", transcript.word_count());
    }
    println!("  Edits replayed: {}", script.edits.len());
    println!();

    println!("Segments:");
    for seg in session.segments.all_segments() {
        let state = if seg.is_deleted() { "deleted" } else { "active" };
        println!(
            "  #{:<2} {}..{}  clip {:.2}s  at {}  [{}] {}",
            seg.order,
            format_timecode(seg.effective_start()),
            format_timecode(seg.effective_end()),
            seg.clip_duration(),
            format_timecode(seg.output_start),
            state,
            seg.id,
        );
    }
    println!(
        "  Output duration: {}",
        format_timecode(session.output_duration())
    );
    println!(
        "  Timeline span: {}",
        format_timecode(timeline_duration(&session.segments))
    );
    println!();

    println!("Deletions:");
    for d in session.deletions.edits() {
        println!(
            "  {}..{}  {:?}  {}",
            format_timecode(d.start_time),
            format_timecode(d.end_time),
            d.reason,
            d.text.as_deref().unwrap_or(""),
        );
    }
    println!(
        "  Removed: {:.2}s in {} deletions",
        session.deletions.total_deleted_secs(),
        session.deletions.len()
    );
    println!();

    println!("Overlays:");
    println!(
        "  Bubble: {:?} {:?} size {:.2}",
        session.bubble.position, session.bubble.shape, session.bubble.size
    );
    println!("  Visual replacements: {}", session.visual_replacements.len());
    println!("  Voice substitutions: {}", session.voice_edits.len());

    Ok(())
}
