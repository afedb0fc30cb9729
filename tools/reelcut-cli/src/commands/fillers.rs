//! Detect filler words and silences for an edit script's source.

use std::path::PathBuf;

use reelcut_analysis::{
    detect_fillers, FillerDetector, HttpFillerDetector, LocalDetectorConfig,
    TranscriptFillerDetector,
};
use reelcut_common::config::AppConfig;
use reelcut_common::format_timecode;
use reelcut_edit_model::script::EditScript;
use reelcut_edit_model::{total_filler_secs, DeletionList};

pub async fn run(
    config: &mut AppConfig,
    path: PathBuf,
    remote: bool,
    threshold: Option<f64>,
    write: bool,
) -> anyhow::Result<()> {
    if let Some(t) = threshold {
        config.detection.silence_threshold_secs = t;
    }

    let mut script = EditScript::load(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load edit script: {e}"))?;
    let source_id = script.source.id.clone();

    let detector: Box<dyn FillerDetector> = if remote {
        Box::new(HttpFillerDetector::new(&config.backend)?)
    } else {
        let transcript = script
            .transcript
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Script has no transcript; use --remote"))?;
        Box::new(
            TranscriptFillerDetector::new(LocalDetectorConfig::from(&config.detection))
                .with_source(&source_id, transcript, script.source.duration_secs),
        )
    };

    let mut list = DeletionList::new();
    detect_fillers(&mut list, detector.as_ref(), &source_id)
        .await
        .map_err(|e| anyhow::anyhow!("Filler detection failed: {e}"))?;

    let candidates = list.candidates();
    println!("Found {} candidates:", candidates.len());
    for c in candidates {
        println!(
            "  {}  {}..{}  {:?}  {}",
            c.id,
            format_timecode(c.start),
            format_timecode(c.end),
            c.kind,
            c.text
        );
    }
    println!(
        "  Total: {:.2}s of {}",
        total_filler_secs(candidates),
        format_timecode(script.source.duration_secs)
    );

    if write {
        script.fillers = candidates.to_vec();
        let json = serde_json::to_string_pretty(&script)?;
        std::fs::write(&path, json)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;
        println!("Stored candidates in {}", path.display());
    }

    Ok(())
}
