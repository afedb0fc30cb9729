//! Print the render request for an edit script.

use std::path::PathBuf;

use reelcut_common::config::AppConfig;
use reelcut_render::RenderRequestBuilder;

use crate::TimelineMode;

pub fn run(
    config: &AppConfig,
    path: PathBuf,
    mode: TimelineMode,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (_, session) = super::replay(config, &path)?;

    let request = match mode {
        TimelineMode::Segments => RenderRequestBuilder::from_segments(&session),
        TimelineMode::Deletions => RenderRequestBuilder::from_deletions(&session),
    };
    let json = serde_json::to_string_pretty(&request)?;

    match output {
        Some(out) => {
            std::fs::write(&out, json)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", out.display()))?;
            eprintln!(
                "Wrote render request ({:.2}s output) to {}",
                request.timeline.output_duration(),
                out.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
