pub mod fillers;
pub mod info;
pub mod plan;
pub mod render;

use std::path::Path;

use reelcut_common::config::AppConfig;
use reelcut_edit_model::script::{EditScript, ReplayOptions};
use reelcut_edit_model::EditSession;

/// Load and replay an edit script with the configured editor tunables.
pub fn replay(config: &AppConfig, path: &Path) -> anyhow::Result<(EditScript, EditSession)> {
    let script = EditScript::load(path)
        .map_err(|e| anyhow::anyhow!("Failed to load edit script: {e}"))?;
    let session = script
        .replay(ReplayOptions {
            word_gap_secs: config.editor.word_gap_secs,
            min_clip_secs: config.editor.min_clip_secs,
        })
        .map_err(|e| anyhow::anyhow!("Failed to replay {}: {e}", path.display()))?;
    Ok((script, session))
}
