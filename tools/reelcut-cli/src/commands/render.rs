//! Submit a render and follow it to completion.

use std::path::PathBuf;

use reelcut_common::config::AppConfig;
use reelcut_render::{HttpRenderBackend, JobPoller, RenderBackend, RenderRequestBuilder};
use tokio_util::sync::CancellationToken;

use crate::TimelineMode;

pub async fn run(
    config: &AppConfig,
    path: PathBuf,
    mode: TimelineMode,
    detach: bool,
) -> anyhow::Result<()> {
    let (_, session) = super::replay(config, &path)?;

    let request = match mode {
        TimelineMode::Segments => RenderRequestBuilder::from_segments(&session),
        TimelineMode::Deletions => RenderRequestBuilder::from_deletions(&session),
    };
    println!(
        "Rendering {} ({:.2}s output)",
        request.source_id,
        request.timeline.output_duration()
    );

    let backend = HttpRenderBackend::new(&config.backend)?;
    let handle = backend
        .submit(&request)
        .await
        .map_err(|e| anyhow::anyhow!("Render submission failed: {e}"))?;
    println!("  Job: {}", handle.job_id);

    if detach {
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let poller = JobPoller::from(&config.backend);
    let result = poller
        .watch(&backend, &handle, cancel, |status| {
            print!("\r  Progress: {:>3}% ({:?})  ", status.progress, status.status);
        })
        .await;

    match result {
        Ok(status) => {
            println!();
            match status.output_url {
                Some(url) => println!("Render complete: {url}"),
                None => println!("Render complete"),
            }
            Ok(())
        }
        Err(e) => {
            println!();
            Err(anyhow::anyhow!("Render did not complete: {e}"))
        }
    }
}
