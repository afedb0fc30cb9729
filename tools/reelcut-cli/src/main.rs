//! Reelcut CLI: replay edit scripts and hand them to the render backend.
//!
//! Usage:
//!   reelcut info <SCRIPT>       Replay a script and show the edited timeline
//!   reelcut plan <SCRIPT>       Print the render request a script produces
//!   reelcut fillers <SCRIPT>    Detect filler words and silences
//!   reelcut render <SCRIPT>     Submit a render and wait for it to finish

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use reelcut_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "reelcut",
    about = "Non-destructive editing for screen recordings",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the user config location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the config file
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Which editing model describes the cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimelineMode {
    /// Ordered keep ranges from the segment store
    Segments,
    /// Whole source minus the deletion list
    Deletions,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay an edit script and show the resulting timeline
    Info {
        /// Path to the edit script
        script: PathBuf,
    },

    /// Print the render request for an edit script
    Plan {
        /// Path to the edit script
        script: PathBuf,

        /// Timeline representation sent to the renderer
        #[arg(long, value_enum, default_value = "segments")]
        mode: TimelineMode,

        /// Write the request here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Detect filler words and long silences
    Fillers {
        /// Path to the edit script
        script: PathBuf,

        /// Ask the backend instead of analyzing the script's transcript
        #[arg(long)]
        remote: bool,

        /// Minimum pause flagged as silence (seconds)
        #[arg(long)]
        threshold: Option<f64>,

        /// Store the candidates in the script for `apply_fillers` edits
        #[arg(long)]
        write: bool,
    },

    /// Submit a render job and follow it
    Render {
        /// Path to the edit script
        script: PathBuf,

        /// Timeline representation sent to the renderer
        #[arg(long, value_enum, default_value = "segments")]
        mode: TimelineMode,

        /// Print the job id and exit without waiting
        #[arg(long)]
        detach: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if let Some(url) = cli.backend {
        config.backend.base_url = url;
    }
    reelcut_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Info { script } => commands::info::run(&config, script),
        Commands::Plan {
            script,
            mode,
            output,
        } => commands::plan::run(&config, script, mode, output),
        Commands::Fillers {
            script,
            remote,
            threshold,
            write,
        } => commands::fillers::run(&mut config, script, remote, threshold, write).await,
        Commands::Render {
            script,
            mode,
            detach,
        } => commands::render::run(&config, script, mode, detach).await,
    }
}
