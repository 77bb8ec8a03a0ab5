use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use annotate::host::QueuedTextPrompt;
use annotate::settings::{ConfigManager, Settings};
use annotate::{Replayer, drawing_config, load_script};

/// Replay a scripted annotation session and write its captures.
#[derive(Parser)]
#[command(name = "annotate")]
#[command(about = "Replay annotation canvas scripts and export captures")]
struct Cli {
    /// JSON array of canvas messages
    #[arg(short, long)]
    script: PathBuf,

    /// Settings file (default: ~/.annotate/settings.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for capture-<n>.png files
    #[arg(short, long, default_value = "captures")]
    out_dir: PathBuf,

    /// Override the canvas width
    #[arg(long)]
    width: Option<u32>,

    /// Override the canvas height
    #[arg(long)]
    height: Option<u32>,

    /// Answers for the text tool prompt, used in order
    #[arg(long = "text")]
    text: Vec<String>,

    /// Write the final document as JSON
    #[arg(long)]
    dump_document: Option<PathBuf>,
}

fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,annotate=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    let base = manager.get();
    let settings = Settings {
        canvas_width: cli.width.unwrap_or(base.canvas_width),
        canvas_height: cli.height.unwrap_or(base.canvas_height),
        ..base
    };

    let messages = load_script(&cli.script)?;
    tracing::info!(
        messages = messages.len(),
        width = settings.canvas_width,
        height = settings.canvas_height,
        "replaying {}",
        cli.script.display()
    );

    let mut replayer = Replayer::new(
        drawing_config(&settings),
        &cli.out_dir,
        Duration::from_millis(settings.frame_interval_ms),
    )?;
    if !cli.text.is_empty() {
        replayer
            .canvas_mut()
            .set_text_prompt(Box::new(QueuedTextPrompt::new(cli.text.clone())));
    }

    let summary = replayer.run(messages)?.clone();
    if let Some(path) = &cli.dump_document {
        replayer.dump_document(path)?;
        tracing::info!(path = %path.display(), "document written");
    }

    tracing::info!(
        frames = summary.frames,
        captures = summary.captures.len(),
        empty = summary.empty_captures,
        elements = replayer.canvas().document().len(),
        "done"
    );
    Ok(())
}
