//! Scripted session replay.
//!
//! A script is a JSON array of [`CanvasMessage`]s. Every message is handed to
//! the canvas and followed by one rendered frame, standing in for the
//! continuous render loop of an interactive host.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use base64::{Engine as _, engine::general_purpose};

use annot_drawing::Color;
use annot_host::{AnnotationCanvas, DrawingConfig};
use annot_protocol::{CanvasMessage, Command};
use annot_settings::Settings;

/// Build the canvas configuration from persisted settings.
///
/// Malformed colors fall back to the built-in defaults.
pub fn drawing_config(settings: &Settings) -> DrawingConfig {
    let defaults = DrawingConfig::default();
    let color = |value: &str, fallback: Color| match Color::from_hex(value) {
        Ok(color) => color,
        Err(e) => {
            tracing::warn!("{e}; using {fallback}");
            fallback
        }
    };

    DrawingConfig {
        width: settings.canvas_width,
        height: settings.canvas_height,
        stroke_color: color(&settings.stroke_color, defaults.stroke_color),
        stroke_width: settings.stroke_width,
        freehand_width: settings.freehand_width,
        bar_corner_radius: settings.bar_corner_radius,
        font_size: settings.font_size,
        font_family: settings.font_family.clone(),
        highlight_color: color(&settings.highlight_color, defaults.highlight_color),
        highlight_width: settings.highlight_width,
    }
}

/// Read a replay script.
pub fn load_script(path: &Path) -> anyhow::Result<Vec<CanvasMessage>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let messages = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse script {}", path.display()))?;
    Ok(messages)
}

/// What a replay produced.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReplaySummary {
    pub messages: usize,
    pub frames: usize,
    /// Written capture files, in order.
    pub captures: Vec<PathBuf>,
    /// Capture requests that produced no image.
    pub empty_captures: usize,
}

/// Drives one mounted canvas through a script.
pub struct Replayer {
    canvas: AnnotationCanvas,
    out_dir: PathBuf,
    frame_interval: Duration,
    summary: ReplaySummary,
}

impl Replayer {
    /// Mount a canvas and prepare the output directory.
    pub fn new(config: DrawingConfig, out_dir: impl Into<PathBuf>, frame_interval: Duration) -> anyhow::Result<Self> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("failed to create {}", out_dir.display()))?;

        let mut canvas = AnnotationCanvas::new(config);
        canvas.mount().context("failed to mount canvas")?;

        Ok(Self {
            canvas,
            out_dir,
            frame_interval,
            summary: ReplaySummary::default(),
        })
    }

    pub fn canvas(&self) -> &AnnotationCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut AnnotationCanvas {
        &mut self.canvas
    }

    pub fn summary(&self) -> &ReplaySummary {
        &self.summary
    }

    /// Apply one message, persist any capture, then render a frame.
    pub fn step(&mut self, message: CanvasMessage) -> anyhow::Result<Vec<Command>> {
        tracing::trace!(?message, "replaying");
        let commands = self.canvas.handle_message(message);
        self.summary.messages += 1;

        for command in &commands {
            match command {
                Command::Captured(Some(payload)) => {
                    let path = self.write_capture(payload)?;
                    tracing::info!(path = %path.display(), "capture written");
                    self.summary.captures.push(path);
                }
                Command::Captured(None) => {
                    tracing::warn!("capture produced no image");
                    self.summary.empty_captures += 1;
                }
                _ => {}
            }
        }

        self.canvas.render_frame().context("frame render failed")?;
        self.summary.frames += 1;
        if !self.frame_interval.is_zero() {
            thread::sleep(self.frame_interval);
        }
        Ok(commands)
    }

    pub fn run(&mut self, messages: impl IntoIterator<Item = CanvasMessage>) -> anyhow::Result<&ReplaySummary> {
        for message in messages {
            self.step(message)?;
        }
        Ok(&self.summary)
    }

    /// Write the final document as pretty JSON.
    pub fn dump_document(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self.canvas.document())?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn into_canvas(self) -> AnnotationCanvas {
        self.canvas
    }

    fn write_capture(&self, payload: &str) -> anyhow::Result<PathBuf> {
        let bytes = general_purpose::STANDARD
            .decode(payload)
            .context("capture payload is not base64")?;
        let path = self
            .out_dir
            .join(format!("capture-{}.png", self.summary.captures.len() + 1));
        fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}
