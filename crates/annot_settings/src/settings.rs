use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults::*;

/// Persisted annotation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,

    /// CSS hex color for new elements.
    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
    #[serde(default = "default_freehand_width")]
    pub freehand_width: f32,
    #[serde(default = "default_bar_corner_radius")]
    pub bar_corner_radius: f32,

    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "default_font_family")]
    pub font_family: String,

    #[serde(default = "default_highlight_color")]
    pub highlight_color: String,
    #[serde(default = "default_highlight_width")]
    pub highlight_width: f32,

    /// Delay between rendered frames; `0` renders back to back.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),

            stroke_color: default_stroke_color(),
            stroke_width: default_stroke_width(),
            freehand_width: default_freehand_width(),
            bar_corner_radius: default_bar_corner_radius(),

            font_size: default_font_size(),
            font_family: default_font_family(),

            highlight_color: default_highlight_color(),
            highlight_width: default_highlight_width(),

            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl Settings {
    fn settings_dir() -> PathBuf {
        default_config_dir().join(".annotate")
    }

    /// `<home>/.annotate/settings.json`
    pub fn default_path() -> PathBuf {
        Self::settings_dir().join("settings.json")
    }

    /// Load settings from the default path.
    ///
    /// Falls back to defaults if loading fails.
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Load settings from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::info!(path = %path.display(), "using default settings: {e:#}");
                Self::default()
            }
        }
    }

    pub fn try_load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let settings = serde_json::from_str::<Settings>(&content)?;
        Ok(settings)
    }

    /// Save settings to the default path.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Save settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
