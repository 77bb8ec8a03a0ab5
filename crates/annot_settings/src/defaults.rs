use std::path::PathBuf;

// Canvas defaults
pub fn default_canvas_width() -> u32 {
    800
}

pub fn default_canvas_height() -> u32 {
    600
}

// Stroke defaults
pub fn default_stroke_color() -> String {
    "#e03131".to_string()
}

pub fn default_stroke_width() -> f32 {
    2.0
}

pub fn default_freehand_width() -> f32 {
    3.0
}

pub fn default_bar_corner_radius() -> f32 {
    8.0
}

// Font defaults
pub fn default_font_size() -> f32 {
    20.0
}

pub fn default_font_family() -> String {
    "sans-serif".to_string()
}

// Selection highlight defaults
pub fn default_highlight_color() -> String {
    "#1e90ff".to_string()
}

pub fn default_highlight_width() -> f32 {
    2.0
}

// Render loop cadence (~60 fps)
pub fn default_frame_interval_ms() -> u64 {
    16
}

// Config directory default
pub fn default_config_dir() -> PathBuf {
    // Prefer a user home directory.
    if let Ok(home_dir) = std::env::var("HOME") {
        return PathBuf::from(home_dir);
    }
    if let Ok(home_dir) = std::env::var("USERPROFILE") {
        return PathBuf::from(home_dir);
    }

    // Fallback: program directory.
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.to_path_buf();
    }

    // Last resort: cwd.
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
