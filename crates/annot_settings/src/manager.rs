use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::Settings;

/// Unified config manager.
pub struct ConfigManager {
    settings: Arc<RwLock<Settings>>,
    /// Explicit settings file; `None` means the default location.
    path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create a new config manager (loads settings once and caches them).
    pub fn new() -> Self {
        Self {
            settings: Arc::new(RwLock::new(Settings::load())),
            path: None,
        }
    }

    /// Config manager backed by an explicit file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            settings: Arc::new(RwLock::new(Settings::load_from(&path))),
            path: Some(path),
        }
    }

    /// Get a snapshot copy of current settings.
    pub fn get(&self) -> Settings {
        self.settings.read().clone()
    }

    /// Get the shared settings reference.
    pub fn get_shared(&self) -> Arc<RwLock<Settings>> {
        Arc::clone(&self.settings)
    }

    /// Reload settings from disk.
    pub fn reload(&self) {
        let new_settings = match &self.path {
            Some(path) => Settings::load_from(path),
            None => Settings::load(),
        };
        *self.settings.write() = new_settings;
    }

    /// Replace the cached settings and persist them.
    pub fn update(&self, settings: Settings) -> anyhow::Result<()> {
        match &self.path {
            Some(path) => settings.save_to(path)?,
            None => settings.save()?,
        }
        *self.settings.write() = settings;
        Ok(())
    }

    // Convenience accessors.

    #[inline]
    pub fn canvas_size(&self) -> (u32, u32) {
        let s = self.settings.read();
        (s.canvas_width, s.canvas_height)
    }

    #[inline]
    pub fn frame_interval_ms(&self) -> u64 {
        self.settings.read().frame_interval_ms
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let manager = ConfigManager::with_path(&path);
        assert_eq!(manager.canvas_size(), (800, 600));

        let edited = Settings {
            canvas_width: 1280,
            canvas_height: 720,
            ..Settings::default()
        };
        edited.save_to(&path).unwrap();
        assert_eq!(manager.canvas_size(), (800, 600));

        manager.reload();
        assert_eq!(manager.canvas_size(), (1280, 720));
        assert_eq!(manager.get_shared().read().canvas_width, 1280);
    }

    #[test]
    fn test_update_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let manager = ConfigManager::with_path(&path);
        manager
            .update(Settings {
                frame_interval_ms: 0,
                ..Settings::default()
            })
            .unwrap();
        assert_eq!(manager.frame_interval_ms(), 0);
        assert_eq!(Settings::load_from(&path).frame_interval_ms, 0);
    }
}
