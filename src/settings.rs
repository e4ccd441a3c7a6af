//! Game settings and preferences
//!
//! Persisted separately from player progress (LocalStorage on web,
//! `settings.json` in the data directory on native).

use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use crate::persistence::StoreError;
use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all audio
    pub muted: bool,

    // === Visuals ===
    /// Play the background video feed when one is available
    pub background_feed: bool,
    /// Show FPS counter
    pub show_fps: bool,

    // === Gameplay ===
    /// Fixed spawner seed (None = seed from the clock each session)
    pub seed: Option<u64>,
    /// Game balance overrides
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            background_feed: true,
            show_fps: false,

            seed: None,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Storage key / file stem
    pub const STORAGE_KEY: &'static str = "flap_shop_settings";

    /// Effective sound effect volume
    pub fn effect_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Parse settings JSON, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(mut settings) => {
                settings.tuning = settings.tuning.sanitized();
                settings
            }
            Err(e) => {
                log::warn!("Settings unreadable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match crate::platform::web::read_local(Self::STORAGE_KEY) {
            Some(json) => {
                log::info!("Loaded settings from LocalStorage");
                Self::from_json(&json)
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            if crate::platform::web::write_local(Self::STORAGE_KEY, &json).is_ok() {
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from the data directory (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(&crate::platform::native::data_dir().join("settings.json"))
    }

    /// Load settings from a JSON file; missing or unreadable files give defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json(&json)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON, creating the parent directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_volume() {
        let mut settings = Settings::default();
        assert!((settings.effect_volume() - 0.8).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.effect_volume(), 0.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"muted": true, "tuning": {"gap_height": 2000}}"#);
        assert!(settings.muted);
        assert_eq!(settings.sfx_volume, 1.0);
        assert_eq!(settings.tuning.gap_height, settings.tuning.screen_height);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        assert_eq!(Settings::load_from(&path), Settings::default());

        let settings = Settings {
            muted: true,
            show_fps: true,
            seed: Some(11),
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_unreadable_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a file
        assert_eq!(Settings::load_from(dir.path()), Settings::default());
    }

    #[test]
    fn test_garbage_json_gives_defaults() {
        assert_eq!(Settings::from_json("]]"), Settings::default());
    }
}
