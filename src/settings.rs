//! Game settings
//!
//! Persisted as JSON next to the executable. Gameplay tuning lives in
//! [`crate::consts`]; this only covers the environment the game runs in.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Errors from reading or writing the settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Viewport ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === World ===
    pub world_width: f32,
    pub world_height: f32,

    // === Leaderboard ===
    /// Text file holding `name,kills` records
    pub score_file: PathBuf,
    /// Name shown in the menu before the player edits it
    pub default_name: String,

    // === Simulation ===
    /// RNG seed for the run
    pub seed: u64,
    /// Length of the headless autopilot session
    pub demo_seconds: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 600.0,

            world_width: 2400.0,
            world_height: 2400.0,

            score_file: PathBuf::from("mark_scores.txt"),
            default_name: "MARK".to_string(),

            seed: 0x4d41_524b,
            demo_seconds: 90.0,
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const FILE_NAME: &'static str = "mark_settings.json";

    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.world_width, self.world_height)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&json)?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings file at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
