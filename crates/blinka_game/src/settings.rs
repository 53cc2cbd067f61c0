use blinka_core::time::DEFAULT_FPS;
use blinka_platform::window::{PlatformConfig, DEFAULT_WINDOW_SCALE};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_SETTINGS_PATH: &str = "blinka_settings.json";

const MAX_WINDOW_SCALE: u32 = 16;
const MAX_FPS: u32 = 240;

/// Optional user settings. Every field may be left out of the file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub title: String,
    pub window_scale: u32,
    pub fps: u32,
    pub show_debug_overlay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Blinka".to_string(),
            window_scale: DEFAULT_WINDOW_SCALE,
            fps: DEFAULT_FPS,
            show_debug_overlay: false,
        }
    }
}

impl Settings {
    pub fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            title: self.title.clone(),
            scale: self.window_scale,
        }
    }
}

pub fn load_settings_from_path(path: &Path) -> Result<Settings, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse settings JSON {}: {e}", path.display()))?;
    validate_settings(&settings)?;
    Ok(settings)
}

/// Like [`load_settings_from_path`], but a missing file means defaults.
pub fn load_settings_or_default(path: &Path) -> Result<Settings, String> {
    if !path.exists() {
        log::info!(
            "No settings file at {}, using defaults",
            path.display()
        );
        return Ok(Settings::default());
    }
    let settings = load_settings_from_path(path)?;
    log::info!("Loaded settings from {}", path.display());
    Ok(settings)
}

fn validate_settings(settings: &Settings) -> Result<(), String> {
    if !(1..=MAX_WINDOW_SCALE).contains(&settings.window_scale) {
        return Err(format!(
            "Settings validation failed: window_scale must be in 1..={MAX_WINDOW_SCALE}, got {}",
            settings.window_scale
        ));
    }
    if !(1..=MAX_FPS).contains(&settings.fps) {
        return Err(format!(
            "Settings validation failed: fps must be in 1..={MAX_FPS}, got {}",
            settings.fps
        ));
    }
    if settings.title.trim().is_empty() {
        return Err("Settings validation failed: title is empty".to_string());
    }
    Ok(())
}
