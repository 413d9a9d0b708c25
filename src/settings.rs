//! User settings persistence - save/load config to a JSON file.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::AUTOSAVE_SECONDS;

/// Persisted runner settings. Saved to `Documents/Moonvale/settings.json`.
/// Unknown fields from older builds fall back to defaults field by field.
#[derive(Resource, Serialize, Deserialize, Clone)]
pub struct UserSettings {
    #[serde(default = "default_autosave")]
    pub autosave_seconds: f32,
    /// Echo user-facing notices into the log output (headless runs).
    #[serde(default = "default_true")]
    pub log_notices: bool,
}

fn default_true() -> bool {
    true
}
fn default_autosave() -> f32 {
    AUTOSAVE_SECONDS
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            autosave_seconds: AUTOSAVE_SECONDS,
            log_notices: true,
        }
    }
}

fn settings_path() -> Option<PathBuf> {
    let home = std::env::var("USERPROFILE")
        .or_else(|_| std::env::var("HOME"))
        .ok()?;
    let dir = PathBuf::from(home).join("Documents").join("Moonvale");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join("settings.json"))
}

pub fn save_settings(settings: &UserSettings) {
    let Some(path) = settings_path() else { return };
    match serde_json::to_string_pretty(settings) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&path, json) {
                warn!("Failed to save settings: {}", e);
            }
        }
        Err(e) => warn!("Failed to serialize settings: {}", e),
    }
}

pub fn load_settings() -> UserSettings {
    let Some(path) = settings_path() else {
        return UserSettings::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
        Err(_) => UserSettings::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fill_with_defaults() {
        let parsed: UserSettings = serde_json::from_str(r#"{ "log_notices": false }"#).unwrap();
        assert!(!parsed.log_notices);
        assert_eq!(parsed.autosave_seconds, AUTOSAVE_SECONDS);
    }
}
