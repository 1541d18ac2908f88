//! Persisted menu choices.
//!
//! Loaded leniently: a missing or corrupt file falls back to defaults, and
//! out-of-range values are clamped on read so a hand-edited file can't wedge
//! the game.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::keyboard::Skill;

pub const MIN_ROUND_SECS: f64 = 60.0;
pub const MAX_ROUND_SECS: f64 = 300.0;
pub const DEFAULT_ROUND_SECS: f64 = 180.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlayerSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub skill: Skill,
    #[serde(default = "default_round_secs")]
    pub round_duration_secs: f64,
    #[serde(default = "default_music_enabled")]
    pub music_enabled: bool,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            skill: Skill::default(),
            round_duration_secs: DEFAULT_ROUND_SECS,
            music_enabled: true,
        }
    }
}

impl PlayerSettings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        if !self.round_duration_secs.is_finite() {
            self.round_duration_secs = DEFAULT_ROUND_SECS;
        }
        self.round_duration_secs = self.round_duration_secs.clamp(MIN_ROUND_SECS, MAX_ROUND_SECS);
        self
    }
}

fn default_version() -> u32 {
    1
}

fn default_round_secs() -> f64 {
    DEFAULT_ROUND_SECS
}

fn default_music_enabled() -> bool {
    true
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("KEYTOON_SETTINGS_PATH") {
            return Self {
                path: PathBuf::from(explicit),
            };
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("keytoon");
        path.push("settings.json");
        Self { path }
    }

    pub fn load(&self) -> PlayerSettings {
        let Ok(bytes) = fs::read(&self.path) else {
            return PlayerSettings::default();
        };
        serde_json::from_slice::<PlayerSettings>(&bytes)
            .map(PlayerSettings::sanitized)
            .unwrap_or_else(|_| PlayerSettings::default())
    }

    pub fn save(&self, settings: &PlayerSettings) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_clamps_duration_into_range() {
        let low = PlayerSettings {
            round_duration_secs: 5.0,
            ..PlayerSettings::default()
        }
        .sanitized();
        assert_eq!(low.round_duration_secs, MIN_ROUND_SECS);

        let high = PlayerSettings {
            round_duration_secs: 9_000.0,
            version: 42,
            ..PlayerSettings::default()
        }
        .sanitized();
        assert_eq!(high.round_duration_secs, MAX_ROUND_SECS);
        assert_eq!(high.version, 1);

        let nan = PlayerSettings {
            round_duration_secs: f64::NAN,
            ..PlayerSettings::default()
        }
        .sanitized();
        assert_eq!(nan.round_duration_secs, DEFAULT_ROUND_SECS);
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let parsed: PlayerSettings =
            serde_json::from_str(r#"{"version":1,"skill":"Letters"}"#).expect("settings parse");
        assert_eq!(parsed.skill, Skill::Letters);
        assert_eq!(parsed.round_duration_secs, DEFAULT_ROUND_SECS);
        assert!(parsed.music_enabled);
    }

    #[test]
    fn settings_round_trip_through_json() {
        let settings = PlayerSettings {
            skill: Skill::Numbers,
            round_duration_secs: 120.0,
            music_enabled: false,
            ..PlayerSettings::default()
        };
        let json = serde_json::to_string(&settings).expect("serialize settings");
        let restored: PlayerSettings = serde_json::from_str(&json).expect("deserialize settings");
        assert_eq!(restored, settings);
    }
}
