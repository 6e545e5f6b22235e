//! Game settings and preferences
//!
//! Persisted separately from the high scores, one JSON blob per store.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::persistence::{KeyValueStore, load_json, save_json};

/// Boolean settings addressable by key (menu toggles)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    HasPlayed,
    MusicOn,
    SfxOn,
    MuteOnBlur,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::HasPlayed => "has_played",
            SettingKey::MusicOn => "music_on",
            SettingKey::SfxOn => "sfx_on",
            SettingKey::MuteOnBlur => "mute_on_blur",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Skip the how-to-play screen once a round has been played
    pub has_played: bool,
    pub music_on: bool,
    pub sfx_on: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            has_played: false,
            music_on: true,
            sfx_on: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "depth_raider_settings";

    pub fn flag(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::HasPlayed => self.has_played,
            SettingKey::MusicOn => self.music_on,
            SettingKey::SfxOn => self.sfx_on,
            SettingKey::MuteOnBlur => self.mute_on_blur,
        }
    }

    /// Flip a flag, returning its new value
    pub fn toggle(&mut self, key: SettingKey) -> bool {
        let value = !self.flag(key);
        self.set_flag(key, value);
        value
    }

    pub fn set_flag(&mut self, key: SettingKey, value: bool) {
        let slot = match key {
            SettingKey::HasPlayed => &mut self.has_played,
            SettingKey::MusicOn => &mut self.music_on,
            SettingKey::SfxOn => &mut self.sfx_on,
            SettingKey::MuteOnBlur => &mut self.mute_on_blur,
        };
        *slot = value;
    }

    /// Effective sound effect gain (0 when sfx are off)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sfx_on {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Load settings, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Settings>(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(err) => {
                log::warn!("Using default settings: {err}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), GameError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
