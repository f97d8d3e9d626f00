//! Player settings persistence.
//!
//! Settings are saved to a local JSON file in the user's config directory and
//! loaded once at startup. Menus write through [`GameSettings::save`].

use bevy::{audio::Volume, prelude::*};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::game::{CaptureMode, MissPolicy};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<GameSettings>();
    app.add_systems(Startup, load_settings);
    app.add_systems(Update, apply_volume.run_if(resource_changed::<GameSettings>));
}

/// Spawn probability at the easy end of the difficulty scale.
pub const EASIEST_SPAWN_PROBABILITY: f32 = 0.70;
/// Spawn probability at the hard end of the difficulty scale.
pub const HARDEST_SPAWN_PROBABILITY: f32 = 0.10;
/// One press of the harder/easier buttons.
pub const DIFFICULTY_STEP: f32 = 0.05;
/// Number of fishing levels; the last one has no "Continue".
pub const LEVEL_COUNT: u32 = 3;

const MAX_VOLUME: f32 = 3.0;

/// Everything the player can choose between levels.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Zero-based level; scales fish speed.
    pub level_index: u32,
    pub capture_mode: CaptureMode,
    /// Chance that a spawned fish matches the target.
    pub spawn_probability: f32,
    pub special_effects: bool,
    /// Index into the criterion presets.
    pub criterion_index: usize,
    /// Give letter, number, species and shape targets a color as well.
    pub use_palette: bool,
    /// What a wrong catch does to the target.
    pub miss_policy: MissPolicy,
    pub master_volume: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            level_index: 0,
            capture_mode: CaptureMode::Tap,
            spawn_probability: EASIEST_SPAWN_PROBABILITY,
            special_effects: true,
            criterion_index: 0,
            use_palette: false,
            miss_policy: MissPolicy::Ignore,
            master_volume: 1.0,
        }
    }
}

/// Named bands of the spawn probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub fn of(probability: f32) -> Self {
        if probability >= 0.55 {
            Difficulty::Easy
        } else if probability >= 0.30 {
            Difficulty::Normal
        } else {
            Difficulty::Hard
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }
}

impl GameSettings {
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::of(self.spawn_probability)
    }

    /// e.g. "Normal (45%)".
    pub fn difficulty_label(&self) -> String {
        format!(
            "{} ({:.0}%)",
            self.difficulty().name(),
            self.spawn_probability * 100.0
        )
    }

    /// Move the spawn probability by `delta`, staying on the difficulty scale.
    pub fn adjust_spawn_probability(&mut self, delta: f32) {
        self.spawn_probability = (self.spawn_probability + delta)
            .clamp(HARDEST_SPAWN_PROBABILITY, EASIEST_SPAWN_PROBABILITY);
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        self.master_volume = (self.master_volume + delta).clamp(0.0, MAX_VOLUME);
    }

    /// Whether another level follows the current one.
    pub fn has_next_level(&self) -> bool {
        self.level_index + 1 < LEVEL_COUNT
    }

    /// Pull out-of-range values from an edited or stale file back into range.
    fn sanitized(mut self) -> Self {
        self.spawn_probability = if self.spawn_probability.is_finite() {
            self.spawn_probability
                .clamp(HARDEST_SPAWN_PROBABILITY, EASIEST_SPAWN_PROBABILITY)
        } else {
            EASIEST_SPAWN_PROBABILITY
        };
        self.level_index = self.level_index.min(LEVEL_COUNT - 1);
        self.master_volume = if self.master_volume.is_finite() {
            self.master_volume.clamp(0.0, MAX_VOLUME)
        } else {
            1.0
        };
        self
    }

    fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(contents).map(Self::sanitized)
    }

    /// Get the file path for storing settings.
    fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("catch_the_fish").join("settings.json"))
    }

    /// Load settings from disk.
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            warn!("Could not determine config directory for settings");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found at {:?}, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk.
    pub fn save(&self) {
        let Some(path) = Self::file_path() else {
            warn!("Could not determine config directory for saving settings");
            return;
        };

        if let Some(parent) = path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warn!("Failed to create settings directory: {}", e);
            return;
        }

        match serde_json::to_string_pretty(self) {
            Ok(json) => match fs::write(&path, json) {
                Ok(()) => debug!("Saved settings to {:?}", path),
                Err(e) => warn!("Failed to write settings: {}", e),
            },
            Err(e) => warn!("Failed to serialize settings: {}", e),
        }
    }
}

fn load_settings(mut settings: ResMut<GameSettings>) {
    *settings = GameSettings::load();
}

fn apply_volume(settings: Res<GameSettings>, mut global_volume: ResMut<GlobalVolume>) {
    global_volume.volume = Volume::Linear(settings.master_volume);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_easy_tap_with_effects() {
        let settings = GameSettings::default();
        assert_eq!(settings.capture_mode, CaptureMode::Tap);
        assert_eq!(settings.difficulty(), Difficulty::Easy);
        assert!(settings.special_effects);
        assert!(!settings.use_palette);
        assert_eq!(settings.miss_policy, MissPolicy::Ignore);
        assert_eq!(settings.level_index, 0);
    }

    #[test]
    fn difficulty_bands() {
        assert_eq!(Difficulty::of(0.70), Difficulty::Easy);
        assert_eq!(Difficulty::of(0.55), Difficulty::Easy);
        assert_eq!(Difficulty::of(0.54), Difficulty::Normal);
        assert_eq!(Difficulty::of(0.30), Difficulty::Normal);
        assert_eq!(Difficulty::of(0.29), Difficulty::Hard);
        assert_eq!(Difficulty::of(0.10), Difficulty::Hard);
    }

    #[test]
    fn spawn_probability_stays_on_the_scale() {
        let mut settings = GameSettings::default();
        settings.adjust_spawn_probability(0.5);
        assert_eq!(settings.spawn_probability, EASIEST_SPAWN_PROBABILITY);
        settings.adjust_spawn_probability(-2.0);
        assert_eq!(settings.spawn_probability, HARDEST_SPAWN_PROBABILITY);
        assert_eq!(settings.difficulty_label(), "Hard (10%)");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings = GameSettings::from_json(r#"{ "level_index": 2, "use_palette": true }"#)
            .unwrap();
        assert_eq!(settings.level_index, 2);
        assert!(settings.use_palette);
        assert_eq!(settings.spawn_probability, EASIEST_SPAWN_PROBABILITY);
        assert!(!settings.has_next_level());
    }

    #[test]
    fn stale_values_are_pulled_into_range() {
        let settings = GameSettings::from_json(
            r#"{ "spawn_probability": 0.8, "level_index": 7, "capture_mode": "Hook", "miss_policy": "Retarget" }"#,
        )
        .unwrap();
        assert_eq!(settings.spawn_probability, EASIEST_SPAWN_PROBABILITY);
        assert_eq!(settings.level_index, LEVEL_COUNT - 1);
        assert_eq!(settings.capture_mode, CaptureMode::Hook);
        assert_eq!(settings.miss_policy, MissPolicy::Retarget);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(GameSettings::from_json("not json").is_err());
    }
}
