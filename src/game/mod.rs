//! The fishing minigame.
//!
//! This module contains all the gameplay logic including:
//! - Criteria, presets and target selection
//! - Fish spawning, movement and the live fish registry
//! - Capture input (tap or hook) and its resolution
//! - Quota progress, the level state machine and the celebration
//! - The bubble bonus round

mod bonus;
mod capture;
mod criterion;
mod debug;
mod hook;
mod hud;
mod motion;
mod polish;
mod preset;
mod progress;
mod registry;
mod spawner;
mod target;

use bevy::prelude::*;

pub use bonus::BonusRoundComplete;
pub use capture::CaptureMode;
pub use preset::{CriterionPreset, PRESETS};
pub use progress::{LevelPhase, LevelRun, MissPolicy};

use self::{
    preset::{LevelRules, preset},
    progress::{ProgressChanged, ProgressTracker},
    registry::EntityRegistry,
    spawner::{PlayArea, SpawnConfig, SpawnScheduler, SpawnTimer, WATER_ZONE},
    target::{ActiveTarget, TargetSelector, TargetShown},
};
use crate::{screens::Screen, settings::GameSettings};

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        criterion::plugin,
        target::plugin,
        registry::plugin,
        spawner::plugin,
        motion::plugin,
        capture::plugin,
        hook::plugin,
        progress::plugin,
        hud::plugin,
        polish::plugin,
        bonus::plugin,
        debug::plugin,
    ));
}

/// Build the level from the current settings and start spawning.
/// Called from `screens/fishing.rs` on `OnEnter(Screen::Fishing)`.
pub fn start_level(
    mut commands: Commands,
    settings: Res<GameSettings>,
    spawn_config: Res<SpawnConfig>,
    mut run: ResMut<LevelRun>,
    mut registry: ResMut<EntityRegistry>,
    mut shown: MessageWriter<TargetShown>,
    mut progress: MessageWriter<ProgressChanged>,
    asset_server: Res<AssetServer>,
) -> Result {
    let preset = preset(settings.criterion_index)?;
    let rules = LevelRules::new(preset, settings.use_palette, settings.level_index)?
        .with_miss(settings.miss_policy);
    let mode = settings.capture_mode;
    let area = PlayArea::from_zone(WATER_ZONE, mode)?;

    let config = spawn_config
        .clone()
        .with_target_weight(settings.spawn_probability);
    let interval = config.interval;

    let mut selector = TargetSelector::new(rules.order);
    let first = selector.generate(rules.kind, &rules.pools, rules.use_palette, &mut rand::rng())?;
    shown.write(TargetShown(first.display()));
    progress.write(ProgressChanged {
        caught: 0,
        quota: rules.quota,
    });

    // Anything left from an interrupted level is swept by the screen exit.
    registry.drain();
    let generation = run.start();

    commands.insert_resource(ProgressTracker::new(rules.quota, rules.rotation, rules.miss));
    commands.insert_resource(ActiveTarget::new(first));
    commands.insert_resource(selector);
    commands.insert_resource(SpawnScheduler::new(config, &area));
    commands.insert_resource(SpawnTimer::new(generation, interval));
    commands.insert_resource(area);
    commands.insert_resource(mode);

    commands.spawn((
        Name::new("Water"),
        Sprite::from_image(asset_server.load("images/water.png")),
        Transform::from_xyz(0.0, 0.0, -1.0),
        DespawnOnExit(Screen::Fishing),
    ));
    if mode == CaptureMode::Hook {
        hook::spawn_hook(&mut commands, &asset_server);
    }

    info!(
        "Level {} started: {} ({:?}, quota {}, generation {})",
        rules.level_index + 1,
        rules.name,
        mode,
        rules.quota,
        generation
    );
    commands.insert_resource(rules);
    Ok(())
}

/// Drop the per-level resources once the player leaves the water.
pub fn end_level(mut commands: Commands) {
    commands.remove_resource::<LevelRules>();
    commands.remove_resource::<ActiveTarget>();
    commands.remove_resource::<TargetSelector>();
    commands.remove_resource::<ProgressTracker>();
    commands.remove_resource::<PlayArea>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{create_test_app, tick};
    use pretty_assertions::assert_eq;

    fn level_app(settings: GameSettings) -> App {
        let mut app = create_test_app();
        app.add_plugins(AssetPlugin {
            watch_for_changes_override: Some(false),
            ..default()
        })
        .init_asset::<Image>()
        .add_message::<TargetShown>()
        .add_message::<ProgressChanged>()
        .insert_resource(settings)
        .init_resource::<SpawnConfig>()
        .init_resource::<LevelRun>()
        .init_resource::<EntityRegistry>()
        .init_resource::<Started>()
        .add_systems(Update, start_level.pipe(record));
        app
    }

    #[derive(Resource, Default)]
    struct Started(Vec<bool>);

    fn record(In(result): In<Result>, mut started: ResMut<Started>) {
        started.0.push(result.is_ok());
    }

    #[test]
    fn level_start_builds_rules_and_target() {
        let settings = GameSettings {
            criterion_index: 0,
            level_index: 1,
            ..default()
        };
        let mut app = level_app(settings);
        tick(&mut app);

        assert_eq!(app.world().resource::<Started>().0, vec![true]);
        let rules = app.world().resource::<LevelRules>();
        assert_eq!(rules.name, PRESETS[0].name);
        assert_eq!(rules.level_index, 1);
        assert_eq!(app.world().resource::<ActiveTarget>().get().letter, Some('A'));
        assert_eq!(app.world().resource::<LevelRun>().generation(), 1);
        assert!(app.world().resource::<LevelRun>().is_spawning());
        assert_eq!(*app.world().resource::<CaptureMode>(), CaptureMode::Tap);
    }

    #[test]
    fn chosen_miss_policy_reaches_the_tracker() {
        let settings = GameSettings {
            miss_policy: MissPolicy::Retarget,
            ..default()
        };
        let mut app = level_app(settings);
        tick(&mut app);

        assert_eq!(app.world().resource::<LevelRules>().miss, MissPolicy::Retarget);
        let outcome = app
            .world_mut()
            .resource_mut::<ProgressTracker>()
            .on_capture(false);
        assert!(outcome.wants_new_target());
    }

    #[test]
    fn default_settings_keep_the_target_on_a_miss() {
        let mut app = level_app(GameSettings::default());
        tick(&mut app);

        let outcome = app
            .world_mut()
            .resource_mut::<ProgressTracker>()
            .on_capture(false);
        assert!(!outcome.wants_new_target());
    }

    #[test]
    fn unknown_preset_fails_fast() {
        let settings = GameSettings {
            criterion_index: PRESETS.len(),
            ..default()
        };
        let mut app = level_app(settings);
        tick(&mut app);

        assert_eq!(app.world().resource::<Started>().0, vec![false]);
        assert!(app.world().get_resource::<LevelRules>().is_none());
        assert!(!app.world().resource::<LevelRun>().is_spawning());
    }

    #[test]
    fn hook_mode_narrows_the_play_area() {
        let settings = GameSettings {
            capture_mode: CaptureMode::Hook,
            ..default()
        };
        let mut app = level_app(settings);
        tick(&mut app);

        let area = app.world().resource::<PlayArea>();
        assert!(area.0.max.y < WATER_ZONE.max.y);
    }
}
