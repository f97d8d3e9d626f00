//! Quota tracking, target rotation and the per-level state machine.
//!
//! Win: catch `quota` correct fish. There is no lose condition; wrong catches
//! only cost the player time (and optionally the current target).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{registry::EntityRegistry, spawner::SpawnTimer};
use crate::{audio::sound_effect, screens::Screen, settings::GameSettings};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<ProgressChanged>();
    app.add_message::<LevelComplete>();

    app.init_resource::<LevelRun>();
    app.init_resource::<CelebrationConfig>();

    app.add_systems(
        Update,
        (begin_celebration, finish_celebration)
            .chain()
            .run_if(in_state(Screen::Fishing)),
    );
    app.add_systems(OnExit(Screen::Fishing), restore_time);
}

/// When the target changes after a correct catch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationPolicy {
    /// New target after every correct catch.
    #[default]
    PerCatch,
    /// One target for the whole quota.
    AtQuota,
}

/// What a wrong catch does to the target. Chosen per level in the setup menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissPolicy {
    #[default]
    Ignore,
    Retarget,
}

impl MissPolicy {
    pub fn toggled(self) -> Self {
        match self {
            MissPolicy::Ignore => MissPolicy::Retarget,
            MissPolicy::Retarget => MissPolicy::Ignore,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MissPolicy::Ignore => "Keep target",
            MissPolicy::Retarget => "New target",
        }
    }
}

/// Result of feeding one capture into the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    Missed { retarget: bool },
    Advanced { caught: u32, quota: u32, retarget: bool },
    /// The capture that filled the quota. Reported exactly once per level.
    QuotaReached { caught: u32, quota: u32 },
    /// Capture arrived after the quota was already reached.
    Ignored,
}

impl CaptureOutcome {
    pub fn wants_new_target(self) -> bool {
        matches!(
            self,
            CaptureOutcome::Missed { retarget: true } | CaptureOutcome::Advanced { retarget: true, .. }
        )
    }
}

/// Counts correct catches toward the level quota.
#[derive(Resource, Debug, Clone)]
pub struct ProgressTracker {
    caught: u32,
    quota: u32,
    rotation: RotationPolicy,
    miss: MissPolicy,
    completed: bool,
}

impl ProgressTracker {
    pub fn new(quota: u32, rotation: RotationPolicy, miss: MissPolicy) -> Self {
        Self {
            caught: 0,
            quota: quota.max(1),
            rotation,
            miss,
            completed: false,
        }
    }

    pub fn caught(&self) -> u32 {
        self.caught
    }

    pub fn quota(&self) -> u32 {
        self.quota
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn on_capture(&mut self, correct: bool) -> CaptureOutcome {
        if self.completed {
            return CaptureOutcome::Ignored;
        }
        if !correct {
            return CaptureOutcome::Missed {
                retarget: self.miss == MissPolicy::Retarget,
            };
        }

        self.caught += 1;
        if self.caught >= self.quota {
            self.caught = self.quota;
            self.completed = true;
            return CaptureOutcome::QuotaReached {
                caught: self.caught,
                quota: self.quota,
            };
        }

        CaptureOutcome::Advanced {
            caught: self.caught,
            quota: self.quota,
            retarget: self.rotation == RotationPolicy::PerCatch,
        }
    }

    pub fn reset(&mut self) {
        self.caught = 0;
        self.completed = false;
    }
}

/// Presenter message: progress toward the quota changed.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressChanged {
    pub caught: u32,
    pub quota: u32,
}

/// The level's quota was reached.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelComplete {
    pub generation: u32,
}

/// Lifecycle of one fishing level. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelPhase {
    #[default]
    Idle,
    Spawning,
    QuotaReached,
    Celebrating,
    TransitionedOut,
}

impl LevelPhase {
    fn next(self) -> Option<LevelPhase> {
        match self {
            LevelPhase::Idle => Some(LevelPhase::Spawning),
            LevelPhase::Spawning => Some(LevelPhase::QuotaReached),
            LevelPhase::QuotaReached => Some(LevelPhase::Celebrating),
            LevelPhase::Celebrating => Some(LevelPhase::TransitionedOut),
            LevelPhase::TransitionedOut => None,
        }
    }
}

/// Phase and generation of the running level.
///
/// The generation increments on every level start. Timers and scheduled
/// continuations remember the generation they were created for and are
/// dropped when it no longer matches.
#[derive(Resource, Debug, Default)]
pub struct LevelRun {
    phase: LevelPhase,
    generation: u32,
}

impl LevelRun {
    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_current(&self, generation: u32) -> bool {
        self.generation == generation
    }

    pub fn is_spawning(&self) -> bool {
        self.phase == LevelPhase::Spawning
    }

    /// Begin a new level and return its generation.
    pub fn start(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        self.phase = LevelPhase::Spawning;
        self.generation
    }

    /// Move to `to` if it is the phase directly after the current one.
    pub fn advance(&mut self, to: LevelPhase) -> bool {
        if self.phase.next() == Some(to) {
            self.phase = to;
            true
        } else {
            warn!("Rejected level transition {:?} -> {:?}", self.phase, to);
            false
        }
    }

    /// Abandon the level (leaving the screen mid-level).
    pub fn stop(&mut self) {
        self.phase = LevelPhase::Idle;
    }
}

/// Tuning for the end-of-level slow motion.
#[derive(Resource, Debug, Clone)]
pub struct CelebrationConfig {
    /// Virtual time speed while celebrating.
    pub slow_factor: f32,
    /// Real seconds before moving on to the bonus round.
    pub victory_delay: f32,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            slow_factor: 0.2,
            victory_delay: 2.0,
        }
    }
}

/// Real-time countdown to the bonus round, tagged with its level generation.
#[derive(Resource, Debug)]
pub struct Celebration {
    generation: u32,
    timer: Timer,
}

fn begin_celebration(
    mut commands: Commands,
    mut completed: MessageReader<LevelComplete>,
    mut run: ResMut<LevelRun>,
    mut registry: ResMut<EntityRegistry>,
    mut virtual_time: ResMut<Time<Virtual>>,
    config: Res<CelebrationConfig>,
    settings: Res<GameSettings>,
    asset_server: Res<AssetServer>,
) {
    for complete in completed.read() {
        if !run.is_current(complete.generation) || !run.advance(LevelPhase::Celebrating) {
            continue;
        }

        commands.remove_resource::<SpawnTimer>();
        for fish in registry.drain() {
            if let Ok(mut entity) = commands.get_entity(fish) {
                entity.despawn();
            }
        }

        virtual_time.set_relative_speed(config.slow_factor);
        if settings.special_effects {
            commands.spawn(sound_effect(asset_server.load("audio/sound_effects/applause.ogg")));
        }

        commands.insert_resource(Celebration {
            generation: complete.generation,
            timer: Timer::from_seconds(config.victory_delay, TimerMode::Once),
        });
        info!("Level complete, celebrating for {}s", config.victory_delay);
    }
}

fn finish_celebration(
    mut commands: Commands,
    real_time: Res<Time<Real>>,
    celebration: Option<ResMut<Celebration>>,
    mut run: ResMut<LevelRun>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    let Some(mut celebration) = celebration else {
        return;
    };
    if !run.is_current(celebration.generation) {
        commands.remove_resource::<Celebration>();
        return;
    }
    if !celebration.timer.tick(real_time.delta()).just_finished() {
        return;
    }

    commands.remove_resource::<Celebration>();
    virtual_time.set_relative_speed(1.0);
    if run.advance(LevelPhase::TransitionedOut) {
        next_screen.set(Screen::Bonus);
    }
}

fn restore_time(
    mut commands: Commands,
    mut run: ResMut<LevelRun>,
    mut virtual_time: ResMut<Time<Virtual>>,
) {
    commands.remove_resource::<Celebration>();
    virtual_time.set_relative_speed(1.0);
    if run.phase() != LevelPhase::TransitionedOut {
        run.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{create_test_app, tick};
    use bevy::time::TimeUpdateStrategy;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn quota_completes_exactly_once_on_the_last_catch() {
        let mut tracker = ProgressTracker::new(10, RotationPolicy::PerCatch, MissPolicy::Ignore);
        let outcomes: Vec<_> = (0..12).map(|_| tracker.on_capture(true)).collect();

        let completions = outcomes
            .iter()
            .filter(|o| matches!(o, CaptureOutcome::QuotaReached { .. }))
            .count();
        assert_eq!(completions, 1);
        assert_eq!(
            outcomes[9],
            CaptureOutcome::QuotaReached {
                caught: 10,
                quota: 10
            }
        );
        assert_eq!(outcomes[10], CaptureOutcome::Ignored);
        assert_eq!(tracker.caught(), 10);
    }

    #[test]
    fn caught_never_exceeds_quota() {
        let mut tracker = ProgressTracker::new(3, RotationPolicy::AtQuota, MissPolicy::Ignore);
        for i in 0..50 {
            tracker.on_capture(i % 3 != 0);
            assert!(tracker.caught() <= tracker.quota());
        }
    }

    #[test]
    fn misses_do_not_count() {
        let mut tracker = ProgressTracker::new(5, RotationPolicy::PerCatch, MissPolicy::Ignore);
        assert_eq!(
            tracker.on_capture(false),
            CaptureOutcome::Missed { retarget: false }
        );
        assert_eq!(tracker.caught(), 0);
    }

    #[test]
    fn miss_policy_can_retarget() {
        let mut tracker = ProgressTracker::new(5, RotationPolicy::AtQuota, MissPolicy::Retarget);
        assert!(tracker.on_capture(false).wants_new_target());
    }

    #[test]
    fn per_catch_rotation_retargets_after_each_correct_catch() {
        let mut tracker = ProgressTracker::new(3, RotationPolicy::PerCatch, MissPolicy::Ignore);
        assert_eq!(
            tracker.on_capture(true),
            CaptureOutcome::Advanced {
                caught: 1,
                quota: 3,
                retarget: true
            }
        );
    }

    #[test]
    fn at_quota_rotation_keeps_the_target() {
        let mut tracker = ProgressTracker::new(3, RotationPolicy::AtQuota, MissPolicy::Ignore);
        assert!(!tracker.on_capture(true).wants_new_target());
        assert!(!tracker.on_capture(true).wants_new_target());
        assert!(matches!(
            tracker.on_capture(true),
            CaptureOutcome::QuotaReached { .. }
        ));
    }

    #[test]
    fn zero_quota_is_clamped_to_one() {
        let mut tracker = ProgressTracker::new(0, RotationPolicy::PerCatch, MissPolicy::Ignore);
        assert_eq!(
            tracker.on_capture(true),
            CaptureOutcome::QuotaReached {
                caught: 1,
                quota: 1
            }
        );
    }

    #[test]
    fn reset_starts_a_new_cycle() {
        let mut tracker = ProgressTracker::new(1, RotationPolicy::PerCatch, MissPolicy::Ignore);
        tracker.on_capture(true);
        tracker.reset();
        assert!(!tracker.is_complete());
        assert_eq!(tracker.caught(), 0);
    }

    #[test]
    fn level_phases_only_move_forward() {
        let mut run = LevelRun::default();
        assert!(!run.advance(LevelPhase::Celebrating));

        run.start();
        assert_eq!(run.phase(), LevelPhase::Spawning);
        assert!(!run.advance(LevelPhase::Celebrating));
        assert!(run.advance(LevelPhase::QuotaReached));
        assert!(!run.advance(LevelPhase::Spawning));
        assert!(run.advance(LevelPhase::Celebrating));
        assert!(run.advance(LevelPhase::TransitionedOut));
        assert!(!run.advance(LevelPhase::Idle));
        assert_eq!(run.phase(), LevelPhase::TransitionedOut);
    }

    #[test]
    fn restarting_invalidates_the_old_generation() {
        let mut run = LevelRun::default();
        let first = run.start();
        let second = run.start();
        assert_ne!(first, second);
        assert!(!run.is_current(first));
        assert!(run.is_current(second));
    }

    /// A level that has just reached its quota, with two fish still swimming.
    /// Real time advances one second per update.
    fn finished_level_app() -> (App, u32, [Entity; 2]) {
        let mut run = LevelRun::default();
        let generation = run.start();
        run.advance(LevelPhase::QuotaReached);

        let mut app = create_test_app();
        app.add_plugins(AssetPlugin {
            watch_for_changes_override: Some(false),
            ..default()
        })
        .init_state::<Screen>()
        .add_message::<LevelComplete>()
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs(1)))
        .insert_resource(run)
        .insert_resource(GameSettings {
            special_effects: false,
            ..default()
        })
        .insert_resource(SpawnTimer::new(generation, 0.5))
        .init_resource::<CelebrationConfig>()
        .init_resource::<EntityRegistry>()
        .add_systems(Update, (begin_celebration, finish_celebration).chain());

        let fish = [app.world_mut().spawn_empty().id(), app.world_mut().spawn_empty().id()];
        for entity in fish {
            app.world_mut().resource_mut::<EntityRegistry>().insert(entity);
        }
        (app, generation, fish)
    }

    fn relative_speed(app: &App) -> f32 {
        app.world().resource::<Time<Virtual>>().relative_speed()
    }

    #[test]
    fn level_complete_clears_the_water_and_slows_time() {
        let (mut app, generation, fish) = finished_level_app();
        app.world_mut().write_message(LevelComplete { generation });
        tick(&mut app);

        assert_eq!(
            app.world().resource::<LevelRun>().phase(),
            LevelPhase::Celebrating
        );
        assert!(app.world().get_resource::<SpawnTimer>().is_none());
        assert!(app.world().resource::<EntityRegistry>().is_empty());
        for entity in fish {
            assert!(app.world().get_entity(entity).is_err());
        }
        assert_eq!(relative_speed(&app), 0.2);
        assert!(app.world().get_resource::<Celebration>().is_some());
    }

    #[test]
    fn celebration_hands_over_to_the_bonus_round() {
        let (mut app, generation, _) = finished_level_app();
        app.world_mut().write_message(LevelComplete { generation });
        tick(&mut app);
        assert_eq!(app.world().resource::<State<Screen>>().get(), &Screen::Title);

        for _ in 0..4 {
            tick(&mut app);
        }

        assert_eq!(
            app.world().resource::<LevelRun>().phase(),
            LevelPhase::TransitionedOut
        );
        assert_eq!(app.world().resource::<State<Screen>>().get(), &Screen::Bonus);
        assert_eq!(relative_speed(&app), 1.0);
        assert!(app.world().get_resource::<Celebration>().is_none());
    }

    #[test]
    fn completion_from_an_older_level_is_ignored() {
        let (mut app, generation, fish) = finished_level_app();
        app.world_mut().write_message(LevelComplete {
            generation: generation.wrapping_sub(1),
        });
        tick(&mut app);

        assert_eq!(
            app.world().resource::<LevelRun>().phase(),
            LevelPhase::QuotaReached
        );
        assert!(app.world().get_resource::<SpawnTimer>().is_some());
        assert_eq!(app.world().resource::<EntityRegistry>().len(), fish.len());
        assert_eq!(relative_speed(&app), 1.0);
    }

    #[test]
    fn stale_celebration_never_changes_screen() {
        let (mut app, generation, _) = finished_level_app();
        app.insert_resource(Celebration {
            generation: generation.wrapping_sub(1),
            timer: Timer::from_seconds(0.0, TimerMode::Once),
        });
        for _ in 0..3 {
            tick(&mut app);
        }

        assert!(app.world().get_resource::<Celebration>().is_none());
        assert_eq!(
            app.world().resource::<LevelRun>().phase(),
            LevelPhase::QuotaReached
        );
        assert_eq!(app.world().resource::<State<Screen>>().get(), &Screen::Title);
    }
}
