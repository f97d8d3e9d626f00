//! Capture input and resolution.
//!
//! Taps and hook deliveries become [`CaptureAttempt`] messages, swims out of
//! the water and expiries become [`FishLeft`]. One system consumes both in a
//! single pass, captures first, so every fish is resolved exactly once.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
    criterion::{CriterionKind, FishAttributes, Target, tints_match},
    motion::{Lifetime, SineDrift},
    polish::PopAnimation,
    preset::LevelRules,
    progress::{CaptureOutcome, LevelComplete, LevelPhase, LevelRun, ProgressChanged, ProgressTracker},
    registry::EntityRegistry,
    spawner::Fish,
    target::{ActiveTarget, TargetSelector, TargetShown},
};
use crate::{AppSystems, PausableSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<CaptureAttempt>();
    app.add_message::<FishLeft>();
    app.add_message::<CaptureResolved>();

    app.add_systems(
        Update,
        resolve_fish
            .in_set(AppSystems::Update)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Fishing).and(resource_exists::<LevelRules>)),
    );
}

/// How the player catches fish.
#[derive(
    Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize,
)]
pub enum CaptureMode {
    /// Click or touch a fish.
    #[default]
    Tap,
    /// Drag the hook onto a fish and lift it to the surface.
    Hook,
}

impl CaptureMode {
    pub fn toggled(self) -> Self {
        match self {
            CaptureMode::Tap => CaptureMode::Hook,
            CaptureMode::Hook => CaptureMode::Tap,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CaptureMode::Tap => "Touch",
            CaptureMode::Hook => "Hook",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    Tap,
    Hook,
}

/// The player tried to catch `fish`.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureAttempt {
    pub fish: Entity,
    pub source: CaptureSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartureReason {
    ExitedPlayArea,
    Expired,
}

/// A fish left without being caught.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FishLeft {
    pub fish: Entity,
    pub reason: DepartureReason,
}

/// A capture attempt was evaluated.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct CaptureResolved {
    pub fish: Entity,
    pub correct: bool,
    pub position: Vec2,
    pub source: CaptureSource,
}

/// Whether `fish` satisfies `target`.
///
/// Discrete attributes compare by id. Text labels additionally compare their
/// tint within [`tints_match`]'s tolerance when the palette is in play. A fish
/// missing the attribute the kind asks for never matches.
pub fn evaluate(fish: &FishAttributes, target: &Target, use_palette: bool) -> bool {
    let same_color = fish.color == target.color;
    let same_species = fish.species.is_some() && fish.species == target.species;
    let same_shape = fish.shape.is_some() && fish.shape == target.shape;
    let label_tint_ok = !use_palette || tints_match(fish.tint, target.tint);

    match target.kind {
        CriterionKind::Letter | CriterionKind::Vowel => {
            fish.letter.is_some() && fish.letter == target.letter && label_tint_ok
        }
        CriterionKind::Number => {
            fish.number.is_some() && fish.number == target.number && label_tint_ok
        }
        CriterionKind::Color => same_color,
        CriterionKind::Species => same_species && (!use_palette || same_color),
        CriterionKind::ColorAndSpecies => same_species && same_color,
        CriterionKind::Shape => same_shape && (!use_palette || same_color),
        CriterionKind::ShapeAndColor => same_shape && same_color,
    }
}

/// Tap-mode observer attached to every fish.
pub(super) fn tap_fish(click: On<Pointer<Click>>, mut attempts: MessageWriter<CaptureAttempt>) {
    attempts.write(CaptureAttempt {
        fish: click.entity,
        source: CaptureSource::Tap,
    });
}

/// Evaluate captures, then departures, against the live registry.
pub(super) fn resolve_fish(
    mut commands: Commands,
    mut attempts: MessageReader<CaptureAttempt>,
    mut departures: MessageReader<FishLeft>,
    mut registry: ResMut<EntityRegistry>,
    fish: Query<(&FishAttributes, &Transform)>,
    mut active: ResMut<ActiveTarget>,
    mut selector: ResMut<TargetSelector>,
    mut tracker: ResMut<ProgressTracker>,
    rules: Res<LevelRules>,
    mut run: ResMut<LevelRun>,
    mut resolved: MessageWriter<CaptureResolved>,
    mut progress: MessageWriter<ProgressChanged>,
    mut shown: MessageWriter<TargetShown>,
    mut complete: MessageWriter<LevelComplete>,
) -> Result {
    let mut rng = rand::rng();

    for attempt in attempts.read() {
        if !run.is_spawning() {
            continue;
        }
        let Ok((attributes, transform)) = fish.get(attempt.fish) else {
            continue;
        };
        if !registry.remove(attempt.fish) {
            continue;
        }

        let correct = evaluate(attributes, active.get(), rules.use_palette);
        let outcome = tracker.on_capture(correct);
        info!(
            "Caught {:?} via {:?}: {}",
            attributes.label().unwrap_or_else(|| format!("{:?}", attributes.species)),
            attempt.source,
            if correct { "correct" } else { "wrong" }
        );

        resolved.write(CaptureResolved {
            fish: attempt.fish,
            correct,
            position: transform.translation.truncate(),
            source: attempt.source,
        });
        commands
            .entity(attempt.fish)
            .remove::<(Fish, SineDrift, Lifetime)>()
            .insert(PopAnimation::new(transform.scale));

        match outcome {
            CaptureOutcome::Advanced { caught, quota, .. } => {
                progress.write(ProgressChanged { caught, quota });
            }
            CaptureOutcome::QuotaReached { caught, quota } => {
                progress.write(ProgressChanged { caught, quota });
                if run.advance(LevelPhase::QuotaReached) {
                    complete.write(LevelComplete {
                        generation: run.generation(),
                    });
                }
            }
            CaptureOutcome::Missed { .. } | CaptureOutcome::Ignored => {}
        }

        if outcome.wants_new_target() {
            let next = selector.generate(rules.kind, &rules.pools, rules.use_palette, &mut rng)?;
            shown.write(TargetShown(next.display()));
            active.replace(next);
        }
    }

    for left in departures.read() {
        if !registry.remove(left.fish) {
            continue;
        }
        trace!("Fish {:?} left: {:?}", left.fish, left.reason);
        if let Ok(mut entity) = commands.get_entity(left.fish) {
            entity.despawn();
        }
    }

    Ok(())
}
