//! Catch feedback - pop animations, floating score text, screen shake.

use bevy::prelude::*;
use rand::Rng;

use super::capture::CaptureResolved;
use crate::{PausableSystems, audio::sound_effect, screens::Screen, settings::GameSettings};

pub(super) fn plugin(app: &mut App) {
    // Screen shake
    app.init_resource::<ScreenShake>();
    app.add_systems(
        Update,
        (trigger_shake_on_miss, apply_screen_shake)
            .chain()
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Fishing)),
    );
    app.add_systems(OnExit(Screen::Fishing), settle_camera);

    // Pop animation, shared with the bonus round.
    app.add_systems(
        Update,
        animate_pop
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Fishing).or(in_state(Screen::Bonus))),
    );

    // Catch text and sounds
    app.add_systems(
        Update,
        (spawn_catch_feedback, animate_catch_text)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Fishing)),
    );
}

// =============================================================================
// SCREEN SHAKE
// =============================================================================

/// Resource tracking screen shake state.
#[derive(Resource, Default)]
pub struct ScreenShake {
    /// Current trauma level (0.0 to 1.0).
    pub trauma: f32,
    /// Base position to return to.
    pub base_position: Vec3,
}

/// Maximum shake offset in pixels.
const MAX_SHAKE_OFFSET: f32 = 8.0;
/// How fast trauma decays per second.
const TRAUMA_DECAY: f32 = 2.5;
const MISS_TRAUMA: f32 = 0.5;

fn trigger_shake_on_miss(
    mut shake: ResMut<ScreenShake>,
    mut resolved: MessageReader<CaptureResolved>,
    settings: Res<GameSettings>,
) {
    for catch in resolved.read() {
        if !catch.correct && settings.special_effects {
            shake.trauma = (shake.trauma + MISS_TRAUMA).min(1.0);
        }
    }
}

/// Apply screen shake to camera.
fn apply_screen_shake(
    time: Res<Time>,
    mut shake: ResMut<ScreenShake>,
    mut camera_query: Query<&mut Transform, With<Camera2d>>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    if shake.trauma > 0.0 {
        let mut rng = rand::rng();

        // Shake amount = trauma^2
        let shake_amount = shake.trauma * shake.trauma;
        let offset_x = rng.random_range(-1.0..1.0) * MAX_SHAKE_OFFSET * shake_amount;
        let offset_y = rng.random_range(-1.0..1.0) * MAX_SHAKE_OFFSET * shake_amount;

        camera_transform.translation.x = shake.base_position.x + offset_x;
        camera_transform.translation.y = shake.base_position.y + offset_y;

        shake.trauma = (shake.trauma - TRAUMA_DECAY * time.delta_secs()).max(0.0);
    } else {
        camera_transform.translation.x = shake.base_position.x;
        camera_transform.translation.y = shake.base_position.y;
    }
}

fn settle_camera(
    mut shake: ResMut<ScreenShake>,
    mut camera_query: Query<&mut Transform, With<Camera2d>>,
) {
    shake.trauma = 0.0;
    if let Ok(mut camera_transform) = camera_query.single_mut() {
        camera_transform.translation = shake.base_position;
    }
}

// =============================================================================
// POP ANIMATION
// =============================================================================

/// Scale up, then shrink to nothing and despawn.
#[derive(Component)]
pub struct PopAnimation {
    pub timer: f32,
    pub duration: f32,
    pub start_scale: Vec3,
    pub peak_scale: Vec3,
}

impl PopAnimation {
    pub fn new(current_scale: Vec3) -> Self {
        Self {
            timer: 0.0,
            duration: 0.2,
            start_scale: current_scale,
            peak_scale: current_scale * 1.4,
        }
    }

    /// Scale at the current point of the animation.
    pub fn scale(&self) -> Vec3 {
        let progress = self.progress();
        if progress < 0.5 {
            self.start_scale.lerp(self.peak_scale, progress * 2.0)
        } else {
            self.peak_scale.lerp(Vec3::ZERO, (progress - 0.5) * 2.0)
        }
    }

    pub fn progress(&self) -> f32 {
        (self.timer / self.duration).min(1.0)
    }
}

fn animate_pop(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut PopAnimation)>,
) {
    for (entity, mut transform, mut pop) in &mut query {
        pop.timer += time.delta_secs();
        transform.scale = pop.scale();

        if pop.progress() >= 1.0 {
            commands.entity(entity).despawn();
        }
    }
}

// =============================================================================
// CATCH TEXT
// =============================================================================

/// Text that floats up from a caught fish and fades.
#[derive(Component)]
pub struct CatchText {
    pub timer: f32,
    pub duration: f32,
    pub start_y: f32,
    pub float_distance: f32,
    pub color: Srgba,
}

const CORRECT_TEXT_COLOR: Srgba = Srgba::rgb(1.0, 1.0, 0.2);
const WRONG_TEXT_COLOR: Srgba = Srgba::rgb(1.0, 0.35, 0.3);

fn spawn_catch_feedback(
    mut commands: Commands,
    mut resolved: MessageReader<CaptureResolved>,
    settings: Res<GameSettings>,
    asset_server: Res<AssetServer>,
) {
    for catch in resolved.read() {
        let (text, color, sound) = if catch.correct {
            ("+1", CORRECT_TEXT_COLOR, "audio/sound_effects/correct.ogg")
        } else {
            ("Oops!", WRONG_TEXT_COLOR, "audio/sound_effects/wrong.ogg")
        };

        if settings.special_effects {
            commands.spawn(sound_effect(asset_server.load(sound)));
        }

        commands.spawn((
            Name::new("Catch Text"),
            CatchText {
                timer: 0.0,
                duration: 0.8,
                start_y: catch.position.y,
                float_distance: 50.0,
                color,
            },
            Text2d::new(text),
            TextFont {
                font_size: 32.0,
                ..default()
            },
            TextColor(color.into()),
            Transform::from_translation(catch.position.extend(10.0)).with_scale(Vec3::splat(0.5)),
            DespawnOnExit(Screen::Fishing),
        ));
    }
}

/// Float upward and fade out.
fn animate_catch_text(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut CatchText, &mut TextColor)>,
) {
    for (entity, mut transform, mut text, mut color) in &mut query {
        text.timer += time.delta_secs();
        let progress = (text.timer / text.duration).min(1.0);

        let scale = if progress < 0.2 {
            0.5 + progress / 0.2
        } else {
            1.5
        };
        transform.scale = Vec3::splat(scale);
        transform.translation.y = text.start_y + text.float_distance * progress;

        // Fade out in last 30%
        let alpha = if progress > 0.7 {
            1.0 - (progress - 0.7) / 0.3
        } else {
            1.0
        };
        color.0 = text.color.with_alpha(alpha).into();

        if progress >= 1.0 {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_peaks_halfway_then_vanishes() {
        let mut pop = PopAnimation::new(Vec3::ONE);
        pop.timer = pop.duration * 0.5;
        assert!((pop.scale() - Vec3::splat(1.4)).length() < 1e-4);
        pop.timer = pop.duration;
        assert_eq!(pop.scale(), Vec3::ZERO);
        assert_eq!(pop.progress(), 1.0);
    }
}
