//! Fish movement: straight across the water with a sine-wave bob.

use bevy::prelude::*;

use super::{
    capture::{DepartureReason, FishLeft, resolve_fish},
    hook::Hooked,
    spawner::{Fish, PlayArea},
};
use crate::{AppSystems, PausableSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<SineDrift>();
    app.register_type::<Lifetime>();

    app.add_systems(
        Update,
        (drift_fish, detect_exits, expire_fish)
            .chain()
            .before(resolve_fish)
            .in_set(AppSystems::Update)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Fishing)),
    );
}

/// How far past the play area edge a fish must be before it counts as gone.
const EXIT_MARGIN: f32 = 40.0;

/// Horizontal travel plus vertical oscillation.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SineDrift {
    /// Signed horizontal speed in px/s; positive moves right.
    pub speed: f32,
    pub amplitude: f32,
    pub frequency: f32,
    elapsed: f32,
}

impl SineDrift {
    pub fn new(speed: f32, amplitude: f32, frequency: f32) -> Self {
        Self {
            speed,
            amplitude,
            frequency,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` seconds and return the displacement.
    pub fn step(&mut self, dt: f32) -> Vec2 {
        self.elapsed += dt;
        Vec2::new(
            self.speed * dt,
            (self.elapsed * self.frequency).sin() * self.amplitude * dt,
        )
    }

    pub fn heading_right(&self) -> bool {
        self.speed >= 0.0
    }
}

/// Force-removal countdown for fish that never leave the water.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Lifetime(pub Timer);

impl Lifetime {
    pub fn from_seconds(seconds: f32) -> Self {
        Self(Timer::from_seconds(seconds, TimerMode::Once))
    }
}

/// Whether a fish at `x` has swum past the far edge of `area`.
pub fn has_left(area: &Rect, x: f32, heading_right: bool) -> bool {
    if heading_right {
        x > area.max.x + EXIT_MARGIN
    } else {
        x < area.min.x - EXIT_MARGIN
    }
}

fn drift_fish(
    time: Res<Time>,
    mut fish: Query<(&mut Transform, &mut SineDrift), (With<Fish>, Without<Hooked>)>,
) {
    let dt = time.delta_secs();
    for (mut transform, mut drift) in &mut fish {
        let delta = drift.step(dt);
        transform.translation += delta.extend(0.0);
    }
}

fn detect_exits(
    area: Res<PlayArea>,
    fish: Query<(Entity, &Transform, &SineDrift), (With<Fish>, Without<Hooked>)>,
    mut departures: MessageWriter<FishLeft>,
) {
    for (entity, transform, drift) in &fish {
        if has_left(&area.0, transform.translation.x, drift.heading_right()) {
            departures.write(FishLeft {
                fish: entity,
                reason: DepartureReason::ExitedPlayArea,
            });
        }
    }
}

fn expire_fish(
    time: Res<Time>,
    mut fish: Query<(Entity, &mut Lifetime), (With<Fish>, Without<Hooked>)>,
    mut departures: MessageWriter<FishLeft>,
) {
    for (entity, mut lifetime) in &mut fish {
        if lifetime.0.tick(time.delta()).just_finished() {
            departures.write(FishLeft {
                fish: entity,
                reason: DepartureReason::Expired,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drift_moves_horizontally_at_speed() {
        let mut drift = SineDrift::new(-120.0, 30.0, 2.0);
        let delta = drift.step(0.5);
        assert!((delta.x + 60.0).abs() < 1e-4);
        assert!(!drift.heading_right());
    }

    #[test]
    fn bob_follows_the_sine() {
        let mut drift = SineDrift::new(100.0, 30.0, 2.0);
        let delta = drift.step(0.25);
        let expected = (0.25f32 * 2.0).sin() * 30.0 * 0.25;
        assert!((delta.y - expected).abs() < 1e-4);
    }

    #[test]
    fn exit_only_counts_on_the_far_side() {
        let area = Rect::new(-400.0, -200.0, 400.0, 200.0);
        assert!(has_left(&area, 441.0, true));
        assert!(!has_left(&area, 441.0, false));
        assert!(!has_left(&area, 420.0, true));
        assert!(has_left(&area, -441.0, false));
        // Freshly spawned fish start just outside their entry edge.
        assert!(!has_left(&area, -430.0, true));
    }
}
