//! Hook capture mode.
//!
//! Press on the hook to drag it through the water. The first fish it touches
//! is hooked; the hook then reels it up on its own and hands it over as a
//! capture attempt when it breaks the surface. Released hooks drift back to
//! their rest position.

use bevy::{color::palettes::css, prelude::*, window::PrimaryWindow};

use super::{
    capture::{CaptureAttempt, CaptureSource, resolve_fish},
    spawner::{Fish, WATER_ZONE},
};
use crate::{AppSystems, PausableSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Hooked>();

    app.add_systems(
        Update,
        grab_hook
            .in_set(AppSystems::RecordInput)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Fishing)),
    );
    app.add_systems(
        Update,
        (drag_hook, catch_on_hook, reel_in, return_hook, draw_fishing_line)
            .chain()
            .before(resolve_fish)
            .in_set(AppSystems::Update)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Fishing)),
    );
}

/// Distance at which the hook snags a fish.
pub const HOOK_REACH: f32 = 45.0;
/// How close the cursor must be to the hook to pick it up.
const GRAB_RADIUS: f32 = 60.0;
/// Reeling speed in px/s.
const LIFT_SPEED: f32 = 260.0;
/// Lerp rate back to rest when released.
const RETURN_RATE: f32 = 2.0;
const HOOK_Z: f32 = 5.0;

/// Height at which a reeled fish is delivered.
pub fn surface_y() -> f32 {
    WATER_ZONE.max.y
}

/// Where the hook waits, just under the surface.
pub fn rest_position() -> Vec2 {
    Vec2::new(0.0, surface_y() - 40.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookState {
    #[default]
    Idle,
    Dragging,
    /// Reeling in this fish.
    Lifting(Entity),
}

#[derive(Component, Debug, Default)]
pub struct Hook {
    pub state: HookState,
}

impl Hook {
    /// Start dragging. Ignored while a fish is on the line.
    pub fn grab(&mut self) -> bool {
        if self.state == HookState::Idle {
            self.state = HookState::Dragging;
            true
        } else {
            false
        }
    }

    pub fn release(&mut self) {
        if self.state == HookState::Dragging {
            self.state = HookState::Idle;
        }
    }

    /// Snag `fish`. Only one fish at a time, and only while dragging.
    pub fn attach(&mut self, fish: Entity) -> bool {
        if self.state == HookState::Dragging {
            self.state = HookState::Lifting(fish);
            true
        } else {
            false
        }
    }

    pub fn lifted(&self) -> Option<Entity> {
        match self.state {
            HookState::Lifting(fish) => Some(fish),
            _ => None,
        }
    }
}

/// A fish caught on the hook. It stops swimming and cannot expire.
#[derive(Component, Debug, Default, Reflect)]
#[reflect(Component)]
pub struct Hooked;

/// Spawn the hook at its rest position.
pub fn spawn_hook(commands: &mut Commands, asset_server: &AssetServer) {
    commands.spawn((
        Name::new("Hook"),
        Hook::default(),
        Sprite {
            image: asset_server.load("images/hook.png"),
            custom_size: Some(Vec2::new(40.0, 64.0)),
            ..default()
        },
        Transform::from_translation(rest_position().extend(HOOK_Z)),
        DespawnOnExit(Screen::Fishing),
    ));
}

/// Move `current` a frame's worth toward `rest`.
pub fn ease_toward(current: Vec2, rest: Vec2, dt: f32) -> Vec2 {
    current.lerp(rest, (dt * RETURN_RATE).min(1.0))
}

fn cursor_world_position(
    window: &Window,
    camera: &Camera,
    camera_transform: &GlobalTransform,
) -> Option<Vec2> {
    window
        .cursor_position()
        .and_then(|p| camera.viewport_to_world_2d(camera_transform, p).ok())
}

fn grab_hook(
    mouse_input: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    mut hook_query: Query<(&mut Hook, &Transform)>,
) {
    let Ok((mut hook, transform)) = hook_query.single_mut() else {
        return;
    };

    if mouse_input.just_released(MouseButton::Left) {
        hook.release();
        return;
    }
    if !mouse_input.just_pressed(MouseButton::Left) {
        return;
    }

    let Ok(window) = window_query.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Some(cursor) = cursor_world_position(window, camera, camera_transform) else {
        return;
    };

    if cursor.distance(transform.translation.truncate()) <= GRAB_RADIUS && hook.grab() {
        debug!("Hook grabbed");
    }
}

fn drag_hook(
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    mut hook_query: Query<(&Hook, &mut Transform)>,
) {
    let Ok((hook, mut transform)) = hook_query.single_mut() else {
        return;
    };
    if hook.state != HookState::Dragging {
        return;
    }
    let Ok(window) = window_query.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    if let Some(cursor) = cursor_world_position(window, camera, camera_transform) {
        let clamped = cursor.clamp(WATER_ZONE.min, Vec2::new(WATER_ZONE.max.x, surface_y()));
        transform.translation = clamped.extend(HOOK_Z);
    }
}

fn catch_on_hook(
    mut commands: Commands,
    mut hook_query: Query<(&mut Hook, &Transform)>,
    fish: Query<(Entity, &Transform), (With<Fish>, Without<Hooked>, Without<Hook>)>,
) {
    let Ok((mut hook, hook_transform)) = hook_query.single_mut() else {
        return;
    };
    if hook.state != HookState::Dragging {
        return;
    }

    let hook_pos = hook_transform.translation.truncate();
    let snagged = fish
        .iter()
        .find(|(_, t)| t.translation.truncate().distance(hook_pos) <= HOOK_REACH);
    if let Some((entity, _)) = snagged
        && hook.attach(entity)
    {
        commands.entity(entity).insert(Hooked);
        info!("Hooked fish {:?}", entity);
    }
}

fn reel_in(
    mut commands: Commands,
    time: Res<Time>,
    mut hook_query: Query<(&mut Hook, &mut Transform)>,
    mut hooked: Query<&mut Transform, (With<Hooked>, Without<Hook>)>,
    mut attempts: MessageWriter<CaptureAttempt>,
) {
    let Ok((mut hook, mut hook_transform)) = hook_query.single_mut() else {
        return;
    };
    let Some(fish) = hook.lifted() else {
        return;
    };
    let Ok(mut fish_transform) = hooked.get_mut(fish) else {
        // Fish was swept away (level end).
        hook.state = HookState::Idle;
        return;
    };

    hook_transform.translation.y += LIFT_SPEED * time.delta_secs();
    fish_transform.translation.x = hook_transform.translation.x;
    fish_transform.translation.y = hook_transform.translation.y;

    if hook_transform.translation.y >= surface_y() {
        attempts.write(CaptureAttempt {
            fish,
            source: CaptureSource::Hook,
        });
        commands.entity(fish).remove::<Hooked>();
        hook.state = HookState::Idle;
        hook_transform.translation = rest_position().extend(HOOK_Z);
    }
}

fn return_hook(time: Res<Time>, mut hook_query: Query<(&Hook, &mut Transform)>) {
    let Ok((hook, mut transform)) = hook_query.single_mut() else {
        return;
    };
    if hook.state == HookState::Idle {
        let eased = ease_toward(transform.translation.truncate(), rest_position(), time.delta_secs());
        transform.translation = eased.extend(HOOK_Z);
    }
}

fn draw_fishing_line(mut gizmos: Gizmos, hook_query: Query<&Transform, With<Hook>>) {
    let Ok(transform) = hook_query.single() else {
        return;
    };
    let tip = transform.translation.truncate();
    gizmos.line_2d(
        Vec2::new(tip.x, surface_y() + 80.0),
        tip + Vec2::new(0.0, 28.0),
        css::GHOST_WHITE.with_alpha(0.8),
    );
}
