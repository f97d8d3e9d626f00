//! Debug visualization for the fishing level.
//!
//! Toggle with the 'D' key during a level.
//! Shows:
//! - The water zone and the spawnable play area
//! - Swim lanes
//! - Hook reach around the hook and the delivery line at the surface

use bevy::{color::palettes::css, input::common_conditions::input_just_pressed, prelude::*};

use super::{
    hook::{HOOK_REACH, Hook, surface_y},
    spawner::{PlayArea, SpawnConfig, WATER_ZONE},
};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<DebugOverlayVisible>();

    app.add_systems(
        Update,
        toggle_debug.run_if(in_state(Screen::Fishing).and(input_just_pressed(KeyCode::KeyD))),
    );

    app.add_systems(
        Update,
        (draw_play_area, draw_hook_reach)
            .run_if(in_state(Screen::Fishing).and(debug_visible).and(resource_exists::<PlayArea>)),
    );
}

/// Whether the gizmo overlay is drawn.
#[derive(Resource, Default)]
pub struct DebugOverlayVisible(pub bool);

fn debug_visible(debug: Res<DebugOverlayVisible>) -> bool {
    debug.0
}

fn toggle_debug(mut debug: ResMut<DebugOverlayVisible>) {
    debug.0 = !debug.0;
    let state = if debug.0 { "ON" } else { "OFF" };
    info!("Debug overlay: {}", state);
}

fn draw_rect(gizmos: &mut Gizmos, rect: Rect, color: impl Into<Color>) {
    gizmos.rect_2d(Isometry2d::from_translation(rect.center()), rect.size(), color);
}

fn draw_play_area(mut gizmos: Gizmos, area: Res<PlayArea>, config: Res<SpawnConfig>) {
    draw_rect(&mut gizmos, WATER_ZONE, css::AQUA.with_alpha(0.5));
    draw_rect(&mut gizmos, area.0, css::ORANGE.with_alpha(0.8));

    for y in area.lanes(config.vertical_margin) {
        gizmos.line_2d(
            Vec2::new(area.0.min.x, y),
            Vec2::new(area.0.max.x, y),
            css::WHITE.with_alpha(0.15),
        );
    }
}

fn draw_hook_reach(mut gizmos: Gizmos, hook: Query<&Transform, With<Hook>>) {
    let Ok(transform) = hook.single() else {
        return;
    };
    gizmos.circle_2d(
        Isometry2d::from_translation(transform.translation.truncate()),
        HOOK_REACH,
        css::LIMEGREEN.with_alpha(0.6),
    );
    gizmos.line_2d(
        Vec2::new(WATER_ZONE.min.x, surface_y()),
        Vec2::new(WATER_ZONE.max.x, surface_y()),
        css::GOLD.with_alpha(0.6),
    );
}
