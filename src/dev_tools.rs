//! Development tools for the game. This plugin is only enabled in dev builds.

use bevy::{
    dev_tools::states::log_transitions, input::common_conditions::input_just_pressed, prelude::*,
    ui_render::UiDebugOptions,
};

use crate::{game::LevelRun, menus::Menu, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    // Log `Screen` and `Menu` state transitions.
    app.add_systems(Update, (log_transitions::<Screen>, log_transitions::<Menu>));

    // Toggle the debug overlay for UI.
    app.add_systems(
        Update,
        toggle_debug_ui.run_if(input_just_pressed(TOGGLE_KEY)),
    );

    app.add_systems(
        Update,
        log_level_phase.run_if(resource_changed::<LevelRun>),
    );
}

const TOGGLE_KEY: KeyCode = KeyCode::Backquote;

fn toggle_debug_ui(mut options: ResMut<UiDebugOptions>) {
    options.toggle();
}

fn log_level_phase(run: Res<LevelRun>) {
    debug!(
        "Level phase: {:?} (generation {})",
        run.phase(),
        run.generation()
    );
}
