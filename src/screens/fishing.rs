//! The screen state for a fishing level.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::{
    Pause,
    audio::music,
    game::{LevelRun, end_level, start_level},
    menus::Menu,
    screens::Screen,
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Fishing), (start_level, start_music));

    // Pausing is only offered while fish are still spawning.
    app.add_systems(
        Update,
        (
            (pause, spawn_pause_overlay, open_pause_menu).run_if(
                in_state(Screen::Fishing)
                    .and(in_state(Menu::None))
                    .and(level_is_spawning)
                    .and(input_just_pressed(KeyCode::KeyP).or(input_just_pressed(KeyCode::Escape))),
            ),
            close_menu.run_if(
                in_state(Screen::Fishing)
                    .and(not(in_state(Menu::None)))
                    .and(input_just_pressed(KeyCode::KeyP)),
            ),
        ),
    );
    app.add_systems(OnExit(Screen::Fishing), (close_menu, unpause, end_level));
    app.add_systems(
        OnEnter(Menu::None),
        unpause.run_if(in_state(Screen::Fishing)),
    );
}

fn level_is_spawning(run: Res<LevelRun>) -> bool {
    run.is_spawning()
}

fn start_music(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn((
        Name::new("Fishing Music"),
        music(asset_server.load("audio/music/ocean.ogg")),
        DespawnOnExit(Screen::Fishing),
    ));
}

fn unpause(mut next_pause: ResMut<NextState<Pause>>) {
    next_pause.set(Pause(false));
}

fn pause(mut next_pause: ResMut<NextState<Pause>>) {
    next_pause.set(Pause(true));
}

fn spawn_pause_overlay(mut commands: Commands) {
    commands.spawn((
        Name::new("Pause Overlay"),
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        GlobalZIndex(1),
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
        DespawnOnExit(Pause(true)),
    ));
}

fn open_pause_menu(mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Pause);
}

fn close_menu(mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::None);
}
