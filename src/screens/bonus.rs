//! The bubble bonus round between fishing levels.

use bevy::prelude::*;

use crate::{Pause, menus::Menu, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Bonus), spawn_backdrop);
    app.add_systems(OnExit(Screen::Bonus), close_menu);
}

fn spawn_backdrop(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut next_pause: ResMut<NextState<Pause>>,
) {
    next_pause.set(Pause(false));
    commands.spawn((
        Name::new("Bonus Backdrop"),
        Sprite::from_image(asset_server.load("images/bubbles_background.png")),
        Transform::from_xyz(0.0, 0.0, -1.0),
        DespawnOnExit(Screen::Bonus),
    ));
}

fn close_menu(mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::None);
}
