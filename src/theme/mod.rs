//! Reusable UI widgets & theming.

pub mod interaction;
pub mod palette;
pub mod widget;

use bevy::prelude::*;

/// Resource holding the game's custom font.
#[derive(Resource)]
pub struct GameFont(pub Handle<Font>);

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(interaction::plugin);
    app.add_systems(PreStartup, load_game_font);
}

fn load_game_font(mut commands: Commands, asset_server: Res<AssetServer>) {
    let font = asset_server.load("fonts/Fredoka-Regular.ttf");
    commands.insert_resource(GameFont(font));
}
