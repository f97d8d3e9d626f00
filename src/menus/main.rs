//! The main menu (seen on the title screen).

use bevy::prelude::*;

use crate::{
    menus::Menu,
    theme::{palette::MENU_BACKGROUND, widget},
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::Main), spawn_main_menu);
}

fn spawn_main_menu(mut commands: Commands, asset_server: Res<AssetServer>) {
    let title = asset_server.load("images/title.png");
    let play_button = asset_server.load("images/play_button.png");
    let settings_button = asset_server.load("images/settings_button.png");
    let credits_button = asset_server.load("images/credits_button.png");
    #[cfg(not(target_family = "wasm"))]
    let exit_button = asset_server.load("images/exit_button.png");

    commands.spawn((
        widget::ui_root("Main Menu"),
        BackgroundColor(MENU_BACKGROUND),
        DespawnOnExit(Menu::Main),
        #[cfg(not(target_family = "wasm"))]
        children![
            (
                Name::new("Title"),
                ImageNode::new(title.clone()),
                Node {
                    width: Val::Px(480.0),
                    height: Val::Px(160.0),
                    margin: UiRect::bottom(Val::Px(20.0)),
                    ..default()
                },
            ),
            widget::button_image(play_button.clone(), 266.0, 105.0, open_setup_menu),
            widget::button_image(settings_button.clone(), 266.0, 105.0, open_settings_menu),
            widget::button_image(credits_button.clone(), 266.0, 105.0, open_credits_menu),
            widget::button_image(exit_button.clone(), 266.0, 105.0, exit_app),
        ],
        #[cfg(target_family = "wasm")]
        children![
            (
                Name::new("Title"),
                ImageNode::new(title),
                Node {
                    width: Val::Px(480.0),
                    height: Val::Px(160.0),
                    margin: UiRect::bottom(Val::Px(20.0)),
                    ..default()
                },
            ),
            widget::button_image(play_button, 266.0, 105.0, open_setup_menu),
            widget::button_image(settings_button, 266.0, 105.0, open_settings_menu),
            widget::button_image(credits_button, 266.0, 105.0, open_credits_menu),
        ],
    ));
}

fn open_setup_menu(_: On<Pointer<Click>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Setup);
}

fn open_settings_menu(_: On<Pointer<Click>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Settings);
}

fn open_credits_menu(_: On<Pointer<Click>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Credits);
}

#[cfg(not(target_family = "wasm"))]
fn exit_app(_: On<Pointer<Click>>, mut app_exit: MessageWriter<AppExit>) {
    app_exit.write(AppExit::Success);
}
