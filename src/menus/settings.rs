//! The settings menu.
//!
//! Volume, difficulty and special effects. Every change is saved right away.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::{
    menus::Menu,
    screens::Screen,
    settings::{DIFFICULTY_STEP, GameSettings},
    theme::{GameFont, palette::MENU_BACKGROUND, widget},
};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<SettingsValue>();

    app.add_systems(OnEnter(Menu::Settings), spawn_settings_menu);
    app.add_systems(
        Update,
        go_back.run_if(in_state(Menu::Settings).and(input_just_pressed(KeyCode::Escape))),
    );

    app.add_systems(
        Update,
        update_settings_values.run_if(in_state(Menu::Settings)),
    );
}

const VOLUME_STEP: f32 = 0.1;

/// Which setting a value text shows.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
enum SettingsValue {
    Volume,
    Difficulty,
    Effects,
}

impl SettingsValue {
    fn text(self, settings: &GameSettings) -> String {
        match self {
            SettingsValue::Volume => format!("{:3.0}%", settings.master_volume * 100.0),
            SettingsValue::Difficulty => settings.difficulty_label(),
            SettingsValue::Effects => if settings.special_effects { "On" } else { "Off" }.to_string(),
        }
    }
}

fn spawn_settings_menu(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    game_font: Res<GameFont>,
) {
    let settings_title = asset_server.load("images/settings_title.png");
    let back_button = asset_server.load("images/back_button.png");
    let font = game_font.0.clone();

    commands.spawn((
        widget::ui_root("Settings Menu"),
        BackgroundColor(MENU_BACKGROUND),
        DespawnOnExit(Menu::Settings),
        children![
            (
                Name::new("Settings Title"),
                ImageNode::new(settings_title),
                Node {
                    width: Val::Px(500.0),
                    height: Val::Px(200.0),
                    margin: UiRect::bottom(Val::Px(20.0)),
                    ..default()
                },
            ),
            widget::option_row(
                "Volume",
                font.clone(),
                SettingsValue::Volume,
                lower_volume,
                raise_volume,
            ),
            widget::option_row(
                "Difficulty",
                font.clone(),
                SettingsValue::Difficulty,
                make_easier,
                make_harder,
            ),
            widget::option_row(
                "Effects",
                font,
                SettingsValue::Effects,
                toggle_effects,
                toggle_effects,
            ),
            widget::button_image(back_button, 266.0, 105.0, go_back_on_click),
        ],
    ));
}

fn lower_volume(_: On<Pointer<Click>>, mut settings: ResMut<GameSettings>) {
    settings.adjust_volume(-VOLUME_STEP);
    settings.save();
}

fn raise_volume(_: On<Pointer<Click>>, mut settings: ResMut<GameSettings>) {
    settings.adjust_volume(VOLUME_STEP);
    settings.save();
}

fn make_easier(_: On<Pointer<Click>>, mut settings: ResMut<GameSettings>) {
    settings.adjust_spawn_probability(DIFFICULTY_STEP);
    settings.save();
}

fn make_harder(_: On<Pointer<Click>>, mut settings: ResMut<GameSettings>) {
    settings.adjust_spawn_probability(-DIFFICULTY_STEP);
    settings.save();
}

fn toggle_effects(_: On<Pointer<Click>>, mut settings: ResMut<GameSettings>) {
    settings.special_effects = !settings.special_effects;
    settings.save();
}

fn update_settings_values(
    settings: Res<GameSettings>,
    mut values: Query<(&SettingsValue, &mut Text)>,
) {
    for (value, mut text) in &mut values {
        let wanted = value.text(&settings);
        if text.0 != wanted {
            text.0 = wanted;
        }
    }
}

fn go_back_on_click(
    _: On<Pointer<Click>>,
    screen: Res<State<Screen>>,
    mut next_menu: ResMut<NextState<Menu>>,
) {
    next_menu.set(previous_menu(screen.get()));
}

fn go_back(screen: Res<State<Screen>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(previous_menu(screen.get()));
}

fn previous_menu(screen: &Screen) -> Menu {
    if screen == &Screen::Title {
        Menu::Main
    } else {
        Menu::Pause
    }
}
