//! The credits menu.

use bevy::{ecs::spawn::SpawnWith, input::common_conditions::input_just_pressed, prelude::*};

use crate::{
    menus::Menu,
    theme::{
        GameFont,
        palette::{HEADER_TEXT, MENU_BACKGROUND},
        widget,
    },
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::Credits), spawn_credits_menu);
    app.add_systems(
        Update,
        go_back.run_if(in_state(Menu::Credits).and(input_just_pressed(KeyCode::Escape))),
    );
}

/// Section title followed by its lines.
const CREDITS: &[(&str, &[&str])] = &[
    ("Created by", &["The Catch the Fish team"]),
    (
        "Assets",
        &["Fish, shapes and bubbles: hand drawn", "Sounds: recorded at the seaside"],
    ),
    ("Made with Bevy", &[]),
];

fn spawn_credits_menu(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    game_font: Res<GameFont>,
) {
    let back_button = asset_server.load("images/back_button.png");
    let font = game_font.0.clone();

    commands.spawn((
        widget::ui_root("Credits Menu"),
        BackgroundColor(MENU_BACKGROUND),
        DespawnOnExit(Menu::Credits),
        Children::spawn(SpawnWith(move |parent: &mut ChildSpawner| {
            parent.spawn(widget::header("Credits", font.clone()));
            for (section, lines) in CREDITS {
                parent.spawn((
                    Name::new("Credits Section"),
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        margin: UiRect::bottom(Val::Px(12.0)),
                        ..default()
                    },
                    children![(
                        Text::new(*section),
                        TextFont {
                            font: font.clone(),
                            font_size: 28.0,
                            ..default()
                        },
                        TextColor(HEADER_TEXT),
                    )],
                ))
                .with_children(|column| {
                    for line in lines.iter() {
                        column.spawn(widget::label(*line, font.clone()));
                    }
                });
            }
            parent.spawn(widget::button_image(back_button, 266.0, 105.0, go_back_on_click));
        })),
    ));
}

fn go_back_on_click(_: On<Pointer<Click>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Main);
}

fn go_back(mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Main);
}
