use bevy::prelude::*;

use crate::{audio::sound_effect, settings::GameSettings};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<InteractionPalette>();
    app.register_type::<ImageInteractionPalette>();
    app.add_systems(
        Update,
        (apply_interaction_palette, apply_image_interaction_palette),
    );

    app.add_observer(play_on_click_sound_effect);
}

/// Palette for widget interactions. Add this to an entity that supports
/// [`Interaction`]s, such as a button, to change its [`BackgroundColor`] based
/// on the current interaction state.
#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
pub struct InteractionPalette {
    pub none: Color,
    pub hovered: Color,
    pub pressed: Color,
}

/// Same as [`InteractionPalette`], but tints an [`ImageNode`] instead.
#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
pub struct ImageInteractionPalette {
    pub none: Color,
    pub hovered: Color,
    pub pressed: Color,
}

fn pick(interaction: Interaction, none: Color, hovered: Color, pressed: Color) -> Color {
    match interaction {
        Interaction::None => none,
        Interaction::Hovered => hovered,
        Interaction::Pressed => pressed,
    }
}

fn apply_interaction_palette(
    mut palette_query: Query<
        (&Interaction, &InteractionPalette, &mut BackgroundColor),
        Changed<Interaction>,
    >,
) {
    for (interaction, palette, mut background) in &mut palette_query {
        *background = pick(*interaction, palette.none, palette.hovered, palette.pressed).into();
    }
}

fn apply_image_interaction_palette(
    mut palette_query: Query<
        (&Interaction, &ImageInteractionPalette, &mut ImageNode),
        Changed<Interaction>,
    >,
) {
    for (interaction, palette, mut image) in &mut palette_query {
        image.color = pick(*interaction, palette.none, palette.hovered, palette.pressed);
    }
}

fn play_on_click_sound_effect(
    click: On<Pointer<Click>>,
    mut commands: Commands,
    buttons: Query<(), With<Interaction>>,
    settings: Res<GameSettings>,
    asset_server: Res<AssetServer>,
) {
    if settings.special_effects && buttons.contains(click.entity) {
        commands.spawn(sound_effect(asset_server.load("audio/sound_effects/button_click.ogg")));
    }
}
