//! Helper functions for creating common widgets.

use std::borrow::Cow;

use bevy::{
    ecs::{spawn::SpawnWith, system::IntoObserverSystem},
    prelude::*,
};

use crate::theme::{
    interaction::{ImageInteractionPalette, InteractionPalette},
    palette::*,
};

/// A root UI node that fills the window and centers its content.
pub fn ui_root(name: impl Into<Cow<'static, str>>) -> impl Bundle {
    (
        Name::new(name),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(16.0),
            ..default()
        },
        GlobalZIndex(2),
    )
}

/// A simple header label. Bigger than [`label`].
pub fn header(text: impl Into<String>, font: Handle<Font>) -> impl Bundle {
    (
        Name::new("Header"),
        Text(text.into()),
        TextFont {
            font,
            font_size: 48.0,
            ..default()
        },
        TextColor(HEADER_TEXT),
        Node {
            margin: UiRect::bottom(Val::Px(12.0)),
            ..default()
        },
    )
}

/// A simple text label.
pub fn label(text: impl Into<String>, font: Handle<Font>) -> impl Bundle {
    (
        Name::new("Label"),
        Text(text.into()),
        TextFont {
            font,
            font_size: 24.0,
            ..default()
        },
        TextColor(LABEL_TEXT),
    )
}

/// A large rounded button with text and an action defined as an [`Observer`].
pub fn button<E, B, M, I>(text: impl Into<String>, action: I) -> impl Bundle
where
    E: EntityEvent,
    B: Bundle,
    I: IntoObserverSystem<E, B, M>,
{
    button_base(
        text,
        action,
        Node {
            width: Val::Px(300.0),
            height: Val::Px(64.0),
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            ..default()
        },
        28.0,
    )
}

/// A small square button with text and an action defined as an [`Observer`].
pub fn button_small<E, B, M, I>(text: impl Into<String>, action: I) -> impl Bundle
where
    E: EntityEvent,
    B: Bundle,
    I: IntoObserverSystem<E, B, M>,
{
    button_base(
        text,
        action,
        Node {
            width: Val::Px(36.0),
            height: Val::Px(36.0),
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            ..default()
        },
        24.0,
    )
}

fn button_base<E, B, M, I>(
    text: impl Into<String>,
    action: I,
    node: Node,
    font_size: f32,
) -> impl Bundle
where
    E: EntityEvent,
    B: Bundle,
    I: IntoObserverSystem<E, B, M>,
{
    let text = text.into();
    let action = IntoObserverSystem::into_system(action);
    (
        Name::new("Button"),
        Node::default(),
        Children::spawn(SpawnWith(move |parent: &mut ChildSpawner| {
            parent
                .spawn((
                    Name::new("Button Inner"),
                    Button,
                    node,
                    BackgroundColor(BUTTON_BACKGROUND),
                    InteractionPalette {
                        none: BUTTON_BACKGROUND,
                        hovered: BUTTON_HOVERED_BACKGROUND,
                        pressed: BUTTON_PRESSED_BACKGROUND,
                    },
                    children![(
                        Name::new("Button Text"),
                        Text(text),
                        TextFont::from_font_size(font_size),
                        TextColor(BUTTON_TEXT),
                        // Don't bubble picking events from the text up to the button.
                        Pickable::IGNORE,
                    )],
                ))
                .observe(action);
        })),
    )
}

/// A button drawn from an image, tinted on hover and press.
pub fn button_image<E, B, M, I>(image: Handle<Image>, width: f32, height: f32, action: I) -> impl Bundle
where
    E: EntityEvent,
    B: Bundle,
    I: IntoObserverSystem<E, B, M>,
{
    let action = IntoObserverSystem::into_system(action);
    (
        Name::new("Image Button"),
        Node::default(),
        Children::spawn(SpawnWith(move |parent: &mut ChildSpawner| {
            parent
                .spawn((
                    Name::new("Image Button Inner"),
                    Button,
                    ImageNode::new(image),
                    ImageInteractionPalette {
                        none: Color::WHITE,
                        hovered: Color::srgb(0.85, 0.85, 0.85),
                        pressed: Color::srgb(0.7, 0.7, 0.7),
                    },
                    Node {
                        width: Val::Px(width),
                        height: Val::Px(height),
                        ..default()
                    },
                ))
                .observe(action);
        })),
    )
}

/// A titled row with `<` and `>` buttons around a value text. `value` is
/// added to the value text so a system can find and update it.
pub fn option_row<L, LB, LM, R, RB, RM>(
    title: impl Into<String>,
    font: Handle<Font>,
    value: impl Bundle,
    less: L,
    more: R,
) -> impl Bundle
where
    L: IntoObserverSystem<Pointer<Click>, LB, LM>,
    LB: Bundle,
    R: IntoObserverSystem<Pointer<Click>, RB, RM>,
    RB: Bundle,
{
    (
        Name::new("Option Row"),
        Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            column_gap: Val::Px(12.0),
            ..default()
        },
        children![
            (
                label(title, font.clone()),
                Node {
                    width: Val::Px(180.0),
                    ..default()
                },
            ),
            button_small("<", less),
            (
                Name::new("Option Value"),
                Text::new(""),
                TextFont {
                    font,
                    font_size: 24.0,
                    ..default()
                },
                TextColor(LABEL_TEXT),
                Node {
                    width: Val::Px(240.0),
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                value,
            ),
            button_small(">", more),
        ],
    )
}
