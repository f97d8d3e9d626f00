//! In-level HUD: the target panel, the quota progress bar and the
//! level-complete banner. Driven entirely by presenter messages.

use bevy::prelude::*;

use super::{
    criterion::{TargetDisplay, TargetIcon},
    progress::{LevelComplete, ProgressChanged},
    target::TargetShown,
};
use crate::{
    screens::Screen,
    theme::{GameFont, palette},
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Fishing), spawn_hud);
    app.add_systems(
        Update,
        (show_target, show_progress, show_banner).run_if(in_state(Screen::Fishing)),
    );
}

const ICON_SIZE: f32 = 72.0;
const BAR_WIDTH: f32 = 320.0;
const BAR_HEIGHT: f32 = 22.0;

#[derive(Component)]
struct TargetIconNode;

#[derive(Component)]
struct TargetLabel;

#[derive(Component)]
struct ProgressFill;

#[derive(Component)]
struct ProgressLabel;

/// How the target panel renders a [`TargetDisplay`].
#[derive(Debug, Clone, PartialEq)]
struct Presentation {
    /// `None` hides the icon; `Some(None)` is a plain swatch.
    icon: Option<Option<String>>,
    icon_tint: Color,
    label: String,
    label_color: Color,
}

impl Presentation {
    fn of(display: &TargetDisplay) -> Self {
        let tint = Color::from(display.tint);
        match display.icon {
            Some(TargetIcon::Species(species)) => Self {
                icon: Some(Some(species.image_path())),
                icon_tint: tint,
                label: display.label.clone(),
                label_color: palette::LABEL_TEXT,
            },
            Some(TargetIcon::Shape(shape)) => Self {
                icon: Some(Some(shape.image_path())),
                icon_tint: tint,
                label: display.label.clone(),
                label_color: palette::LABEL_TEXT,
            },
            Some(TargetIcon::Swatch(color)) => Self {
                icon: Some(None),
                icon_tint: Color::from(color.tint()),
                label: display.label.clone(),
                label_color: palette::LABEL_TEXT,
            },
            // Text targets show the label itself in the target's tint.
            None => Self {
                icon: None,
                icon_tint: Color::WHITE,
                label: display.label.clone(),
                label_color: tint,
            },
        }
    }
}

fn progress_fraction(caught: u32, quota: u32) -> f32 {
    if quota == 0 {
        return 0.0;
    }
    (caught as f32 / quota as f32).clamp(0.0, 1.0)
}

fn spawn_hud(mut commands: Commands, font: Res<GameFont>) {
    let font = font.0.clone();

    commands.spawn((
        Name::new("HUD"),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            width: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            row_gap: Val::Px(8.0),
            ..default()
        },
        Pickable::IGNORE,
        DespawnOnExit(Screen::Fishing),
        children![
            (
                Name::new("Target Panel"),
                Node {
                    flex_direction: FlexDirection::Row,
                    align_items: AlignItems::Center,
                    column_gap: Val::Px(12.0),
                    padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                    border: UiRect::all(Val::Px(2.0)),
                    ..default()
                },
                BackgroundColor(palette::PANEL_BACKGROUND),
                BorderColor::all(palette::PANEL_BORDER),
                children![
                    (
                        Name::new("Catch Prompt"),
                        Text::new("Catch:"),
                        TextFont {
                            font: font.clone(),
                            font_size: 24.0,
                            ..default()
                        },
                        TextColor(palette::LABEL_TEXT),
                    ),
                    (
                        Name::new("Target Icon"),
                        TargetIconNode,
                        ImageNode::default(),
                        Node {
                            width: Val::Px(ICON_SIZE),
                            height: Val::Px(ICON_SIZE),
                            display: Display::None,
                            ..default()
                        },
                    ),
                    (
                        Name::new("Target Label"),
                        TargetLabel,
                        Text::new(""),
                        TextFont {
                            font: font.clone(),
                            font_size: 36.0,
                            ..default()
                        },
                        TextColor(palette::LABEL_TEXT),
                    ),
                ],
            ),
            (
                Name::new("Progress Bar"),
                Node {
                    width: Val::Px(BAR_WIDTH),
                    height: Val::Px(BAR_HEIGHT),
                    border: UiRect::all(Val::Px(2.0)),
                    ..default()
                },
                BackgroundColor(palette::PROGRESS_TRACK),
                BorderColor::all(palette::PANEL_BORDER),
                children![(
                    Name::new("Progress Fill"),
                    ProgressFill,
                    Node {
                        width: Val::Percent(0.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(palette::PROGRESS_FILL),
                )],
            ),
            (
                Name::new("Progress Label"),
                ProgressLabel,
                Text::new(""),
                TextFont {
                    font,
                    font_size: 22.0,
                    ..default()
                },
                TextColor(palette::LABEL_TEXT),
            ),
        ],
    ));
}

fn show_target(
    mut shown: MessageReader<TargetShown>,
    asset_server: Res<AssetServer>,
    mut icon: Single<(&mut ImageNode, &mut Node), With<TargetIconNode>>,
    mut label: Single<(&mut Text, &mut TextColor), With<TargetLabel>>,
) {
    let Some(TargetShown(display)) = shown.read().last() else {
        return;
    };
    let presentation = Presentation::of(display);

    let (image, node) = &mut *icon;
    match &presentation.icon {
        Some(path) => {
            node.display = Display::Flex;
            image.image = path
                .as_ref()
                .map(|path| asset_server.load(path.clone()))
                .unwrap_or_default();
            image.color = presentation.icon_tint;
        }
        None => node.display = Display::None,
    }

    let (text, color) = &mut *label;
    text.0 = presentation.label;
    color.0 = presentation.label_color;
}

fn show_progress(
    mut changes: MessageReader<ProgressChanged>,
    mut fill: Single<&mut Node, With<ProgressFill>>,
    mut label: Single<&mut Text, With<ProgressLabel>>,
) {
    let Some(progress) = changes.read().last() else {
        return;
    };
    fill.width = Val::Percent(100.0 * progress_fraction(progress.caught, progress.quota));
    label.0 = format!("{} / {}", progress.caught, progress.quota);
}

fn show_banner(
    mut commands: Commands,
    mut completed: MessageReader<LevelComplete>,
    font: Res<GameFont>,
) {
    if completed.read().last().is_none() {
        return;
    }
    commands.spawn((
        Name::new("Celebration Banner"),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            ..default()
        },
        GlobalZIndex(1),
        Pickable::IGNORE,
        DespawnOnExit(Screen::Fishing),
        children![(
            Text::new("Well done!"),
            TextFont {
                font: font.0.clone(),
                font_size: 72.0,
                ..default()
            },
            TextColor(palette::BANNER_TEXT),
        )],
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::criterion::{CriterionKind, FishColor, Species, Target};
    use pretty_assertions::assert_eq;

    #[test]
    fn text_targets_tint_the_label() {
        let mut target = Target::new(1, CriterionKind::Number, FishColor::Blue);
        target.number = Some(12);
        let presentation = Presentation::of(&target.display());
        assert_eq!(presentation.icon, None);
        assert_eq!(presentation.label, "12");
        assert_eq!(presentation.label_color, Color::from(FishColor::Blue.tint()));
    }

    #[test]
    fn species_targets_tint_the_icon() {
        let mut target = Target::new(1, CriterionKind::ColorAndSpecies, FishColor::Yellow);
        target.species = Some(Species::Seahorse);
        let presentation = Presentation::of(&target.display());
        assert_eq!(
            presentation.icon,
            Some(Some("images/fish/seahorse.png".to_string()))
        );
        assert_eq!(presentation.icon_tint, Color::from(FishColor::Yellow.tint()));
        assert_eq!(presentation.label_color, palette::LABEL_TEXT);
    }

    #[test]
    fn color_targets_show_a_swatch() {
        let target = Target::new(1, CriterionKind::Color, FishColor::Purple);
        let presentation = Presentation::of(&target.display());
        assert_eq!(presentation.icon, Some(None));
        assert_eq!(presentation.label, "Purple");
    }

    #[test]
    fn progress_fraction_is_clamped() {
        assert_eq!(progress_fraction(0, 10), 0.0);
        assert_eq!(progress_fraction(5, 10), 0.5);
        assert_eq!(progress_fraction(12, 10), 1.0);
        assert_eq!(progress_fraction(3, 0), 0.0);
    }
}
