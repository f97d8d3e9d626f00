//! The level setup menu: what to catch, how, and how fast.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::{
    game::PRESETS,
    menus::Menu,
    screens::Screen,
    settings::{GameSettings, LEVEL_COUNT},
    theme::{GameFont, palette::MENU_BACKGROUND, widget},
};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<SetupValue>();

    app.add_systems(OnEnter(Menu::Setup), spawn_setup_menu);
    app.add_systems(
        Update,
        go_back.run_if(in_state(Menu::Setup).and(input_just_pressed(KeyCode::Escape))),
    );
    app.add_systems(
        Update,
        (update_setup_values, show_palette_row).run_if(in_state(Menu::Setup)),
    );
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
enum SetupValue {
    Criterion,
    Level,
    Capture,
    Miss,
    Palette,
}

impl SetupValue {
    fn text(self, settings: &GameSettings) -> String {
        match self {
            SetupValue::Criterion => PRESETS
                .get(settings.criterion_index)
                .map_or("?", |preset| preset.name)
                .to_string(),
            SetupValue::Level => format!("{} / {}", settings.level_index + 1, LEVEL_COUNT),
            SetupValue::Capture => settings.capture_mode.label().to_string(),
            SetupValue::Miss => settings.miss_policy.label().to_string(),
            SetupValue::Palette => if settings.use_palette { "All colors" } else { "Plain" }.to_string(),
        }
    }
}

#[derive(Component)]
struct PaletteRow;

/// Step `index` by `step` through `len` entries, wrapping at both ends.
fn cycle(index: usize, len: usize, step: isize) -> usize {
    if len == 0 {
        return 0;
    }
    (index as isize + step).rem_euclid(len as isize) as usize
}

fn palette_row_visible(settings: &GameSettings) -> bool {
    PRESETS
        .get(settings.criterion_index)
        .is_some_and(|preset| preset.offers_palette_toggle())
}

fn spawn_setup_menu(mut commands: Commands, game_font: Res<GameFont>) {
    let font = game_font.0.clone();

    commands.spawn((
        widget::ui_root("Setup Menu"),
        BackgroundColor(MENU_BACKGROUND),
        DespawnOnExit(Menu::Setup),
        children![
            widget::header("Go fishing", font.clone()),
            widget::option_row(
                "Catch",
                font.clone(),
                SetupValue::Criterion,
                previous_criterion,
                next_criterion,
            ),
            widget::option_row(
                "Level",
                font.clone(),
                SetupValue::Level,
                previous_level,
                next_level,
            ),
            widget::option_row(
                "Capture",
                font.clone(),
                SetupValue::Capture,
                toggle_capture_mode,
                toggle_capture_mode,
            ),
            widget::option_row(
                "Wrong catch",
                font.clone(),
                SetupValue::Miss,
                toggle_miss_policy,
                toggle_miss_policy,
            ),
            (
                widget::option_row(
                    "Colors",
                    font,
                    SetupValue::Palette,
                    toggle_palette,
                    toggle_palette,
                ),
                PaletteRow,
            ),
            widget::button("Start", start_fishing),
            widget::button("Back", go_back_on_click),
        ],
    ));
}

fn previous_criterion(_: On<Pointer<Click>>, mut settings: ResMut<GameSettings>) {
    settings.criterion_index = cycle(settings.criterion_index, PRESETS.len(), -1);
    settings.save();
}

fn next_criterion(_: On<Pointer<Click>>, mut settings: ResMut<GameSettings>) {
    settings.criterion_index = cycle(settings.criterion_index, PRESETS.len(), 1);
    settings.save();
}

fn previous_level(_: On<Pointer<Click>>, mut settings: ResMut<GameSettings>) {
    settings.level_index = settings.level_index.saturating_sub(1);
    settings.save();
}

fn next_level(_: On<Pointer<Click>>, mut settings: ResMut<GameSettings>) {
    settings.level_index = (settings.level_index + 1).min(LEVEL_COUNT - 1);
    settings.save();
}

fn toggle_capture_mode(_: On<Pointer<Click>>, mut settings: ResMut<GameSettings>) {
    settings.capture_mode = settings.capture_mode.toggled();
    settings.save();
}

fn toggle_miss_policy(_: On<Pointer<Click>>, mut settings: ResMut<GameSettings>) {
    settings.miss_policy = settings.miss_policy.toggled();
    settings.save();
}

fn toggle_palette(_: On<Pointer<Click>>, mut settings: ResMut<GameSettings>) {
    settings.use_palette = !settings.use_palette;
    settings.save();
}

fn start_fishing(
    _: On<Pointer<Click>>,
    mut next_menu: ResMut<NextState<Menu>>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    next_menu.set(Menu::None);
    next_screen.set(Screen::Fishing);
}

fn update_setup_values(settings: Res<GameSettings>, mut values: Query<(&SetupValue, &mut Text)>) {
    for (value, mut text) in &mut values {
        let wanted = value.text(&settings);
        if text.0 != wanted {
            text.0 = wanted;
        }
    }
}

fn show_palette_row(settings: Res<GameSettings>, mut rows: Query<&mut Node, With<PaletteRow>>) {
    let display = if palette_row_visible(&settings) {
        Display::Flex
    } else {
        Display::None
    };
    for mut node in &mut rows {
        if node.display != display {
            node.display = display;
        }
    }
}

fn go_back_on_click(_: On<Pointer<Click>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Main);
}

fn go_back(mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Main);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CaptureMode, CriterionPreset, MissPolicy};
    use pretty_assertions::assert_eq;

    #[test]
    fn criterion_cycles_both_ways() {
        assert_eq!(cycle(0, 9, -1), 8);
        assert_eq!(cycle(8, 9, 1), 0);
        assert_eq!(cycle(3, 9, 1), 4);
        assert_eq!(cycle(5, 0, 1), 0);
    }

    #[test]
    fn palette_row_hidden_for_color_criteria() {
        let index_of = |pick: fn(&CriterionPreset) -> bool| {
            PRESETS.iter().position(pick).unwrap()
        };
        let colors = GameSettings {
            criterion_index: index_of(|p| p.name == "Colors"),
            ..default()
        };
        let letters = GameSettings {
            criterion_index: index_of(|p| p.name == "Letters"),
            ..default()
        };
        assert!(!palette_row_visible(&colors));
        assert!(palette_row_visible(&letters));
    }

    #[test]
    fn values_render_from_settings() {
        let settings = GameSettings {
            level_index: 2,
            capture_mode: CaptureMode::Hook,
            ..default()
        };
        assert_eq!(SetupValue::Level.text(&settings), "3 / 3");
        assert_eq!(SetupValue::Capture.text(&settings), "Hook");
        assert_eq!(SetupValue::Miss.text(&settings), "Keep target");
        let settings = GameSettings {
            miss_policy: MissPolicy::Ignore.toggled(),
            ..settings
        };
        assert_eq!(SetupValue::Miss.text(&settings), "New target");
        assert_eq!(SetupValue::Criterion.text(&settings), PRESETS[0].name);
        assert_eq!(SetupValue::Palette.text(&settings), "Plain");
    }
}
