//! The menu shown after the bonus round.

use bevy::prelude::*;

use crate::{
    game::BonusRoundComplete,
    menus::Menu,
    screens::Screen,
    settings::GameSettings,
    theme::{GameFont, palette::MENU_BACKGROUND, widget},
};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<LastBonusScore>();
    app.add_systems(Update, record_bonus_score);
    app.add_systems(OnEnter(Menu::BonusEnd), spawn_bonus_end_menu);
}

/// Score of the most recent bonus round.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
struct LastBonusScore(u32);

fn record_bonus_score(
    mut completed: MessageReader<BonusRoundComplete>,
    mut last: ResMut<LastBonusScore>,
) {
    if let Some(round) = completed.read().last() {
        last.0 = round.score;
    }
}

fn score_text(score: u32) -> String {
    match score {
        1 => "You popped 1 bubble!".to_string(),
        n => format!("You popped {n} bubbles!"),
    }
}

fn spawn_bonus_end_menu(
    mut commands: Commands,
    score: Res<LastBonusScore>,
    settings: Res<GameSettings>,
    game_font: Res<GameFont>,
) {
    let font = game_font.0.clone();
    let score = score.0;

    let mut menu = commands.spawn((
        widget::ui_root("Bonus End Menu"),
        BackgroundColor(MENU_BACKGROUND.with_alpha(0.95)),
        DespawnOnExit(Menu::BonusEnd),
    ));
    menu.with_children(|parent| {
        parent.spawn(widget::header("Time's up!", font.clone()));
        parent.spawn(widget::label(score_text(score), font));
        // The last level has nowhere to continue to.
        if settings.has_next_level() {
            parent.spawn(widget::button("Continue", continue_to_next_level));
        }
        parent.spawn(widget::button("Menu", back_to_title));
    });
}

fn continue_to_next_level(
    _: On<Pointer<Click>>,
    mut settings: ResMut<GameSettings>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    if !settings.has_next_level() {
        return;
    }
    settings.level_index += 1;
    settings.save();
    next_screen.set(Screen::Fishing);
}

fn back_to_title(_: On<Pointer<Click>>, mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::Title);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{create_test_app, tick};
    use pretty_assertions::assert_eq;

    #[test]
    fn finished_round_score_is_kept_for_the_menu() {
        let mut app = create_test_app();
        app.add_message::<BonusRoundComplete>()
            .init_resource::<LastBonusScore>()
            .add_systems(Update, record_bonus_score);

        app.world_mut().write_message(BonusRoundComplete { score: 7 });
        tick(&mut app);
        // Later frames without a message keep the last score.
        tick(&mut app);
        tick(&mut app);

        assert_eq!(*app.world().resource::<LastBonusScore>(), LastBonusScore(7));
    }

    #[test]
    fn score_text_pluralizes() {
        assert_eq!(score_text(0), "You popped 0 bubbles!");
        assert_eq!(score_text(1), "You popped 1 bubble!");
        assert_eq!(score_text(17), "You popped 17 bubbles!");
    }
}
