//! The game's menus and transitions between them.

mod bonus_end;
mod credits;
mod main;
mod pause;
mod settings;
mod setup;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.init_state::<Menu>();

    app.add_plugins((
        bonus_end::plugin,
        credits::plugin,
        main::plugin,
        pause::plugin,
        settings::plugin,
        setup::plugin,
    ));
}

#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Menu {
    #[default]
    None,
    Main,
    Setup,
    Credits,
    Settings,
    Pause,
    BonusEnd,
}
