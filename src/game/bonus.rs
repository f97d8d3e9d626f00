//! Bonus round: pop as many bubbles as you can before the clock runs out.

use bevy::prelude::*;
use rand::Rng;

use super::{criterion::Species, polish::PopAnimation};
use crate::{
    AppSystems, PausableSystems,
    audio::{music, sound_effect},
    menus::Menu,
    screens::Screen,
    settings::GameSettings,
    theme::{GameFont, palette},
};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Bubble>();
    app.add_message::<BonusRoundComplete>();

    app.add_systems(OnEnter(Screen::Bonus), start_bonus_round);
    app.add_systems(
        Update,
        (
            tick_bonus_round.in_set(AppSystems::TickTimers),
            (move_bubbles, update_bonus_hud, show_end_menu).in_set(AppSystems::Update),
        )
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Bonus)),
    );
    app.add_systems(OnExit(Screen::Bonus), end_bonus_round);
}

/// Round length in seconds.
pub const BONUS_DURATION: f32 = 30.0;
const SPAWN_INTERVAL: f32 = 0.5;
const MAX_BUBBLES: usize = 30;
/// Seconds between the round ending and the end menu appearing.
const END_DELAY: f32 = 2.0;
/// Fraction of the arena kept clear at every edge.
const BORDER_MARGIN: f32 = 0.05;
const BUBBLE_SPEED: f32 = 90.0;
const BUBBLE_SIZE: f32 = 90.0;

const ARENA: Rect = Rect {
    min: Vec2::new(-600.0, -330.0),
    max: Vec2::new(600.0, 300.0),
};

/// The round finished with `score` bubbles popped.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusRoundComplete {
    pub score: u32,
}

/// Clock and score of the running bonus round.
#[derive(Resource, Debug, Clone)]
pub struct BonusRound {
    remaining: f32,
    score: u32,
    running: bool,
    /// Countdowns for the extra bubble each pop earns.
    respawns: Vec<f32>,
}

impl Default for BonusRound {
    fn default() -> Self {
        Self::new(BONUS_DURATION)
    }
}

/// What happened during one [`BonusRound::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BonusTick {
    /// The clock ran out on this tick.
    pub finished: bool,
    /// Earned bubbles that are due now.
    pub respawns: usize,
}

impl BonusRound {
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration.max(0.0),
            score: 0,
            running: true,
            respawns: Vec::new(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whole seconds shown on the clock.
    pub fn seconds_left(&self) -> u32 {
        self.remaining.max(0.0).ceil() as u32
    }

    pub fn tick(&mut self, dt: f32) -> BonusTick {
        if !self.running {
            return BonusTick::default();
        }

        self.remaining -= dt;
        for countdown in &mut self.respawns {
            *countdown -= dt;
        }
        let before = self.respawns.len();
        self.respawns.retain(|countdown| *countdown > 0.0);
        let respawns = before - self.respawns.len();

        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.running = false;
            self.respawns.clear();
            return BonusTick {
                finished: true,
                respawns: 0,
            };
        }
        BonusTick {
            finished: false,
            respawns,
        }
    }

    /// Count a pop and queue its replacement. Ignored once the clock is out.
    pub fn record_pop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.score += 1;
        self.respawns.push(SPAWN_INTERVAL);
        true
    }
}

/// A poppable bubble drifting in a straight line.
#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
pub struct Bubble {
    pub direction: Vec2,
}

#[derive(Resource)]
struct BubbleSpawnTimer(Timer);

#[derive(Resource)]
struct EndMenuDelay(Timer);

#[derive(Component)]
struct BonusMusic;

#[derive(Component)]
struct BonusClockLabel;

#[derive(Component)]
struct BonusScoreLabel;

/// The area bubbles may occupy once the border margin is removed.
fn inner_arena() -> Rect {
    let inset = ARENA.size() * BORDER_MARGIN;
    Rect::from_corners(ARENA.min + inset, ARENA.max - inset)
}

/// Reflect `direction` off any edge of `bounds` that `position` has crossed
/// while heading outward.
pub fn bounce(position: Vec2, direction: Vec2, bounds: Rect) -> Vec2 {
    let mut direction = direction;
    if (position.x < bounds.min.x && direction.x < 0.0)
        || (position.x > bounds.max.x && direction.x > 0.0)
    {
        direction.x = -direction.x;
    }
    if (position.y < bounds.min.y && direction.y < 0.0)
        || (position.y > bounds.max.y && direction.y > 0.0)
    {
        direction.y = -direction.y;
    }
    direction
}

fn start_bonus_round(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    font: Res<GameFont>,
) {
    commands.insert_resource(BonusRound::default());
    commands.insert_resource(BubbleSpawnTimer(Timer::from_seconds(
        SPAWN_INTERVAL,
        TimerMode::Repeating,
    )));
    commands.remove_resource::<EndMenuDelay>();

    commands.spawn((
        Name::new("Bonus Music"),
        BonusMusic,
        music(asset_server.load("audio/music/bubbles.ogg")),
        DespawnOnExit(Screen::Bonus),
    ));

    let text_font = TextFont {
        font: font.0.clone(),
        font_size: 32.0,
        ..default()
    };
    commands.spawn((
        Name::new("Bonus HUD"),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::SpaceBetween,
            padding: UiRect::horizontal(Val::Px(24.0)),
            ..default()
        },
        Pickable::IGNORE,
        DespawnOnExit(Screen::Bonus),
        children![
            (
                Name::new("Bonus Clock"),
                BonusClockLabel,
                Text::new(format!("{}", BONUS_DURATION.ceil() as u32)),
                text_font.clone(),
                TextColor(palette::LABEL_TEXT),
            ),
            (
                Name::new("Bonus Score"),
                BonusScoreLabel,
                Text::new("0"),
                text_font,
                TextColor(palette::LABEL_TEXT),
            ),
        ],
    ));

    info!("Bonus round started ({}s)", BONUS_DURATION);
}

fn tick_bonus_round(
    mut commands: Commands,
    time: Res<Time>,
    mut round: ResMut<BonusRound>,
    mut timer: ResMut<BubbleSpawnTimer>,
    bubbles: Query<Entity, With<Bubble>>,
    music: Query<Entity, With<BonusMusic>>,
    mut completed: MessageWriter<BonusRoundComplete>,
    asset_server: Res<AssetServer>,
) {
    let tick = round.tick(time.delta_secs());

    let mut due = tick.respawns;
    if timer.0.tick(time.delta()).just_finished() {
        due += 1;
    }
    if round.is_running() {
        let mut rng = rand::rng();
        let room = MAX_BUBBLES.saturating_sub(bubbles.iter().count());
        for _ in 0..due.min(room) {
            spawn_bubble(&mut commands, &asset_server, &mut rng);
        }
    }

    if !tick.finished {
        return;
    }

    for entity in &bubbles {
        commands.entity(entity).despawn();
    }
    for entity in &music {
        commands.entity(entity).despawn();
    }
    completed.write(BonusRoundComplete {
        score: round.score(),
    });
    commands.insert_resource(EndMenuDelay(Timer::from_seconds(END_DELAY, TimerMode::Once)));
    info!("Bonus round over: {} bubbles popped", round.score());
}

fn spawn_bubble(commands: &mut Commands, asset_server: &AssetServer, rng: &mut impl Rng) {
    let bounds = inner_arena();
    let position = Vec2::new(
        rng.random_range(bounds.min.x..bounds.max.x),
        rng.random_range(bounds.min.y..bounds.max.y),
    );
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let species = Species::ALL[rng.random_range(0..Species::ALL.len())];

    commands
        .spawn((
            Name::new("Bubble"),
            Bubble {
                direction: Vec2::from_angle(angle),
            },
            Sprite {
                image: asset_server.load("images/bubble.png"),
                custom_size: Some(Vec2::splat(BUBBLE_SIZE)),
                ..default()
            },
            Transform::from_translation(position.extend(2.0)),
            DespawnOnExit(Screen::Bonus),
            children![(
                Name::new("Bubble Fish"),
                Sprite {
                    image: asset_server.load(species.image_path()),
                    custom_size: Some(Vec2::splat(BUBBLE_SIZE * 0.55)),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, -0.1),
                Pickable::IGNORE,
            )],
        ))
        .observe(pop_bubble);
}

fn move_bubbles(time: Res<Time>, mut bubbles: Query<(&mut Transform, &mut Bubble)>) {
    let bounds = inner_arena();
    let step = BUBBLE_SPEED * time.delta_secs();
    for (mut transform, mut bubble) in &mut bubbles {
        let next = transform.translation.truncate() + bubble.direction * step;
        bubble.direction = bounce(next, bubble.direction, bounds);
        transform.translation += (bubble.direction * step).extend(0.0);
    }
}

fn pop_bubble(
    click: On<Pointer<Click>>,
    mut commands: Commands,
    mut round: ResMut<BonusRound>,
    bubbles: Query<&Transform, With<Bubble>>,
    settings: Res<GameSettings>,
    asset_server: Res<AssetServer>,
) {
    let Ok(transform) = bubbles.get(click.entity) else {
        return;
    };
    if !round.record_pop() {
        return;
    }
    if settings.special_effects {
        commands.spawn(sound_effect(asset_server.load("audio/sound_effects/pop.ogg")));
    }
    commands
        .entity(click.entity)
        .remove::<Bubble>()
        .insert(PopAnimation::new(transform.scale));
}

fn update_bonus_hud(
    round: Res<BonusRound>,
    mut clock: Single<&mut Text, (With<BonusClockLabel>, Without<BonusScoreLabel>)>,
    mut score: Single<&mut Text, (With<BonusScoreLabel>, Without<BonusClockLabel>)>,
) {
    if !round.is_changed() {
        return;
    }
    clock.0 = round.seconds_left().to_string();
    score.0 = round.score().to_string();
}

fn show_end_menu(
    time: Res<Time>,
    delay: Option<ResMut<EndMenuDelay>>,
    mut next_menu: ResMut<NextState<Menu>>,
) {
    let Some(mut delay) = delay else {
        return;
    };
    if delay.0.tick(time.delta()).just_finished() {
        next_menu.set(Menu::BonusEnd);
    }
}

fn end_bonus_round(mut commands: Commands) {
    commands.remove_resource::<BubbleSpawnTimer>();
    commands.remove_resource::<EndMenuDelay>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clock_counts_down_and_stops_once() {
        let mut round = BonusRound::new(1.0);
        assert_eq!(round.seconds_left(), 1);
        assert!(!round.tick(0.6).finished);
        assert_eq!(round.seconds_left(), 1);
        assert!(round.tick(0.6).finished);
        assert_eq!(round.seconds_left(), 0);
        assert!(!round.tick(0.6).finished);
        assert!(!round.is_running());
    }

    #[test]
    fn seconds_round_up() {
        let mut round = BonusRound::new(BONUS_DURATION);
        round.tick(0.25);
        assert_eq!(round.seconds_left(), 30);
        round.tick(1.0);
        assert_eq!(round.seconds_left(), 29);
    }

    #[test]
    fn pops_score_only_while_running() {
        let mut round = BonusRound::new(1.0);
        assert!(round.record_pop());
        assert!(round.record_pop());
        round.tick(2.0);
        assert!(!round.record_pop());
        assert_eq!(round.score(), 2);
    }

    #[test]
    fn each_pop_earns_a_delayed_bubble() {
        let mut round = BonusRound::new(10.0);
        round.record_pop();
        assert_eq!(round.tick(0.25).respawns, 0);
        assert_eq!(round.tick(0.3).respawns, 1);
        assert_eq!(round.tick(1.0).respawns, 0);
    }

    #[test]
    fn bubbles_bounce_off_the_margin() {
        let bounds = inner_arena();
        let outside_right = Vec2::new(bounds.max.x + 1.0, 0.0);
        assert_eq!(
            bounce(outside_right, Vec2::new(1.0, 0.5), bounds),
            Vec2::new(-1.0, 0.5)
        );
        // Already heading back in: no flip.
        assert_eq!(
            bounce(outside_right, Vec2::new(-1.0, 0.5), bounds),
            Vec2::new(-1.0, 0.5)
        );
        let below = Vec2::new(0.0, bounds.min.y - 1.0);
        assert_eq!(
            bounce(below, Vec2::new(0.3, -1.0), bounds),
            Vec2::new(0.3, 1.0)
        );
    }

    #[test]
    fn inner_arena_keeps_a_five_percent_border() {
        let inner = inner_arena();
        assert!((inner.min.x - (ARENA.min.x + ARENA.width() * 0.05)).abs() < 1e-3);
        assert!((inner.max.y - (ARENA.max.y - ARENA.height() * 0.05)).abs() < 1e-3);
    }
}
