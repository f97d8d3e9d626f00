//! Fish spawning.
//!
//! Every `interval` seconds a fish enters from alternating edges on one of
//! eight lanes. With probability `target_weight` it is built to match the
//! active target; otherwise it is a random fish from the level's pool (which
//! may still match by chance).

use bevy::prelude::*;
use rand::{Rng, seq::IndexedRandom};

use super::{
    capture::{CaptureMode, evaluate, tap_fish},
    criterion::{CriterionKind, FishAttributes, FishColor, Target},
    motion::{Lifetime, SineDrift},
    preset::{ConfigError, FishTemplate, LevelRules},
    progress::LevelRun,
    registry::EntityRegistry,
    target::ActiveTarget,
};
use crate::{AppSystems, PausableSystems, screens::Screen, theme::GameFont};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Fish>();
    app.init_resource::<SpawnConfig>();

    app.add_systems(
        Update,
        spawn_fish
            .in_set(AppSystems::Update)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Fishing).and(resource_exists::<SpawnTimer>)),
    );
    app.add_systems(OnExit(Screen::Fishing), clear_spawner);
}

/// Number of horizontal lanes fish swim along.
pub const LANE_COUNT: usize = 8;

/// The visible water. Fish spawn at its left and right edges.
pub const WATER_ZONE: Rect = Rect {
    min: Vec2::new(-600.0, -330.0),
    max: Vec2::new(600.0, 250.0),
};

/// Band below the surface kept free of fish in hook mode, so the hook has
/// room to travel.
pub const SURFACE_BAND: f32 = 110.0;

const FISH_Z: f32 = 1.0;
const FISH_SIZE: f32 = 96.0;
const LABEL_FONT_SIZE: f32 = 40.0;

/// Marks a live, catchable fish.
#[derive(Component, Debug, Default, Reflect)]
#[reflect(Component)]
pub struct Fish;

/// Spawn tuning.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SpawnConfig {
    /// Seconds between spawns.
    pub interval: f32,
    /// Probability that a spawn matches the active target.
    pub target_weight: f32,
    /// Horizontal speed at level index 0, px/s.
    pub base_speed: f32,
    /// Speed added per level index, as a fraction of `base_speed`.
    pub level_speed_step: f32,
    pub amplitude: f32,
    pub frequency: f32,
    /// Fraction of the play area height left empty at top and bottom.
    pub vertical_margin: f32,
    /// Seconds before a fish is force-removed.
    pub max_lifetime: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval: 0.5,
            target_weight: 0.3,
            base_speed: 120.0,
            level_speed_step: 0.5,
            amplitude: 30.0,
            frequency: 2.0,
            vertical_margin: 0.1,
            max_lifetime: 15.0,
        }
    }
}

impl SpawnConfig {
    pub fn with_target_weight(mut self, weight: f32) -> Self {
        self.target_weight = weight.clamp(0.0, 1.0);
        self
    }

    pub fn speed_for_level(&self, level_index: u32) -> f32 {
        self.base_speed * (1.0 + level_index as f32 * self.level_speed_step)
    }
}

/// Region fish spawn and swim in, fixed for the level.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PlayArea(pub Rect);

impl PlayArea {
    /// Derive the play area from the water zone. Hook mode keeps fish out of
    /// the band under the surface.
    pub fn from_zone(zone: Rect, mode: CaptureMode) -> Result<Self, ConfigError> {
        let mut rect = zone;
        if mode == CaptureMode::Hook {
            rect.max.y -= SURFACE_BAND;
        }
        if rect.width() < 1.0 || rect.height() < 1.0 {
            return Err(ConfigError::DegeneratePlayArea {
                width: rect.width() as i64,
                height: rect.height() as i64,
            });
        }
        Ok(Self(rect))
    }

    /// Centers of the evenly spaced lanes after trimming `margin` (a fraction
    /// of the height, clamped to `0..=0.45`) from top and bottom.
    pub fn lanes(&self, margin: f32) -> [f32; LANE_COUNT] {
        let margin = margin.clamp(0.0, 0.45) * self.0.height();
        let y_min = self.0.min.y + margin;
        let y_max = self.0.max.y - margin;
        let step = (y_max - y_min) / LANE_COUNT as f32;
        std::array::from_fn(|i| y_min + step * (0.5 + i as f32))
    }
}

/// Edge a fish enters from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Everything needed to put one fish in the water.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPlan {
    pub template: FishTemplate,
    pub attributes: FishAttributes,
    pub position: Vec2,
    pub side: Side,
    pub motion: SineDrift,
    /// Sprites face right; fish entering from the right are mirrored.
    pub flip_x: bool,
    /// Whether the fish matches the target it was planned against.
    pub is_target: bool,
}

/// Decides what to spawn next. Created at level start from the play area.
#[derive(Resource, Debug, Clone)]
pub struct SpawnScheduler {
    config: SpawnConfig,
    area: Rect,
    lanes: [f32; LANE_COUNT],
    next_side: Side,
}

impl SpawnScheduler {
    pub fn new(config: SpawnConfig, area: &PlayArea) -> Self {
        Self {
            lanes: area.lanes(config.vertical_margin),
            area: area.0,
            config,
            next_side: Side::Left,
        }
    }

    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    /// Plan the next spawn against `target`. `None` only if the level has no
    /// templates at all.
    pub fn plan<R: Rng + ?Sized>(
        &mut self,
        target: &Target,
        rules: &LevelRules,
        rng: &mut R,
    ) -> Option<SpawnPlan> {
        let spawn_target = rng.random_bool(f64::from(self.config.target_weight.clamp(0.0, 1.0)));

        let side = self.next_side;
        self.next_side = side.opposite();
        let lane = self.lanes[rng.random_range(0..LANE_COUNT)];

        let template = self.pick_template(spawn_target, target, rules, rng)?;
        let attributes = Self::dress(template, spawn_target, target, rules, rng);

        let speed = self.config.speed_for_level(rules.level_index);
        let (x, speed) = match side {
            Side::Left => (self.area.min.x, speed),
            Side::Right => (self.area.max.x, -speed),
        };

        Some(SpawnPlan {
            is_target: evaluate(&attributes, target, rules.use_palette),
            template,
            attributes,
            position: Vec2::new(x, lane),
            side,
            motion: SineDrift::new(speed, self.config.amplitude, self.config.frequency),
            flip_x: side == Side::Right,
        })
    }

    fn pick_template<R: Rng + ?Sized>(
        &self,
        spawn_target: bool,
        target: &Target,
        rules: &LevelRules,
        rng: &mut R,
    ) -> Option<FishTemplate> {
        if spawn_target && !rules.kind.is_textual() {
            let matching: Vec<&FishTemplate> = rules
                .templates
                .iter()
                .filter(|t| t.portrays(target, rules.use_palette))
                .collect();
            if let Some(template) = matching.choose(rng) {
                return Some(**template);
            }
            warn!(
                "No template portrays target {:?}, spawning from the full pool",
                target.display().label
            );
        }
        rules.templates.choose(rng).copied()
    }

    /// Fill in the attributes a template does not carry itself.
    fn dress<R: Rng + ?Sized>(
        template: FishTemplate,
        spawn_target: bool,
        target: &Target,
        rules: &LevelRules,
        rng: &mut R,
    ) -> FishAttributes {
        let mut attributes = FishAttributes {
            species: Some(template.species),
            shape: template.shape,
            color: template.color,
            letter: None,
            number: None,
            tint: template.color.tint(),
        };
        if !rules.kind.is_textual() {
            return attributes;
        }

        let label_color = if spawn_target {
            target.color
        } else if rules.use_palette {
            rules
                .pools
                .colors
                .choose(rng)
                .copied()
                .unwrap_or(FishColor::White)
        } else {
            FishColor::White
        };
        attributes.tint = if spawn_target {
            target.tint
        } else {
            label_color.tint()
        };

        match rules.kind {
            CriterionKind::Letter | CriterionKind::Vowel => {
                attributes.letter = if spawn_target {
                    target.letter
                } else {
                    rules.pools.letters.choose(rng).copied()
                };
            }
            CriterionKind::Number => {
                attributes.number = if spawn_target {
                    target.number
                } else {
                    rules.pools.numbers.choose(rng).copied()
                };
            }
            _ => {}
        }
        attributes
    }
}

/// Spawn cadence for one level generation.
#[derive(Resource, Debug)]
pub struct SpawnTimer {
    generation: u32,
    timer: Timer,
}

impl SpawnTimer {
    pub fn new(generation: u32, interval: f32) -> Self {
        let mut timer = Timer::from_seconds(interval.max(0.01), TimerMode::Repeating);
        // The first fish appears right away.
        timer.set_elapsed(timer.duration());
        Self { generation, timer }
    }
}

fn spawn_fish(
    mut commands: Commands,
    time: Res<Time>,
    mut spawn_timer: ResMut<SpawnTimer>,
    run: Res<LevelRun>,
    mut scheduler: ResMut<SpawnScheduler>,
    target: Res<ActiveTarget>,
    rules: Res<LevelRules>,
    mode: Res<CaptureMode>,
    mut registry: ResMut<EntityRegistry>,
    asset_server: Res<AssetServer>,
    font: Res<GameFont>,
) {
    if !run.is_current(spawn_timer.generation) || !run.is_spawning() {
        return;
    }
    spawn_timer.timer.tick(time.delta());
    if spawn_timer.timer.times_finished_this_tick() == 0 {
        return;
    }

    let mut rng = rand::rng();
    let Some(plan) = scheduler.plan(target.get(), &rules, &mut rng) else {
        warn!("Level {} has no fish templates", rules.name);
        return;
    };

    // Shape criteria color the printed shape, everything else the body.
    let (body_tint, shape_tint) = if rules.kind.uses_shape() {
        (Color::WHITE, Color::from(plan.template.color.tint()))
    } else {
        (Color::from(plan.template.color.tint()), Color::WHITE)
    };

    let mut fish = commands.spawn((
        Name::new("Fish"),
        Fish,
        plan.attributes.clone(),
        plan.motion.clone(),
        Lifetime::from_seconds(scheduler.config().max_lifetime),
        Sprite {
            image: asset_server.load(plan.template.species.image_path()),
            color: body_tint,
            flip_x: plan.flip_x,
            custom_size: Some(Vec2::splat(FISH_SIZE)),
            ..default()
        },
        Transform::from_translation(plan.position.extend(FISH_Z)),
        DespawnOnExit(Screen::Fishing),
    ));

    if let Some(shape) = plan.template.shape {
        fish.with_child((
            Name::new("Fish Shape"),
            Sprite {
                image: asset_server.load(shape.image_path()),
                color: shape_tint,
                custom_size: Some(Vec2::splat(FISH_SIZE * 0.45)),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, 0.1),
            Pickable::IGNORE,
        ));
    }

    if let Some(label) = plan.attributes.label() {
        fish.with_child((
            Name::new("Fish Label"),
            Text2d::new(label),
            TextFont {
                font: font.0.clone(),
                font_size: LABEL_FONT_SIZE,
                ..default()
            },
            TextColor(plan.attributes.tint.into()),
            Transform::from_xyz(0.0, 0.0, 0.2),
            Pickable::IGNORE,
        ));
    }

    if *mode == CaptureMode::Tap {
        fish.observe(tap_fish);
    }

    let id = fish.id();
    registry.insert(id);
    debug!(
        "Spawned {:?} fish {:?} (target: {})",
        plan.side, id, plan.is_target
    );
}

fn clear_spawner(mut commands: Commands, mut registry: ResMut<EntityRegistry>) {
    commands.remove_resource::<SpawnTimer>();
    commands.remove_resource::<SpawnScheduler>();
    registry.drain();
}
