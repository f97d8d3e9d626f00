//! Catch criteria and the attributes a fish can be matched on.
//!
//! A [`Target`] names the value(s) that currently count as a correct catch.
//! Every fish carries [`FishAttributes`] with the same shape, so matching is
//! a field-by-field comparison (see `capture::evaluate`).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<FishAttributes>();
    app.register_type::<FishColor>();
    app.register_type::<Species>();
    app.register_type::<Shape>();
}

/// The attribute dimension that defines a correct catch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum CriterionKind {
    Color,
    Species,
    ColorAndSpecies,
    Letter,
    Number,
    Shape,
    ShapeAndColor,
    Vowel,
}

impl CriterionKind {
    pub const ALL: [CriterionKind; 8] = [
        CriterionKind::Color,
        CriterionKind::Species,
        CriterionKind::ColorAndSpecies,
        CriterionKind::Letter,
        CriterionKind::Number,
        CriterionKind::Shape,
        CriterionKind::ShapeAndColor,
        CriterionKind::Vowel,
    ];

    /// Kinds whose target is a label printed on the fish rather than its body.
    pub fn is_textual(self) -> bool {
        matches!(
            self,
            CriterionKind::Letter | CriterionKind::Vowel | CriterionKind::Number
        )
    }

    /// Kinds where the body color is part of the criterion regardless of
    /// palette mode.
    pub fn requires_color(self) -> bool {
        matches!(
            self,
            CriterionKind::Color | CriterionKind::ColorAndSpecies | CriterionKind::ShapeAndColor
        )
    }

    pub fn uses_species(self) -> bool {
        matches!(self, CriterionKind::Species | CriterionKind::ColorAndSpecies)
    }

    pub fn uses_shape(self) -> bool {
        matches!(self, CriterionKind::Shape | CriterionKind::ShapeAndColor)
    }
}

/// Named palette colors. Matching on body color compares these ids, never
/// the rendered RGB.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize,
)]
pub enum FishColor {
    #[default]
    White,
    Red,
    Blue,
    Yellow,
    Pink,
    Green,
    Cyan,
    Purple,
    Brown,
    Gray,
}

impl FishColor {
    pub const ALL: [FishColor; 10] = [
        FishColor::White,
        FishColor::Red,
        FishColor::Blue,
        FishColor::Yellow,
        FishColor::Pink,
        FishColor::Green,
        FishColor::Cyan,
        FishColor::Purple,
        FishColor::Brown,
        FishColor::Gray,
    ];

    /// The concrete tint used when rendering this color.
    pub fn tint(self) -> Srgba {
        match self {
            FishColor::White => Srgba::WHITE,
            FishColor::Red => Srgba::rgb(1.0, 0.0, 0.0),
            FishColor::Blue => Srgba::rgb(0.0, 0.0, 1.0),
            FishColor::Yellow => Srgba::rgb(1.0, 0.92, 0.016),
            FishColor::Pink => Srgba::rgb(1.0, 0.4, 0.7),
            FishColor::Green => Srgba::rgb(0.0, 1.0, 0.0),
            FishColor::Cyan => Srgba::rgb(0.0, 1.0, 1.0),
            FishColor::Purple => Srgba::rgb(0.6, 0.2, 0.8),
            FishColor::Brown => Srgba::rgb(0.65, 0.5, 0.4),
            FishColor::Gray => Srgba::rgb(0.5, 0.5, 0.5),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FishColor::White => "White",
            FishColor::Red => "Red",
            FishColor::Blue => "Blue",
            FishColor::Yellow => "Yellow",
            FishColor::Pink => "Pink",
            FishColor::Green => "Green",
            FishColor::Cyan => "Cyan",
            FishColor::Purple => "Purple",
            FishColor::Brown => "Brown",
            FishColor::Gray => "Gray",
        }
    }
}

/// Fish bodies available for spawning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum Species {
    Pufferfish,
    Octopus,
    Shark,
    Stingray,
    Starfish,
    Crab,
    Seahorse,
    Whale,
}

impl Species {
    pub const ALL: [Species; 8] = [
        Species::Pufferfish,
        Species::Octopus,
        Species::Shark,
        Species::Stingray,
        Species::Starfish,
        Species::Crab,
        Species::Seahorse,
        Species::Whale,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Species::Pufferfish => "Pufferfish",
            Species::Octopus => "Octopus",
            Species::Shark => "Shark",
            Species::Stingray => "Stingray",
            Species::Starfish => "Starfish",
            Species::Crab => "Crab",
            Species::Seahorse => "Seahorse",
            Species::Whale => "Whale",
        }
    }

    pub fn image_path(self) -> String {
        format!("images/fish/{}.png", self.name().to_lowercase())
    }
}

/// Shapes printed on a fish body for the shape criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum Shape {
    Circle,
    Triangle,
    Star,
    Square,
    Rectangle,
    Heart,
    Arrow,
    Hexagon,
    Pentagon,
    Trapezoid,
    Bolt,
    Rhombus,
}

impl Shape {
    pub const ALL: [Shape; 12] = [
        Shape::Circle,
        Shape::Triangle,
        Shape::Star,
        Shape::Square,
        Shape::Rectangle,
        Shape::Heart,
        Shape::Arrow,
        Shape::Hexagon,
        Shape::Pentagon,
        Shape::Trapezoid,
        Shape::Bolt,
        Shape::Rhombus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Circle => "Circle",
            Shape::Triangle => "Triangle",
            Shape::Star => "Star",
            Shape::Square => "Square",
            Shape::Rectangle => "Rectangle",
            Shape::Heart => "Heart",
            Shape::Arrow => "Arrow",
            Shape::Hexagon => "Hexagon",
            Shape::Pentagon => "Pentagon",
            Shape::Trapezoid => "Trapezoid",
            Shape::Bolt => "Bolt",
            Shape::Rhombus => "Rhombus",
        }
    }

    pub fn image_path(self) -> String {
        format!("images/shapes/{}.png", self.name().to_lowercase())
    }
}

/// Maximum per-channel difference for two tints to count as the same color.
pub const TINT_TOLERANCE: f32 = 0.02;

/// Rounding slack so a nominal difference of exactly [`TINT_TOLERANCE`]
/// still matches after f32 subtraction.
const TINT_SLACK: f32 = f32::EPSILON * 4.0;

/// Compare two tints channel by channel within [`TINT_TOLERANCE`].
pub fn tints_match(a: Srgba, b: Srgba) -> bool {
    let close = |x: f32, y: f32| (x - y).abs() <= TINT_TOLERANCE + TINT_SLACK;
    close(a.red, b.red)
        && close(a.green, b.green)
        && close(a.blue, b.blue)
        && close(a.alpha, b.alpha)
}

/// The value(s) of the active criterion that count as a correct catch.
///
/// Built once by the target selector and replaced wholesale on rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// Monotonic id, unique within a level.
    pub id: u32,
    pub kind: CriterionKind,
    /// Named body color. Neutral white unless the kind or palette mode
    /// makes color part of the criterion.
    pub color: FishColor,
    /// Rendered tint of `color`, compared against text labels.
    pub tint: Srgba,
    pub species: Option<Species>,
    pub shape: Option<Shape>,
    pub letter: Option<char>,
    pub number: Option<i32>,
    /// Drawn with palette mode on.
    pub palette: bool,
}

impl Target {
    pub(crate) fn new(id: u32, kind: CriterionKind, color: FishColor) -> Self {
        Self {
            id,
            kind,
            color,
            tint: color.tint(),
            species: None,
            shape: None,
            letter: None,
            number: None,
            palette: false,
        }
    }

    /// Whether the color is part of what the player has to match.
    fn shows_color(&self) -> bool {
        self.kind.requires_color() || self.palette
    }

    /// Payload for the presenter.
    pub fn display(&self) -> TargetDisplay {
        let icon = match self.kind {
            CriterionKind::Color => Some(TargetIcon::Swatch(self.color)),
            CriterionKind::Species | CriterionKind::ColorAndSpecies => {
                self.species.map(TargetIcon::Species)
            }
            CriterionKind::Shape | CriterionKind::ShapeAndColor => {
                self.shape.map(TargetIcon::Shape)
            }
            CriterionKind::Letter | CriterionKind::Vowel | CriterionKind::Number => None,
        };

        let label = match self.kind {
            CriterionKind::Color => self.color.name().to_string(),
            CriterionKind::Letter | CriterionKind::Vowel => {
                self.letter.map(String::from).unwrap_or_default()
            }
            CriterionKind::Number => self.number.map(|n| n.to_string()).unwrap_or_default(),
            CriterionKind::Species | CriterionKind::ColorAndSpecies => {
                let species = self.species.map(Species::name).unwrap_or_default();
                self.with_color(species)
            }
            CriterionKind::Shape | CriterionKind::ShapeAndColor => {
                let shape = self.shape.map(Shape::name).unwrap_or_default();
                self.with_color(shape)
            }
        };

        TargetDisplay {
            kind: self.kind,
            icon,
            label,
            tint: self.tint,
        }
    }

    fn with_color(&self, name: &str) -> String {
        if self.shows_color() {
            format!("{} {}", self.color.name(), name)
        } else {
            name.to_string()
        }
    }
}

/// Icon shown next to the target label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetIcon {
    Species(Species),
    Shape(Shape),
    Swatch(FishColor),
}

/// What the HUD needs to show the active target.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDisplay {
    pub kind: CriterionKind,
    pub icon: Option<TargetIcon>,
    pub label: String,
    pub tint: Srgba,
}

/// Matchable attributes of a spawned fish.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct FishAttributes {
    pub species: Option<Species>,
    pub shape: Option<Shape>,
    /// Named body color.
    pub color: FishColor,
    pub letter: Option<char>,
    pub number: Option<i32>,
    /// Tint of the printed label (or of the body for non-text kinds).
    pub tint: Srgba,
}

impl Default for FishAttributes {
    fn default() -> Self {
        Self {
            species: None,
            shape: None,
            color: FishColor::White,
            letter: None,
            number: None,
            tint: Srgba::WHITE,
        }
    }
}

impl FishAttributes {
    /// Text printed on the fish, if any.
    pub fn label(&self) -> Option<String> {
        self.letter
            .map(String::from)
            .or_else(|| self.number.map(|n| n.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tints_within_tolerance_match() {
        let base = Srgba::new(0.5, 0.5, 0.5, 1.0);
        let close = Srgba::new(0.515, 0.49, 0.5, 0.99);
        assert!(tints_match(base, close));
    }

    #[test]
    fn tints_outside_tolerance_on_any_channel_do_not_match() {
        let base = Srgba::new(0.5, 0.5, 0.5, 1.0);
        assert!(!tints_match(base, Srgba::new(0.53, 0.5, 0.5, 1.0)));
        assert!(!tints_match(base, Srgba::new(0.5, 0.47, 0.5, 1.0)));
        assert!(!tints_match(base, Srgba::new(0.5, 0.5, 0.53, 1.0)));
        assert!(!tints_match(base, Srgba::new(0.5, 0.5, 0.5, 0.97)));
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        let base = Srgba::new(0.7, 0.5, 0.9, 1.0);
        assert!(tints_match(base, Srgba::new(0.72, 0.5, 0.9, 1.0)));
        assert!(tints_match(base, Srgba::new(0.7, 0.52, 0.92, 0.98)));
        assert!(!tints_match(base, Srgba::new(0.7205, 0.5, 0.9, 1.0)));
        assert!(!tints_match(base, Srgba::new(0.7, 0.5, 0.9205, 1.0)));
    }

    #[test]
    fn every_palette_color_matches_only_itself() {
        for a in FishColor::ALL {
            for b in FishColor::ALL {
                assert_eq!(tints_match(a.tint(), b.tint()), a == b, "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn text_targets_have_no_icon() {
        let mut target = Target::new(1, CriterionKind::Letter, FishColor::Red);
        target.letter = Some('Q');
        let display = target.display();
        assert_eq!(display.icon, None);
        assert_eq!(display.label, "Q");
        assert_eq!(display.tint, FishColor::Red.tint());
    }

    #[test]
    fn species_target_shows_species_icon_and_label() {
        let mut target = Target::new(3, CriterionKind::ColorAndSpecies, FishColor::Blue);
        target.species = Some(Species::Crab);
        let display = target.display();
        assert_eq!(display.icon, Some(TargetIcon::Species(Species::Crab)));
        assert_eq!(display.label, "Blue Crab");
    }

    #[test]
    fn plain_species_target_leaves_out_the_neutral_color() {
        let mut target = Target::new(2, CriterionKind::Species, FishColor::White);
        target.species = Some(Species::Shark);
        assert_eq!(target.display().label, "Shark");

        let mut target = Target::new(3, CriterionKind::Shape, FishColor::Pink);
        target.shape = Some(Shape::Star);
        target.palette = true;
        assert_eq!(target.display().label, "Pink Star");
    }

    #[test]
    fn fish_label_prefers_letter() {
        let attrs = FishAttributes {
            number: Some(4),
            ..default()
        };
        assert_eq!(attrs.label(), Some("4".to_string()));
        let attrs = FishAttributes {
            letter: Some('A'),
            ..default()
        };
        assert_eq!(attrs.label(), Some("A".to_string()));
        assert_eq!(FishAttributes::default().label(), None);
    }
}
