//! Static criterion presets and the per-level rules built from them.
//!
//! A preset is what the setup menu offers ("Letters", "Shapes", ...). At level
//! start it is combined with the player's settings into [`LevelRules`], which
//! owns the validated value pools and the fish templates for the level.

use bevy::prelude::*;
use thiserror::Error;

use super::criterion::{CriterionKind, FishColor, Shape, Species, Target};
use super::progress::{MissPolicy, RotationPolicy};
use super::target::SelectionOrder;

/// Configuration problems detected when a level starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("criterion {kind:?} needs a non-empty {pool} pool")]
    EmptyPool {
        kind: CriterionKind,
        pool: &'static str,
    },
    #[error("no criterion preset at index {0} ({1} presets configured)")]
    UnknownPreset(usize, usize),
    #[error("play area {width}x{height} has no room to spawn fish")]
    DegeneratePlayArea { width: i64, height: i64 },
}

/// Which letters a preset draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterSet {
    None,
    Alphabet,
    Vowels,
}

impl LetterSet {
    fn letters(self) -> Vec<char> {
        match self {
            LetterSet::None => Vec::new(),
            LetterSet::Alphabet => ('A'..='Z').collect(),
            LetterSet::Vowels => vec!['A', 'E', 'I', 'O', 'U'],
        }
    }
}

/// A selectable criterion with its quota and policies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriterionPreset {
    pub name: &'static str,
    pub kind: CriterionKind,
    pub quota: u32,
    pub order: SelectionOrder,
    pub rotation: RotationPolicy,
    pub letters: LetterSet,
    /// Inclusive number range, empty when `min > max`.
    pub numbers: (i32, i32),
}

impl CriterionPreset {
    const fn new(name: &'static str, kind: CriterionKind, quota: u32) -> Self {
        Self {
            name,
            kind,
            quota,
            order: SelectionOrder::Uniform,
            rotation: RotationPolicy::PerCatch,
            letters: LetterSet::None,
            numbers: (1, 0),
        }
    }

    const fn round_robin(mut self) -> Self {
        self.order = SelectionOrder::RoundRobin;
        self
    }

    const fn at_quota(mut self) -> Self {
        self.rotation = RotationPolicy::AtQuota;
        self
    }

    const fn with_letters(mut self, letters: LetterSet) -> Self {
        self.letters = letters;
        self
    }

    const fn with_numbers(mut self, min: i32, max: i32) -> Self {
        self.numbers = (min, max);
        self
    }

    /// Build the value pools this preset draws from.
    pub fn pools(&self) -> Pools {
        let (min, max) = self.numbers;
        Pools {
            colors: FishColor::ALL.to_vec(),
            species: Species::ALL.to_vec(),
            shapes: if self.kind.uses_shape() {
                Shape::ALL.to_vec()
            } else {
                Vec::new()
            },
            letters: self.letters.letters(),
            numbers: (min..=max).collect(),
        }
    }

    /// The palette toggle is meaningless for kinds that already match on color.
    pub fn offers_palette_toggle(&self) -> bool {
        !self.kind.requires_color()
    }
}

/// Presets offered by the setup menu, in display order.
pub const PRESETS: &[CriterionPreset] = &[
    CriterionPreset::new("Letters", CriterionKind::Letter, 26)
        .round_robin()
        .with_letters(LetterSet::Alphabet),
    CriterionPreset::new("Vowels", CriterionKind::Vowel, 10)
        .round_robin()
        .with_letters(LetterSet::Vowels),
    CriterionPreset::new("Numbers 1-10", CriterionKind::Number, 10)
        .round_robin()
        .with_numbers(1, 10),
    CriterionPreset::new("Numbers 1-20", CriterionKind::Number, 20)
        .round_robin()
        .with_numbers(1, 20),
    CriterionPreset::new("Species", CriterionKind::Species, 12),
    CriterionPreset::new("Colors", CriterionKind::Color, 12).at_quota(),
    CriterionPreset::new("Color & Species", CriterionKind::ColorAndSpecies, 12),
    CriterionPreset::new("Shapes", CriterionKind::Shape, 12).at_quota(),
    CriterionPreset::new("Shape & Color", CriterionKind::ShapeAndColor, 12).at_quota(),
];

/// Look up a preset by the index stored in the settings.
pub fn preset(index: usize) -> Result<&'static CriterionPreset, ConfigError> {
    PRESETS
        .get(index)
        .ok_or(ConfigError::UnknownPreset(index, PRESETS.len()))
}

/// Discrete values a level can draw targets and fish from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pools {
    pub colors: Vec<FishColor>,
    pub species: Vec<Species>,
    pub shapes: Vec<Shape>,
    pub letters: Vec<char>,
    pub numbers: Vec<i32>,
}

impl Pools {
    /// Check that every pool `kind` draws from has at least one value.
    ///
    /// Species are always required: every fish body is a species.
    pub fn validate(&self, kind: CriterionKind, use_palette: bool) -> Result<(), ConfigError> {
        let empty = |pool| ConfigError::EmptyPool { kind, pool };

        if self.species.is_empty() {
            return Err(empty("species"));
        }
        if (kind.requires_color() || use_palette) && self.colors.is_empty() {
            return Err(empty("color"));
        }
        match kind {
            CriterionKind::Letter | CriterionKind::Vowel if self.letters.is_empty() => {
                Err(empty("letter"))
            }
            CriterionKind::Number if self.numbers.is_empty() => Err(empty("number")),
            CriterionKind::Shape | CriterionKind::ShapeAndColor if self.shapes.is_empty() => {
                Err(empty("shape"))
            }
            _ => Ok(()),
        }
    }

    /// Body colors fish may wear for this kind.
    fn body_colors(&self, kind: CriterionKind, use_palette: bool) -> Vec<FishColor> {
        if !kind.is_textual() && (kind.requires_color() || use_palette) {
            self.colors.clone()
        } else {
            vec![FishColor::White]
        }
    }

    /// Every renderable fish body for the level.
    pub fn templates(&self, kind: CriterionKind, use_palette: bool) -> Vec<FishTemplate> {
        let colors = self.body_colors(kind, use_palette);
        if self.species.is_empty() {
            return Vec::new();
        }

        if kind.uses_shape() {
            self.shapes
                .iter()
                .enumerate()
                .flat_map(|(i, &shape)| {
                    let species = self.species[i % self.species.len()];
                    colors.iter().map(move |&color| FishTemplate {
                        species,
                        shape: Some(shape),
                        color,
                    })
                })
                .collect()
        } else {
            self.species
                .iter()
                .flat_map(|&species| {
                    colors.iter().map(move |&color| FishTemplate {
                        species,
                        shape: None,
                        color,
                    })
                })
                .collect()
        }
    }
}

/// A renderable fish body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FishTemplate {
    pub species: Species,
    pub shape: Option<Shape>,
    pub color: FishColor,
}

impl FishTemplate {
    /// Whether a fish built from this template shows the target's body
    /// attributes. Text kinds print their attribute later, so any body works.
    pub fn portrays(&self, target: &Target, use_palette: bool) -> bool {
        let color_ok = self.color == target.color;
        match target.kind {
            CriterionKind::Color => color_ok,
            CriterionKind::Species => {
                target.species == Some(self.species) && (!use_palette || color_ok)
            }
            CriterionKind::ColorAndSpecies => target.species == Some(self.species) && color_ok,
            CriterionKind::Shape => {
                target.shape.is_some() && self.shape == target.shape && (!use_palette || color_ok)
            }
            CriterionKind::ShapeAndColor => {
                target.shape.is_some() && self.shape == target.shape && color_ok
            }
            CriterionKind::Letter | CriterionKind::Vowel | CriterionKind::Number => true,
        }
    }
}

/// Everything the spawn/capture loop needs to know about the running level.
#[derive(Resource, Debug, Clone)]
pub struct LevelRules {
    pub name: &'static str,
    pub kind: CriterionKind,
    pub pools: Pools,
    pub templates: Vec<FishTemplate>,
    pub use_palette: bool,
    pub quota: u32,
    pub order: SelectionOrder,
    pub rotation: RotationPolicy,
    pub miss: MissPolicy,
    /// Zero-based difficulty level; scales fish speed.
    pub level_index: u32,
}

impl LevelRules {
    /// Combine a preset with the player's choices, validating the pools.
    pub fn new(
        preset: &CriterionPreset,
        use_palette: bool,
        level_index: u32,
    ) -> Result<Self, ConfigError> {
        Self::with_pools(preset, preset.pools(), use_palette, level_index)
    }

    /// Like [`LevelRules::new`] with explicit pools.
    pub fn with_pools(
        preset: &CriterionPreset,
        pools: Pools,
        use_palette: bool,
        level_index: u32,
    ) -> Result<Self, ConfigError> {
        let use_palette = use_palette && preset.offers_palette_toggle();
        pools.validate(preset.kind, use_palette)?;
        let templates = pools.templates(preset.kind, use_palette);

        Ok(Self {
            name: preset.name,
            kind: preset.kind,
            templates,
            pools,
            use_palette,
            quota: preset.quota.max(1),
            order: preset.order,
            rotation: preset.rotation,
            miss: MissPolicy::Ignore,
            level_index,
        })
    }

    pub fn with_miss(mut self, miss: MissPolicy) -> Self {
        self.miss = miss;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn preset_for(kind: CriterionKind) -> &'static CriterionPreset {
        PRESETS.iter().find(|p| p.kind == kind).unwrap()
    }

    #[test]
    fn every_kind_has_a_preset_with_valid_pools() {
        for kind in CriterionKind::ALL {
            let preset = preset_for(kind);
            for palette in [false, true] {
                let rules = LevelRules::new(preset, palette, 0).unwrap();
                assert!(!rules.templates.is_empty(), "{kind:?} has no templates");
            }
        }
    }

    #[test]
    fn quotas_follow_the_criterion() {
        let quota = |name: &str| PRESETS.iter().find(|p| p.name == name).unwrap().quota;
        assert_eq!(quota("Letters"), 26);
        assert_eq!(quota("Numbers 1-10"), 10);
        assert_eq!(quota("Numbers 1-20"), 20);
        assert_eq!(quota("Vowels"), 10);
        assert_eq!(quota("Shapes"), 12);
    }

    #[test]
    fn unknown_preset_index_is_an_error() {
        assert_eq!(
            preset(PRESETS.len()).unwrap_err(),
            ConfigError::UnknownPreset(PRESETS.len(), PRESETS.len())
        );
    }

    #[test]
    fn empty_letter_pool_fails_fast() {
        let preset = preset_for(CriterionKind::Letter);
        let pools = Pools {
            letters: Vec::new(),
            ..preset.pools()
        };
        let err = LevelRules::with_pools(preset, pools, false, 0).unwrap_err();
        assert_eq!(
            err,
            ConfigError::EmptyPool {
                kind: CriterionKind::Letter,
                pool: "letter",
            }
        );
        assert_eq!(
            err.to_string(),
            "criterion Letter needs a non-empty letter pool"
        );
    }

    #[test]
    fn empty_color_pool_only_matters_when_colors_are_used() {
        let preset = preset_for(CriterionKind::Species);
        let pools = Pools {
            colors: Vec::new(),
            ..preset.pools()
        };
        assert!(LevelRules::with_pools(preset, pools.clone(), false, 0).is_ok());
        assert!(LevelRules::with_pools(preset, pools, true, 0).is_err());
    }

    #[test]
    fn palette_off_keeps_bodies_white() {
        let rules = LevelRules::new(preset_for(CriterionKind::Species), false, 0).unwrap();
        assert!(rules.templates.iter().all(|t| t.color == FishColor::White));
        assert_eq!(rules.templates.len(), Species::ALL.len());
    }

    #[test]
    fn color_kinds_ignore_the_palette_toggle() {
        let rules = LevelRules::new(preset_for(CriterionKind::Color), false, 0).unwrap();
        assert!(!rules.use_palette);
        assert_eq!(
            rules.templates.len(),
            Species::ALL.len() * FishColor::ALL.len()
        );
    }

    #[test]
    fn shape_templates_carry_every_shape() {
        let rules = LevelRules::new(preset_for(CriterionKind::Shape), false, 0).unwrap();
        for shape in Shape::ALL {
            assert!(rules.templates.iter().any(|t| t.shape == Some(shape)));
        }
    }

    #[test]
    fn text_templates_portray_any_text_target() {
        let mut target = Target::new(1, CriterionKind::Number, FishColor::Red);
        target.number = Some(3);
        let template = FishTemplate {
            species: Species::Crab,
            shape: None,
            color: FishColor::White,
        };
        assert!(template.portrays(&target, true));
    }
}
