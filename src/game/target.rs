//! Target selection - which fish counts as a correct catch right now.

use bevy::prelude::*;
use rand::{Rng, seq::IndexedRandom};

use super::{
    criterion::{CriterionKind, FishColor, Target, TargetDisplay},
    preset::{ConfigError, Pools},
};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<TargetShown>();
}

/// How letter and number targets walk their pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionOrder {
    /// Independent uniform draws.
    #[default]
    Uniform,
    /// Walk the pool in order and wrap, so every value appears once per lap.
    RoundRobin,
}

/// Presenter message: a new target became active.
#[derive(Message, Debug, Clone)]
pub struct TargetShown(pub TargetDisplay);

/// Produces targets for a level. Holds the round-robin cursor and id counter.
#[derive(Resource, Debug, Default)]
pub struct TargetSelector {
    order: SelectionOrder,
    cursor: usize,
    next_id: u32,
}

impl TargetSelector {
    pub fn new(order: SelectionOrder) -> Self {
        Self {
            order,
            cursor: 0,
            next_id: 1,
        }
    }

    /// Draw the next target for `kind` from `pools`.
    ///
    /// With `use_palette` the target also carries a random named color,
    /// otherwise neutral white. Color-based kinds always draw a color.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        kind: CriterionKind,
        pools: &Pools,
        use_palette: bool,
        rng: &mut R,
    ) -> Result<Target, ConfigError> {
        let color = if kind.requires_color() || use_palette {
            *pick(&pools.colors, kind, "color", rng)?
        } else {
            FishColor::White
        };

        let id = self.next_id;
        self.next_id += 1;
        let mut target = Target::new(id, kind, color);
        target.palette = use_palette;

        match kind {
            CriterionKind::Color => {}
            CriterionKind::Species | CriterionKind::ColorAndSpecies => {
                target.species = Some(*pick(&pools.species, kind, "species", rng)?);
            }
            CriterionKind::Shape | CriterionKind::ShapeAndColor => {
                target.shape = Some(*pick(&pools.shapes, kind, "shape", rng)?);
            }
            CriterionKind::Letter | CriterionKind::Vowel => {
                target.letter = Some(*self.next_in(&pools.letters, kind, "letter", rng)?);
            }
            CriterionKind::Number => {
                target.number = Some(*self.next_in(&pools.numbers, kind, "number", rng)?);
            }
        }

        debug!("New target #{}: {:?}", target.id, target.display().label);
        Ok(target)
    }

    fn next_in<'a, T, R: Rng + ?Sized>(
        &mut self,
        pool: &'a [T],
        kind: CriterionKind,
        name: &'static str,
        rng: &mut R,
    ) -> Result<&'a T, ConfigError> {
        match self.order {
            SelectionOrder::Uniform => pick(pool, kind, name, rng),
            SelectionOrder::RoundRobin => {
                if pool.is_empty() {
                    return Err(ConfigError::EmptyPool { kind, pool: name });
                }
                let value = &pool[self.cursor % pool.len()];
                self.cursor = (self.cursor + 1) % pool.len();
                Ok(value)
            }
        }
    }
}

fn pick<'a, T, R: Rng + ?Sized>(
    pool: &'a [T],
    kind: CriterionKind,
    name: &'static str,
    rng: &mut R,
) -> Result<&'a T, ConfigError> {
    pool.choose(rng)
        .ok_or(ConfigError::EmptyPool { kind, pool: name })
}

/// The single active target. Replaced as a whole, never edited in place.
#[derive(Resource, Debug, Clone)]
pub struct ActiveTarget(Target);

impl ActiveTarget {
    pub fn new(target: Target) -> Self {
        Self(target)
    }

    pub fn get(&self) -> &Target {
        &self.0
    }

    /// Swap in a new target, returning the previous one.
    pub fn replace(&mut self, target: Target) -> Target {
        std::mem::replace(&mut self.0, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::preset::PRESETS;
    use pretty_assertions::assert_eq;
    use rand::{SeedableRng, rngs::StdRng};

    fn pools_for(kind: CriterionKind) -> Pools {
        PRESETS.iter().find(|p| p.kind == kind).unwrap().pools()
    }

    #[test]
    fn targets_stay_inside_their_pools() {
        let mut rng = StdRng::seed_from_u64(7);
        for kind in CriterionKind::ALL {
            let pools = pools_for(kind);
            let mut selector = TargetSelector::new(SelectionOrder::Uniform);
            for _ in 0..200 {
                let t = selector.generate(kind, &pools, true, &mut rng).unwrap();
                assert!(pools.colors.contains(&t.color));
                if let Some(species) = t.species {
                    assert!(pools.species.contains(&species));
                }
                if let Some(shape) = t.shape {
                    assert!(pools.shapes.contains(&shape));
                }
                if let Some(letter) = t.letter {
                    assert!(pools.letters.contains(&letter));
                }
                if let Some(number) = t.number {
                    assert!(pools.numbers.contains(&number));
                }
            }
        }
    }

    #[test]
    fn each_kind_populates_its_discriminating_field() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut selector = TargetSelector::new(SelectionOrder::Uniform);
        let gen_for = |kind, selector: &mut TargetSelector, rng: &mut StdRng| {
            selector.generate(kind, &pools_for(kind), false, rng).unwrap()
        };

        let t = gen_for(CriterionKind::Species, &mut selector, &mut rng);
        assert!(t.species.is_some() && t.shape.is_none() && t.letter.is_none());
        let t = gen_for(CriterionKind::ShapeAndColor, &mut selector, &mut rng);
        assert!(t.shape.is_some() && t.species.is_none());
        let t = gen_for(CriterionKind::Number, &mut selector, &mut rng);
        assert!(t.number.is_some() && t.letter.is_none());
        let t = gen_for(CriterionKind::Vowel, &mut selector, &mut rng);
        assert!(t.letter.is_some() && t.number.is_none());
    }

    #[test]
    fn palette_off_gives_neutral_white() {
        let mut rng = StdRng::seed_from_u64(3);
        let pools = pools_for(CriterionKind::Letter);
        let mut selector = TargetSelector::new(SelectionOrder::RoundRobin);
        for _ in 0..30 {
            let t = selector
                .generate(CriterionKind::Letter, &pools, false, &mut rng)
                .unwrap();
            assert_eq!(t.color, FishColor::White);
            assert_eq!(t.tint, Srgba::WHITE);
        }
    }

    #[test]
    fn color_kind_draws_only_from_the_pool() {
        let mut rng = StdRng::seed_from_u64(11);
        let pools = Pools {
            colors: vec![FishColor::Red, FishColor::Blue],
            ..pools_for(CriterionKind::Color)
        };
        let mut selector = TargetSelector::new(SelectionOrder::Uniform);
        for _ in 0..100 {
            let t = selector
                .generate(CriterionKind::Color, &pools, false, &mut rng)
                .unwrap();
            assert!(matches!(t.color, FishColor::Red | FishColor::Blue));
            assert_eq!(t.tint, t.color.tint());
        }
    }

    #[test]
    fn round_robin_letters_cover_the_alphabet_once() {
        let mut rng = StdRng::seed_from_u64(5);
        let pools = pools_for(CriterionKind::Letter);
        let mut selector = TargetSelector::new(SelectionOrder::RoundRobin);
        let letters: Vec<char> = (0..26)
            .map(|_| {
                selector
                    .generate(CriterionKind::Letter, &pools, true, &mut rng)
                    .unwrap()
                    .letter
                    .unwrap()
            })
            .collect();
        assert_eq!(letters, ('A'..='Z').collect::<Vec<_>>());

        let wrapped = selector
            .generate(CriterionKind::Letter, &pools, true, &mut rng)
            .unwrap();
        assert_eq!(wrapped.letter, Some('A'));
    }

    #[test]
    fn round_robin_numbers_cover_the_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let pools = PRESETS
            .iter()
            .find(|p| p.name == "Numbers 1-20")
            .unwrap()
            .pools();
        let mut selector = TargetSelector::new(SelectionOrder::RoundRobin);
        let mut numbers: Vec<i32> = (0..20)
            .map(|_| {
                selector
                    .generate(CriterionKind::Number, &pools, false, &mut rng)
                    .unwrap()
                    .number
                    .unwrap()
            })
            .collect();
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn ids_increase_monotonically() {
        let mut rng = StdRng::seed_from_u64(2);
        let pools = pools_for(CriterionKind::Shape);
        let mut selector = TargetSelector::new(SelectionOrder::Uniform);
        let a = selector
            .generate(CriterionKind::Shape, &pools, false, &mut rng)
            .unwrap();
        let b = selector
            .generate(CriterionKind::Shape, &pools, false, &mut rng)
            .unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn empty_pool_is_reported_not_panicked() {
        let mut rng = StdRng::seed_from_u64(2);
        let pools = Pools::default();
        let mut selector = TargetSelector::new(SelectionOrder::RoundRobin);
        let err = selector
            .generate(CriterionKind::Number, &pools, false, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::EmptyPool {
                kind: CriterionKind::Number,
                pool: "number",
            }
        );
    }

    #[test]
    fn active_target_is_swapped_whole() {
        let first = Target::new(1, CriterionKind::Color, FishColor::Red);
        let second = Target::new(2, CriterionKind::Color, FishColor::Blue);
        let mut active = ActiveTarget::new(first.clone());
        assert_eq!(active.replace(second.clone()), first);
        assert_eq!(active.get(), &second);
    }
}
