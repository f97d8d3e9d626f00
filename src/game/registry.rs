//! Live fish bookkeeping.
//!
//! Every fish is registered on spawn and removed exactly once, whichever of
//! capture, exit or expiry gets to it first.

use bevy::{platform::collections::HashSet, prelude::*};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<EntityRegistry>();
}

#[derive(Resource, Debug, Default)]
pub struct EntityRegistry {
    live: HashSet<Entity>,
}

impl EntityRegistry {
    pub fn insert(&mut self, fish: Entity) {
        self.live.insert(fish);
    }

    /// Remove `fish`. Returns `true` only for the call that removed it.
    pub fn remove(&mut self, fish: Entity) -> bool {
        self.live.remove(&fish)
    }

    /// A fish swam out of the play area.
    pub fn on_exited_play_area(&mut self, fish: Entity) -> bool {
        self.remove(fish)
    }

    /// Take every live fish, leaving the registry empty.
    pub fn drain(&mut self) -> Vec<Entity> {
        self.live.drain().collect()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn contains(&self, fish: Entity) -> bool {
        self.live.contains(&fish)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn second_removal_is_a_no_op() {
        let fish = World::new().spawn_empty().id();
        let mut registry = EntityRegistry::default();
        registry.insert(fish);

        assert!(registry.remove(fish));
        assert!(!registry.remove(fish));
        assert!(!registry.on_exited_play_area(fish));
        assert!(registry.is_empty());
    }

    #[test]
    fn drain_empties_the_registry() {
        let mut world = World::new();
        let mut registry = EntityRegistry::default();
        for _ in 0..4 {
            registry.insert(world.spawn_empty().id());
        }
        assert_eq!(registry.len(), 4);

        let drained = registry.drain();
        assert_eq!(drained.len(), 4);
        assert_eq!(registry.len(), 0);
        assert!(!registry.contains(drained[0]));
    }
}
