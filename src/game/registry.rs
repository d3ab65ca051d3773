//! Entity registry
//!
//! Owns entity lifetimes and the components attached to them. Timers are the
//! only component the runtime core needs; game code spawns plain entities and
//! hangs its own timers off them.

use super::component::ComponentStorage;
use super::entity::{Entity, EntityAllocator};
use crate::timer::Timer;

#[derive(Default)]
pub struct Registry {
    entities: EntityAllocator,
    pub(crate) timers: ComponentStorage<Timer>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> Entity {
        self.entities.allocate()
    }

    /// Free the entity and every component attached to it.
    /// Returns false if it was already dead.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.entities.free(entity) {
            return false;
        }
        self.timers.clear_slot(entity.index());
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> u32 {
        self.entities.alive_count()
    }

    /// Live entities that carry a timer, in slot order.
    pub(crate) fn timer_entities(&self) -> Vec<Entity> {
        self.timers
            .indices()
            .into_iter()
            .filter_map(|idx| self.entities.entity_at(idx))
            .collect()
    }

    pub fn timer(&self, entity: Entity) -> Option<&Timer> {
        if !self.is_alive(entity) {
            return None;
        }
        self.timers.get(entity)
    }

    pub fn timer_count(&self) -> usize {
        self.timers.count()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.timers.clear();
    }
}
