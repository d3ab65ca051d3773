//! Entity handles
//!
//! Timers (and anything else the game attaches to an object) are keyed by
//! `Entity`. A handle is a slot index plus a generation: freeing a slot bumps
//! its generation, so a handle kept by a finished timer callback can never
//! alias whatever entity reuses the slot later.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Handle that never refers to a live entity ("no owner").
    pub const NULL: Entity = Entity { index: u32::MAX, generation: 0 };

    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index, used to address component storage.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_null(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::NULL
    }
}

/// Hands out entity slots and tracks which handles are still alive.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    generations: Vec<u32>,
    /// Per-slot occupancy
    alive: Vec<bool>,
    /// Freed slots, reused LIFO
    free_indices: Vec<u32>,
    alive_count: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> Entity {
        self.alive_count += 1;

        if let Some(index) = self.free_indices.pop() {
            // generation was bumped when the slot was freed
            self.alive[index as usize] = true;
            return Entity::new(index, self.generations[index as usize]);
        }

        let index = self.generations.len() as u32;
        self.generations.push(0);
        self.alive.push(true);
        Entity::new(index, 0)
    }

    /// Returns false when the handle was already dead.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        let slot = &mut self.generations[entity.index as usize];
        *slot = slot.wrapping_add(1);
        self.alive[entity.index as usize] = false;
        self.free_indices.push(entity.index);
        self.alive_count -= 1;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        if entity.is_null() {
            return false;
        }
        let index = entity.index as usize;
        self.generations.get(index).is_some_and(|&gen| gen == entity.generation)
            && self.alive.get(index).copied().unwrap_or(false)
    }

    /// Live handle currently occupying `index`, if any.
    pub fn entity_at(&self, index: u32) -> Option<Entity> {
        let gen = *self.generations.get(index as usize)?;
        let entity = Entity::new(index, gen);
        self.is_alive(entity).then_some(entity)
    }

    pub fn alive_count(&self) -> u32 {
        self.alive_count
    }

    /// Invalidate every outstanding handle.
    pub fn clear(&mut self) {
        for gen in &mut self.generations {
            *gen = gen.wrapping_add(1);
        }
        self.alive.fill(false);
        self.free_indices = (0..self.generations.len() as u32).rev().collect();
        self.alive_count = 0;
    }
}
