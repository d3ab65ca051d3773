//! Game foundation
//!
//! Generational entities, sparse component storage and the registry that
//! owns them, plus the [`Game`] driver that runs one frame at a time:
//!
//! input poll → sound → timers → mode stack → FPS overlay → compositor

pub mod component;
pub mod entity;
pub mod registry;
pub mod runtime;

pub use component::ComponentStorage;
pub use entity::{Entity, EntityAllocator};
pub use registry::Registry;
pub use runtime::{FpsCounter, Game, FPS_FONT};
