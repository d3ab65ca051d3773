//! Mayhem: runtime core of a tile-and-sprite 2D game engine
//!
//! One frame is input → timers → the active game mode → the software
//! compositor → present. Window, audio and controller access sit behind
//! small traits so the core runs headless under test.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod bank;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod game;
pub mod input;
pub mod sound;
pub mod state;
pub mod timer;
pub mod video;

#[cfg(test)]
mod testing;

pub use config::GameConfig;
pub use diagnostics::Diagnostics;
pub use error::CoreError;
pub use game::Game;
