//! Input handling with gamepad support
//!
//! Devices sit behind two small traits so the core never talks to a window
//! or controller library directly:
//!
//! - [`KeySource`]: keyboard and mouse levels (macroquad on desktop)
//! - [`ButtonSource`]: controller button levels (gilrs on native)
//!
//! [`InputContext`] snapshots both once per frame and answers every query.

mod context;
mod keys;

#[cfg(not(target_arch = "wasm32"))]
mod gamepad;
mod keyboard;

pub use context::InputContext;
#[cfg(not(target_arch = "wasm32"))]
pub use gamepad::Gamepad;
pub use keyboard::Keyboard;
pub use keys::{JoystickButton, Key, MouseButton};

use crate::video::Point;

pub trait KeySource {
    fn key_down(&self, key: Key) -> bool;

    fn mouse_down(&self, _button: MouseButton) -> bool {
        false
    }

    /// Cursor position in screen (logical) pixels.
    fn mouse_position(&self) -> Point {
        Point::new(0, 0)
    }
}

pub trait ButtonSource {
    fn button_down(&self, button: JoystickButton) -> bool;

    fn connected(&self) -> bool {
        true
    }
}

/// Stand-in when no controller is available: every button reads up.
pub struct NoGamepad;

impl ButtonSource for NoGamepad {
    fn button_down(&self, _button: JoystickButton) -> bool {
        false
    }

    fn connected(&self) -> bool {
        false
    }
}
