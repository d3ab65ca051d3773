//! Per-frame input snapshot
//!
//! `InputContext` is owned by the game and handed by reference to anything
//! that reads input. `poll` copies the level state of every key, button and
//! mouse button once per frame; queries answer from that snapshot.
//!
//! The `*_pressed` queries are release-edge latches: a query that sees the
//! input down arms the latch, the first query after it comes back up clears
//! it and reports true. One press therefore fires once, when released.

use std::cell::Cell;

use super::keys::{JoystickButton, Key, MouseButton};
use super::{ButtonSource, KeySource};
use crate::video::Point;

pub struct InputContext {
    keys: [bool; Key::COUNT],
    key_latch: Cell<u64>,
    /// Controller level bits, indexed by `JoystickButton::bit`
    buttons: u16,
    button_latch: Cell<u16>,
    mouse_pos: Point,
    mouse: [bool; MouseButton::COUNT],
    mouse_latch: Cell<u8>,
    gamepad_connected: bool,
}

impl Default for InputContext {
    fn default() -> Self {
        Self {
            keys: [false; Key::COUNT],
            key_latch: Cell::new(0),
            buttons: 0,
            button_latch: Cell::new(0),
            mouse_pos: Point::new(0, 0),
            mouse: [false; MouseButton::COUNT],
            mouse_latch: Cell::new(0),
            gamepad_connected: false,
        }
    }
}

/// Arm on down, fire on the first up after that.
#[inline]
fn latch<T>(state: &Cell<T>, bit: T, down: bool) -> bool
where
    T: Copy + PartialEq + Default + std::ops::BitAnd<Output = T> + std::ops::BitOr<Output = T> + std::ops::Not<Output = T>,
{
    let armed = state.get() & bit != T::default();
    if down {
        state.set(state.get() | bit);
        false
    } else if armed {
        state.set(state.get() & !bit);
        true
    } else {
        false
    }
}

impl InputContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot all levels for this frame. Latches are left alone.
    pub fn poll(&mut self, keys: &dyn KeySource, buttons: &dyn ButtonSource) {
        for key in Key::ALL {
            self.keys[key.index()] = keys.key_down(*key);
        }
        for button in MouseButton::ALL {
            self.mouse[button.index()] = keys.mouse_down(*button);
        }
        self.mouse_pos = keys.mouse_position();

        self.gamepad_connected = buttons.connected();
        self.buttons = JoystickButton::ALL
            .iter()
            .filter(|b| buttons.button_down(**b))
            .fold(0, |mask, b| mask | b.bit());
    }

    pub fn key_state(&self, key: Key) -> bool {
        self.keys[key.index()]
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        latch(&self.key_latch, 1u64 << key.index(), self.key_state(key))
    }

    /// Controller level, falling back to the mapped keyboard key.
    pub fn button(&self, button: JoystickButton) -> bool {
        if self.buttons & button.bit() != 0 {
            return true;
        }
        button.fallback_key().is_some_and(|key| self.key_state(key))
    }

    pub fn button_pressed(&self, button: JoystickButton) -> bool {
        latch(&self.button_latch, button.bit(), self.button(button))
    }

    pub fn gamepad_connected(&self) -> bool {
        self.gamepad_connected
    }

    pub fn mouse_position(&self) -> Point {
        self.mouse_pos
    }

    pub fn mouse_button(&self, button: MouseButton) -> bool {
        self.mouse[button.index()]
    }

    pub fn mouse_button_pressed(&self, button: MouseButton) -> bool {
        latch(&self.mouse_latch, 1u8 << button.index(), self.mouse_button(button))
    }
}
