//! Keyboard and mouse through macroquad

use macroquad::prelude::{is_key_down, is_mouse_button_down, mouse_position, KeyCode};
use macroquad::input::MouseButton as MqMouseButton;

use super::{Key, KeySource, MouseButton};
use crate::video::Point;

/// Reads macroquad's key state. Mouse coordinates are divided by the window
/// scale so they land in frame pixels.
pub struct Keyboard {
    scale: f32,
}

impl Keyboard {
    pub fn new(scale: u32) -> Self {
        Self { scale: scale.max(1) as f32 }
    }
}

fn key_code(key: Key) -> KeyCode {
    match key {
        Key::Escape => KeyCode::Escape,
        Key::Return => KeyCode::Enter,
        Key::Space => KeyCode::Space,
        Key::Backspace => KeyCode::Backspace,
        Key::Tab => KeyCode::Tab,
        Key::F1 => KeyCode::F1,
        Key::LeftCtrl => KeyCode::LeftControl,
        Key::RightCtrl => KeyCode::RightControl,
        Key::LeftShift => KeyCode::LeftShift,
        Key::RightShift => KeyCode::RightShift,
        Key::Up => KeyCode::Up,
        Key::Down => KeyCode::Down,
        Key::Left => KeyCode::Left,
        Key::Right => KeyCode::Right,
        Key::A => KeyCode::A,
        Key::B => KeyCode::B,
        Key::C => KeyCode::C,
        Key::D => KeyCode::D,
        Key::E => KeyCode::E,
        Key::F => KeyCode::F,
        Key::G => KeyCode::G,
        Key::H => KeyCode::H,
        Key::I => KeyCode::I,
        Key::J => KeyCode::J,
        Key::K => KeyCode::K,
        Key::L => KeyCode::L,
        Key::M => KeyCode::M,
        Key::N => KeyCode::N,
        Key::O => KeyCode::O,
        Key::P => KeyCode::P,
        Key::Q => KeyCode::Q,
        Key::R => KeyCode::R,
        Key::S => KeyCode::S,
        Key::T => KeyCode::T,
        Key::U => KeyCode::U,
        Key::V => KeyCode::V,
        Key::W => KeyCode::W,
        Key::X => KeyCode::X,
        Key::Y => KeyCode::Y,
        Key::Z => KeyCode::Z,
    }
}

impl KeySource for Keyboard {
    fn key_down(&self, key: Key) -> bool {
        is_key_down(key_code(key))
    }

    fn mouse_down(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => is_mouse_button_down(MqMouseButton::Left),
            MouseButton::Right => is_mouse_button_down(MqMouseButton::Right),
        }
    }

    fn mouse_position(&self) -> Point {
        let (x, y) = mouse_position();
        Point::new((x / self.scale) as i32, (y / self.scale) as i32)
    }
}
