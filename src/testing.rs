//! Headless fakes shared by the unit tests

use std::collections::HashSet;
use std::path::Path;

use crate::diagnostics::Diagnostics;
use crate::error::CoreError;
use crate::game::Registry;
use crate::input::{ButtonSource, InputContext, JoystickButton, Key, KeySource, MouseButton};
use crate::state::{GameFlags, ModeContext};
use crate::timer::TimerContext;
use crate::video::{Color, FontHandle, Point, Presenter, Size, Surface, Video, VideoConfig};

/// The pieces of a `Game` that hooks and callbacks borrow.
pub struct Harness {
    pub input: InputContext,
    pub video: Video,
    pub registry: Registry,
    pub diagnostics: Diagnostics,
    pub flags: GameFlags,
}

impl Harness {
    pub fn new() -> Self {
        let config = VideoConfig {
            screen_size: Size::new(64, 64),
            bg_size: Size::new(4, 4),
            tile_size: Size::new(16, 16),
            max_bg_size: Size::new(4, 4),
            ..VideoConfig::default()
        };
        Self {
            input: InputContext::new(),
            video: Video::new(config),
            registry: Registry::new(),
            diagnostics: Diagnostics::new(),
            flags: GameFlags::default(),
        }
    }

    pub fn timer_ctx(&mut self, ticks: u32) -> TimerContext<'_> {
        TimerContext::new(ticks, &self.input, &mut self.video, &mut self.diagnostics, &mut self.flags)
    }

    pub fn mode_ctx(&mut self, ticks: u32) -> ModeContext<'_> {
        ModeContext::new(
            ticks,
            &self.input,
            &mut self.video,
            &mut self.registry,
            &mut self.diagnostics,
            &mut self.flags,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresenterCall {
    Upload { width: usize, height: usize },
    Text { font: FontHandle, color: Color, pos: Point, text: String },
    Present,
}

impl PresenterCall {
    pub fn kind(&self) -> &'static str {
        match self {
            PresenterCall::Upload { .. } => "upload",
            PresenterCall::Text { .. } => "text",
            PresenterCall::Present => "present",
        }
    }
}

/// Presenter that accepts every font path and records frame calls.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub fonts_loaded: usize,
    pub fonts_released: Vec<FontHandle>,
    pub calls: Vec<PresenterCall>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter for RecordingPresenter {
    fn load_font(&mut self, _path: &Path, _size: u16, _style: i32) -> Result<FontHandle, CoreError> {
        self.fonts_loaded += 1;
        Ok(FontHandle(self.fonts_loaded as u32))
    }

    fn release_font(&mut self, font: FontHandle) {
        self.fonts_released.push(font);
    }

    fn upload(&mut self, frame: &Surface) -> Result<(), CoreError> {
        self.calls.push(PresenterCall::Upload { width: frame.width, height: frame.height });
        Ok(())
    }

    fn draw_text(&mut self, font: FontHandle, color: Color, pos: Point, text: &str) -> Result<(), CoreError> {
        self.calls.push(PresenterCall::Text { font, color, pos, text: text.to_string() });
        Ok(())
    }

    fn present(&mut self) -> Result<(), CoreError> {
        self.calls.push(PresenterCall::Present);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeKeys {
    down: HashSet<Key>,
    mouse_down: HashSet<MouseButton>,
    pub mouse: Point,
}

impl FakeKeys {
    pub fn press(&mut self, key: Key) {
        self.down.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.down.remove(&key);
    }

    pub fn press_mouse(&mut self, button: MouseButton) {
        self.mouse_down.insert(button);
    }

    pub fn release_mouse(&mut self, button: MouseButton) {
        self.mouse_down.remove(&button);
    }
}

impl KeySource for FakeKeys {
    fn key_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    fn mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_down.contains(&button)
    }

    fn mouse_position(&self) -> Point {
        self.mouse
    }
}

/// A connected controller with scripted buttons.
#[derive(Debug, Default)]
pub struct FakeButtons {
    down: HashSet<JoystickButton>,
}

impl FakeButtons {
    pub fn press(&mut self, button: JoystickButton) {
        self.down.insert(button);
    }

    pub fn release(&mut self, button: JoystickButton) {
        self.down.remove(&button);
    }
}

impl ButtonSource for FakeButtons {
    fn button_down(&self, button: JoystickButton) -> bool {
        self.down.contains(&button)
    }
}
