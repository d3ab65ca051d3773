//! Frame driver
//!
//! Owns every subsystem and runs them in a fixed order once per frame. The
//! window, keyboard and controller are passed in on each call so the whole
//! loop runs headless under test.

use std::path::Path;

use log::{error, info};

use super::Registry;
use crate::config::GameConfig;
use crate::diagnostics::Diagnostics;
use crate::error::CoreError;
use crate::input::{ButtonSource, InputContext, Key, KeySource};
use crate::sound::SoundSystem;
use crate::state::{BootMode, EditorMode, GameFlags, ModeContext, StateMachine, Transition};
use crate::timer::{self, TimerContext};
use crate::video::{BankId, Color, FrameStats, Point, Presenter, Video, SYSTEM_BANK};

/// Font used for the FPS overlay
pub const FPS_FONT: BankId = BankId::new(SYSTEM_BANK, 0);

/// Frames counted over a one second window, published when the window closes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FpsCounter {
    fps: u16,
    frames: u16,
    window_start: u32,
}

impl FpsCounter {
    pub fn new(now: u32) -> Self {
        Self { fps: 0, frames: 0, window_start: now }
    }

    pub fn tick(&mut self, now: u32) {
        if now.wrapping_sub(self.window_start) >= 1000 {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start = now;
        }
        self.frames = self.frames.saturating_add(1);
    }

    pub fn fps(&self) -> u16 {
        self.fps
    }
}

pub struct Game {
    pub config: GameConfig,
    pub input: InputContext,
    pub video: Video,
    pub registry: Registry,
    pub machine: StateMachine,
    pub diagnostics: Diagnostics,
    pub flags: GameFlags,
    pub ticks: u32,
    pub last_frame: FrameStats,
    fps: FpsCounter,
    sound: Box<dyn SoundSystem>,
}

impl Game {
    pub fn new(config: GameConfig, sound: Box<dyn SoundSystem>) -> Self {
        Self {
            video: Video::new(config.video.clone()),
            config,
            input: InputContext::new(),
            registry: Registry::new(),
            machine: StateMachine::new(),
            diagnostics: Diagnostics::new(),
            flags: GameFlags::default(),
            ticks: 0,
            last_frame: FrameStats::default(),
            fps: FpsCounter::default(),
            sound,
        }
    }

    /// Bring up sound, load the system fonts and images, register the
    /// built-in modes and enter the boot mode.
    pub fn init(&mut self, presenter: &mut dyn Presenter, now: u32) -> Result<(), CoreError> {
        self.ticks = now;
        self.fps = FpsCounter::new(now);

        self.sound.init()?;

        for font in &self.config.fonts {
            self.video
                .font_load(presenter, &font.path, font.size, font.style, font.color, font.id)?;
        }
        for image in &self.config.images {
            self.video.image_load(Path::new(&image.path), image.id)?;
        }

        self.machine.register(BootMode::TYPE, || Box::new(BootMode))?;
        self.machine.register(EditorMode::TYPE, || Box::new(EditorMode))?;

        let mut ctx = ModeContext::new(
            self.ticks,
            &self.input,
            &mut self.video,
            &mut self.registry,
            &mut self.diagnostics,
            &mut self.flags,
        );
        self.machine.push(&mut ctx, BootMode::TYPE)?;

        info!("game initialized");
        Ok(())
    }

    /// Run one frame at tick `now`. Returns false once a quit was requested;
    /// the frame that saw the request still runs to completion.
    pub fn frame(
        &mut self,
        now: u32,
        presenter: &mut dyn Presenter,
        keys: &dyn KeySource,
        buttons: &dyn ButtonSource,
    ) -> Result<bool, CoreError> {
        self.ticks = now;
        self.input.poll(keys, buttons);

        if self.input.key_pressed(Key::Escape) {
            self.flags.quit = true;
        }

        self.sound.update()?;

        let mut timer_ctx = TimerContext::new(
            now,
            &self.input,
            &mut self.video,
            &mut self.diagnostics,
            &mut self.flags,
        );
        timer::update(&mut self.registry, &mut timer_ctx)?;
        let transitions = timer_ctx.take_transitions();

        let mut ctx = ModeContext::new(
            now,
            &self.input,
            &mut self.video,
            &mut self.registry,
            &mut self.diagnostics,
            &mut self.flags,
        );
        for transition in transitions {
            match transition {
                Transition::Push(key) => ctx.request_push(key),
                Transition::Pop => ctx.request_pop(),
            }
        }
        self.machine.apply_pending(&mut ctx)?;
        self.machine.update(&mut ctx)?;

        if self.config.show_fps {
            let text = format!("FPS:{:03}", self.fps.fps());
            self.video.queue_text(FPS_FONT, Color::WHITE, Point::new(2, 2), text)?;
        }

        self.last_frame = self.video.update(presenter)?;
        self.fps.tick(now);

        Ok(!self.flags.quit)
    }

    /// Record a failure from `init` or `frame`.
    pub fn fail(&mut self, err: &CoreError) {
        error!("{}", err);
        self.diagnostics.record(err);
    }

    /// Tear everything down. Keeps going past failures and records them.
    pub fn shutdown(&mut self, presenter: &mut dyn Presenter) {
        if let Err(e) = self.sound.shutdown() {
            self.fail(&e);
        }
        self.video.shutdown(presenter);
        self.registry.clear();
        info!("game shut down");
    }

    pub fn fps(&self) -> u16 {
        self.fps.fps()
    }

    /// 0 on a clean run, 1 when anything was recorded as an error.
    pub fn exit_code(&self) -> i32 {
        if self.diagnostics.is_failed() {
            1
        } else {
            0
        }
    }
}
