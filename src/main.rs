//! Mayhem: desktop runner
//!
//! Opens the window, wires the macroquad/cpal/gilrs bindings into the game
//! and drives it at the configured frame rate. Diagnostics are printed once
//! after the loop ends; the exit code is 1 if anything failed.

use std::path::Path;

use log::{info, warn};
use macroquad::prelude::*;

use mayhem::config::{GameConfig, CONFIG_FILE};
use mayhem::diagnostics::Diagnostics;
use mayhem::input::{ButtonSource, Keyboard, NoGamepad};
use mayhem::sound::SoundSystem;
use mayhem::video::WindowPresenter;
use mayhem::{Game, VERSION};

fn window_conf() -> Conf {
    // errors are reported again (properly) once logging is up
    let config = GameConfig::load(Path::new(CONFIG_FILE)).unwrap_or_default();
    let video = &config.video;
    Conf {
        window_title: format!("Mayhem v{}", VERSION),
        window_width: (video.screen_size.w * video.scale) as i32,
        window_height: (video.screen_size.h * video.scale) as i32,
        window_resizable: false,
        high_dpi: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    {
        crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info,mayhem=info"))
            .init();
    }

    let code = run().await;
    std::process::exit(code);
}

#[cfg(not(target_arch = "wasm32"))]
fn open_sound() -> Box<dyn SoundSystem> {
    Box::new(mayhem::sound::DeviceSound::new())
}

#[cfg(target_arch = "wasm32")]
fn open_sound() -> Box<dyn SoundSystem> {
    Box::new(mayhem::sound::NullSound::default())
}

async fn run() -> i32 {
    let config = match GameConfig::load(Path::new(CONFIG_FILE)) {
        Ok(config) => config,
        Err(e) => {
            let mut diagnostics = Diagnostics::new();
            diagnostics.record(&e);
            eprintln!("{}", diagnostics);
            return 1;
        }
    };

    prevent_quit();

    let mut presenter = WindowPresenter::new(config.video.scale);
    let keyboard = Keyboard::new(config.video.scale);

    #[cfg(not(target_arch = "wasm32"))]
    let mut gamepad = match mayhem::input::Gamepad::new() {
        Ok(pad) => Some(pad),
        Err(e) => {
            warn!("{}", e);
            None
        }
    };

    let mut game = Game::new(config, open_sound());
    let start = get_time();
    let ticks = || ((get_time() - start) * 1000.0) as u32;

    match game.init(&mut presenter, ticks()) {
        Err(e) => game.fail(&e),
        Ok(()) => {
            let frame_time = game.config.frame_budget_ms() as f64 / 1000.0;
            info!("running at {} fps", game.config.target_frame_rate);

            while !is_quit_requested() {
                let frame_start = get_time();

                #[cfg(not(target_arch = "wasm32"))]
                let buttons: &dyn ButtonSource = match gamepad.as_mut() {
                    Some(pad) => {
                        pad.poll();
                        pad
                    }
                    None => &NoGamepad,
                };
                #[cfg(target_arch = "wasm32")]
                let buttons: &dyn ButtonSource = &NoGamepad;

                match game.frame(ticks(), &mut presenter, &keyboard, buttons) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => {
                        game.fail(&e);
                        break;
                    }
                }

                pace(frame_start, frame_time);
                next_frame().await;
            }
        }
    }

    game.shutdown(&mut presenter);

    if !game.diagnostics.messages().is_empty() {
        eprintln!("{}", game.diagnostics);
    }
    game.exit_code()
}

/// Wait out the rest of the frame budget.
fn pace(frame_start: f64, target_frame_time: f64) {
    let remaining = target_frame_time - (get_time() - frame_start);
    if remaining <= 0.0 {
        return;
    }

    // Native: use sleep for bulk, then spin-wait for precision
    #[cfg(not(target_arch = "wasm32"))]
    {
        let spin_margin = 0.002;
        while get_time() - frame_start + spin_margin < target_frame_time {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        while get_time() - frame_start < target_frame_time {
            std::hint::spin_loop();
        }
    }
}
