//! macroquad presentation
//!
//! The composite frame is streamed into one nearest-filtered texture and
//! drawn scaled to fill the window. Text is drawn with macroquad fonts on
//! top of it. Presenting is the caller's `next_frame().await`.

use std::collections::HashMap;
use std::path::Path;

use macroquad::prelude::{
    clear_background, draw_text_ex, draw_texture_ex, load_ttf_font_from_bytes, DrawTextureParams,
    FilterMode, Font, TextParams, Texture2D, Vec2, BLACK, WHITE,
};

use super::present::{FontHandle, Presenter};
use super::surface::Surface;
use super::types::{Color, Point};
use crate::error::CoreError;

struct LoadedFont {
    /// None uses macroquad's built-in font
    font: Option<Font>,
    size: u16,
}

pub struct WindowPresenter {
    scale: f32,
    texture: Option<Texture2D>,
    fonts: HashMap<u32, LoadedFont>,
    next_handle: u32,
}

impl WindowPresenter {
    pub fn new(scale: u32) -> Self {
        Self {
            scale: scale.max(1) as f32,
            texture: None,
            fonts: HashMap::new(),
            next_handle: 0,
        }
    }
}

fn mq_color(c: Color) -> macroquad::color::Color {
    macroquad::color::Color::from_rgba(c.r, c.g, c.b, c.a)
}

impl Presenter for WindowPresenter {
    /// An empty path selects the built-in font.
    fn load_font(&mut self, path: &Path, size: u16, _style: i32) -> Result<FontHandle, CoreError> {
        let font = if path.as_os_str().is_empty() {
            None
        } else {
            let bytes = std::fs::read(path).map_err(|e| CoreError::load_failure(path, e))?;
            let font = load_ttf_font_from_bytes(&bytes).map_err(|e| CoreError::load_failure(path, e))?;
            Some(font)
        };

        self.next_handle += 1;
        self.fonts.insert(self.next_handle, LoadedFont { font, size });
        Ok(FontHandle(self.next_handle))
    }

    fn release_font(&mut self, font: FontHandle) {
        self.fonts.remove(&font.0);
    }

    fn upload(&mut self, frame: &Surface) -> Result<(), CoreError> {
        let (w, h) = (frame.width as u16, frame.height as u16);
        let texture = match self.texture.take() {
            Some(t) if t.width() as u16 == w && t.height() as u16 == h => {
                t.update_from_bytes(w as u32, h as u32, &frame.pixels);
                t
            }
            _ => {
                let t = Texture2D::from_rgba8(w, h, &frame.pixels);
                t.set_filter(FilterMode::Nearest);
                t
            }
        };

        clear_background(BLACK);
        draw_texture_ex(
            &texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(Vec2::new(w as f32 * self.scale, h as f32 * self.scale)),
                ..Default::default()
            },
        );
        self.texture = Some(texture);
        Ok(())
    }

    fn draw_text(&mut self, font: FontHandle, color: Color, pos: Point, text: &str) -> Result<(), CoreError> {
        let Some(loaded) = self.fonts.get(&font.0) else {
            return Ok(());
        };
        // pos is the top-left corner; macroquad draws from the baseline
        let size = loaded.size as f32;
        draw_text_ex(
            text,
            pos.x as f32 * self.scale,
            (pos.y as f32 + size) * self.scale,
            TextParams {
                font: loaded.font.as_ref(),
                font_size: (size * self.scale) as u16,
                color: mq_color(color),
                ..Default::default()
            },
        );
        Ok(())
    }

    fn present(&mut self) -> Result<(), CoreError> {
        Ok(())
    }
}
