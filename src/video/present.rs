//! Presentation seam
//!
//! The compositor only ever talks to the window through this trait: upload
//! the finished frame, draw text on top of it, present. The binary implements
//! it with macroquad; tests use a recording fake.

use std::path::Path;

use super::surface::Surface;
use super::types::{Color, Point};
use crate::error::CoreError;

/// Opaque handle to a font owned by the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u32);

pub trait Presenter {
    /// Load a font file at the given pixel size.
    fn load_font(&mut self, path: &Path, size: u16, style: i32) -> Result<FontHandle, CoreError>;

    /// Release a font handed out by `load_font`. Called once per handle.
    fn release_font(&mut self, font: FontHandle);

    /// Copy the composite frame into the streaming texture.
    fn upload(&mut self, frame: &Surface) -> Result<(), CoreError>;

    /// Draw text onto the presentation surface, above the uploaded frame.
    fn draw_text(&mut self, font: FontHandle, color: Color, pos: Point, text: &str) -> Result<(), CoreError>;

    fn present(&mut self) -> Result<(), CoreError>;
}
