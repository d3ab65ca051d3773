//! Font and image caches
//!
//! Both stores are keyed by `BankId`, filled on first load and emptied once
//! at shutdown. Image files are decoded with the `image` crate; fonts are
//! handed to the presenter, which owns the rasterizer for them.

use std::collections::HashMap;
use std::path::Path;

use log::{debug, info};

use super::present::{FontHandle, Presenter};
use super::surface::Surface;
use super::types::{BankId, Color, Size};
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontData {
    pub size: u16,
    pub style: i32,
    pub color: Color,
    pub handle: FontHandle,
}

#[derive(Default)]
pub struct Resources {
    fonts: HashMap<BankId, FontData>,
    images: HashMap<BankId, Surface>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a font into `id`. Loading an id that is already present is a no-op.
    pub fn font_load(
        &mut self,
        presenter: &mut dyn Presenter,
        path: &Path,
        size: u16,
        style: i32,
        color: Color,
        id: BankId,
    ) -> Result<(), CoreError> {
        if self.fonts.contains_key(&id) {
            return Ok(());
        }

        let handle = presenter.load_font(path, size, style)?;
        info!("font {} loaded from {} ({}px)", id, path.display(), size);
        self.fonts.insert(id, FontData { size, style, color, handle });
        Ok(())
    }

    pub fn font_find(&self, id: BankId) -> Option<&FontData> {
        self.fonts.get(&id)
    }

    /// Decode an image file into `id`, returning its natural size.
    /// An id that is already loaded keeps its current pixels.
    pub fn image_load(&mut self, path: &Path, id: BankId) -> Result<Size, CoreError> {
        if let Some(existing) = self.images.get(&id) {
            return Ok(existing.size());
        }

        let decoded = image::open(path)
            .map_err(|e| CoreError::load_failure(path, e))?
            .to_rgba8();
        let (w, h) = decoded.dimensions();
        let surface = Surface::from_rgba(w as usize, h as usize, decoded.into_raw())
            .ok_or_else(|| CoreError::load_failure(path, "decoded buffer has the wrong length"))?;

        info!("image {} loaded from {} ({}x{})", id, path.display(), w, h);
        self.images.insert(id, surface);
        Ok(Size::new(w, h))
    }

    /// Store an already-built image, replacing whatever was in `id`.
    pub fn image_insert(&mut self, id: BankId, image: Surface) {
        self.images.insert(id, image);
    }

    pub fn image_find(&self, id: BankId) -> Option<&Surface> {
        self.images.get(&id)
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Release every font through the presenter and drop every image.
    /// Returns the number of fonts released.
    pub fn release(&mut self, presenter: &mut dyn Presenter) -> usize {
        let released = self.fonts.len();
        for (id, font) in self.fonts.drain() {
            debug!("release font {}", id);
            presenter.release_font(font.handle);
        }
        self.images.clear();
        released
    }
}
