//! Video: deferred draw queue and software compositor
//!
//! Three layers make up a frame:
//!
//! - the background, a persistent grid of tile blocks rasterized into its own
//!   surface and only redrawn where a layer is flagged `CHANGED`
//! - sprites, positioned tiles drawn on top every frame
//! - transient commands (blits, lines, boxes, text) queued by producers and
//!   destroyed as soon as they are drawn
//!
//! `update` runs once per frame after every producer, composites the layers
//! into the foreground surface and hands it to the [`Presenter`].

pub mod present;
pub mod queue;
pub mod resources;
pub mod surface;
pub mod types;
pub mod window;

use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

pub use present::{FontHandle, Presenter};
pub use queue::{Blit, BoxCmd, DrawQueues, HLine, Text, VLine};
pub use resources::{FontData, Resources};
pub use surface::Surface;
pub use window::WindowPresenter;
pub use types::{
    BankId, Block, Color, Layer, Point, Rect, Size, Sprite, SpriteFlags, Tile, TileFlags,
    SYSTEM_BANK,
};

use crate::error::CoreError;

/// Screen and tile-grid dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub screen_size: Size,
    /// Window pixels per logical pixel
    pub scale: u32,
    /// Background grid, in blocks
    pub bg_size: Size,
    pub tile_size: Size,
    pub sprite_size: Size,
    pub max_bg_size: Size,
    pub max_sprites: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            screen_size: Size::new(512, 480),
            scale: 2,
            bg_size: Size::new(32, 32),
            tile_size: Size::new(32, 32),
            sprite_size: Size::new(16, 16),
            max_bg_size: Size::new(64, 64),
            max_sprites: 256,
        }
    }
}

/// What the compositor drew in one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub tiles: u32,
    pub sprites: u32,
    pub blits: u32,
    pub hlines: u32,
    pub vlines: u32,
    pub boxes: u32,
    pub texts: u32,
}

pub struct Video {
    config: VideoConfig,
    pub x_scroll: u32,
    pub y_scroll: u32,
    clip: Rect,
    blocks: Vec<Block>,
    sprites: Vec<Sprite>,
    resources: Resources,
    queues: DrawQueues,
    bg: Surface,
    fg: Surface,
}

impl Video {
    pub fn new(config: VideoConfig) -> Self {
        let mut blocks = Vec::with_capacity(config.max_bg_size.area().max(config.bg_size.area()));
        blocks.resize_with(config.bg_size.area(), Block::default);

        let bg_w = (config.tile_size.w * config.bg_size.w) as usize;
        let bg_h = (config.tile_size.h * config.bg_size.h) as usize;
        let screen = config.screen_size;
        info!(
            "video init: screen {}x{}, background {}x{} ({}x{} blocks)",
            screen.w, screen.h, bg_w, bg_h, config.bg_size.w, config.bg_size.h
        );

        Self {
            x_scroll: 0,
            y_scroll: 0,
            clip: Rect::new(0, 0, screen.w, screen.h),
            blocks,
            sprites: Vec::with_capacity(config.max_sprites as usize),
            resources: Resources::new(),
            queues: DrawQueues::default(),
            bg: Surface::filled(bg_w, bg_h, Color::BLACK),
            fg: Surface::new(screen.w as usize, screen.h as usize),
            config,
        }
    }

    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    pub fn screen(&self) -> Rect {
        Rect::new(0, 0, self.config.screen_size.w, self.config.screen_size.h)
    }

    pub fn clip(&self) -> Rect {
        self.clip
    }

    /// Restrict sprite and transient drawing to `rect` (clamped to the screen).
    pub fn set_clip(&mut self, rect: Rect) {
        self.clip = rect.intersect(&self.screen());
    }

    pub fn reset_clip(&mut self) {
        self.clip = self.screen();
    }

    pub fn set_scroll(&mut self, x: u32, y: u32) {
        self.x_scroll = x;
        self.y_scroll = y;
    }

    // =========================================================================
    // Resources
    // =========================================================================

    pub fn font_load(
        &mut self,
        presenter: &mut dyn Presenter,
        path: &Path,
        size: u16,
        style: i32,
        color: Color,
        id: BankId,
    ) -> Result<(), CoreError> {
        self.resources.font_load(presenter, path, size, style, color, id)
    }

    pub fn image_load(&mut self, path: &Path, id: BankId) -> Result<Size, CoreError> {
        self.resources.image_load(path, id)
    }

    pub fn image_insert(&mut self, id: BankId, image: Surface) {
        self.resources.image_insert(id, image);
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    // =========================================================================
    // Transient queue
    // =========================================================================

    pub fn queue_text(
        &mut self,
        font: BankId,
        color: Color,
        pos: Point,
        text: impl Into<String>,
    ) -> Result<(), CoreError> {
        if self.resources.font_find(font).is_none() {
            return Err(CoreError::UnknownFont(font));
        }
        self.queues.texts.push(Text { font, color, pos, data: text.into() });
        Ok(())
    }

    /// Queue a whole-image blit. `None` or a zero size draws the image at its
    /// natural size, anything else scales it into exactly `size`.
    pub fn queue_image(&mut self, id: BankId, pos: Point, size: Option<Size>) -> Result<(), CoreError> {
        let image = self.resources.image_find(id).ok_or(CoreError::UnknownImage(id))?;
        let size = match size {
            Some(s) if !s.is_zero() => s,
            _ => image.size(),
        };
        self.queues.images.push(Blit {
            id,
            dest: Rect { pos, size },
        });
        Ok(())
    }

    pub fn queue_hline(&mut self, color: Color, pos: Point, w: i32) {
        self.queues.hlines.push(HLine { color, pos, w });
    }

    pub fn queue_vline(&mut self, color: Color, pos: Point, h: i32) {
        self.queues.vlines.push(VLine { color, pos, h });
    }

    pub fn queue_box(&mut self, color: Color, bounds: Rect, fill: bool) {
        self.queues.boxes.push(BoxCmd { fill, color, bounds });
    }

    /// Number of transient records waiting for the next `update`.
    pub fn pending(&self) -> usize {
        self.queues.len()
    }

    pub fn queues(&self) -> &DrawQueues {
        &self.queues
    }

    // =========================================================================
    // Background and sprites
    // =========================================================================

    fn block_index(&self, x: u32, y: u32) -> Option<usize> {
        let grid = self.config.bg_size;
        (x < grid.w && y < grid.h).then(|| (y * grid.w + x) as usize)
    }

    pub fn block(&self, x: u32, y: u32) -> Option<&Block> {
        self.blocks.get(self.block_index(x, y)?)
    }

    /// Put `tile` in layer `layer` of block (x, y), growing the layer list as
    /// needed. The layer is flagged changed so the next frame redraws it.
    pub fn set_layer(&mut self, x: u32, y: u32, layer: usize, tile: Tile, mut flags: TileFlags) -> bool {
        let Some(idx) = self.block_index(x, y) else { return false };
        let layers = &mut self.blocks[idx].layers;
        let empty = Layer { tile, flags: TileFlags::NONE };
        if layers.len() <= layer {
            layers.resize(layer + 1, empty);
        }
        flags.insert(TileFlags::CHANGED);
        layers[layer] = Layer { tile, flags };
        true
    }

    /// Force a full background redraw on the next frame.
    pub fn mark_all_changed(&mut self) {
        for layer in self.blocks.iter_mut().flat_map(|b| b.layers.iter_mut()) {
            layer.flags.insert(TileFlags::CHANGED);
        }
    }

    /// Returns the sprite slot, or None when `max_sprites` is reached.
    pub fn add_sprite(&mut self, sprite: Sprite) -> Option<usize> {
        if self.sprites.len() >= self.config.max_sprites as usize {
            return None;
        }
        self.sprites.push(sprite);
        Some(self.sprites.len() - 1)
    }

    pub fn sprite_mut(&mut self, slot: usize) -> Option<&mut Sprite> {
        self.sprites.get_mut(slot)
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn clear_sprites(&mut self) {
        self.sprites.clear();
    }

    pub fn background(&self) -> &Surface {
        &self.bg
    }

    /// The last composited frame (before text, which lives on the presenter).
    pub fn frame(&self) -> &Surface {
        &self.fg
    }

    // =========================================================================
    // Compositor
    // =========================================================================

    /// Composite and present one frame. Every transient record queued since
    /// the last call is consumed, even when compositing fails.
    pub fn update(&mut self, presenter: &mut dyn Presenter) -> Result<FrameStats, CoreError> {
        let result = self.composite(presenter);
        if result.is_err() {
            self.queues.clear();
        }
        result
    }

    fn composite(&mut self, presenter: &mut dyn Presenter) -> Result<FrameStats, CoreError> {
        let mut stats = FrameStats::default();

        stats.tiles = self.rebuild_background()?;

        let screen = self.config.screen_size;
        let visible = Rect::new(self.x_scroll as i32, self.y_scroll as i32, screen.w, screen.h);
        self.fg.clear(Color::BLACK);
        self.fg.blit_region(&self.bg, visible, Point::new(0, 0));

        stats.sprites = self.draw_sprites()?;

        let clip = self.clip;
        for blit in self.queues.images.drain() {
            let image = self
                .resources
                .image_find(blit.id)
                .ok_or(CoreError::UnknownImage(blit.id))?;
            self.fg.blit_scaled(image, blit.dest, &clip);
            stats.blits += 1;
        }
        for line in self.queues.hlines.drain() {
            self.fg.hline(line.pos, line.w, line.color, &clip);
            stats.hlines += 1;
        }
        for line in self.queues.vlines.drain() {
            self.fg.vline(line.pos, line.h, line.color, &clip);
            stats.vlines += 1;
        }
        for cmd in self.queues.boxes.drain() {
            draw_box(&mut self.fg, &cmd, &clip);
            stats.boxes += 1;
        }

        presenter.upload(&self.fg)?;

        // text goes straight onto the presentation surface so nothing covers it
        for text in self.queues.texts.take() {
            let font = self
                .resources
                .font_find(text.font)
                .ok_or(CoreError::UnknownFont(text.font))?;
            presenter.draw_text(font.handle, text.color, text.pos, &text.data)?;
            stats.texts += 1;
        }

        presenter.present()?;
        Ok(stats)
    }

    /// Rasterize every enabled, changed layer into the background surface.
    fn rebuild_background(&mut self) -> Result<u32, CoreError> {
        let grid_w = self.config.bg_size.w.max(1);
        let tile = self.config.tile_size;
        let bounds = self.bg.bounds();
        let mut drawn = 0;

        for (i, block) in self.blocks.iter_mut().enumerate() {
            let cell = Point::new(
                (i as u32 % grid_w * tile.w) as i32,
                (i as u32 / grid_w * tile.h) as i32,
            );
            for layer in block.layers.iter_mut() {
                if !layer.flags.contains(TileFlags::ENABLED) || !layer.flags.contains(TileFlags::CHANGED) {
                    continue;
                }
                let image = self
                    .resources
                    .image_find(layer.tile.id)
                    .ok_or(CoreError::UnknownImage(layer.tile.id))?;
                self.bg.blit_tile(
                    image,
                    tile,
                    cell,
                    layer.flags.contains(TileFlags::HFLIP),
                    layer.flags.contains(TileFlags::VFLIP),
                    &bounds,
                );
                layer.flags.remove(TileFlags::CHANGED);
                drawn += 1;
            }
        }

        if drawn > 0 {
            debug!("background: {} layers redrawn", drawn);
        }
        Ok(drawn)
    }

    fn draw_sprites(&mut self) -> Result<u32, CoreError> {
        let size = self.config.sprite_size;
        let mut drawn = 0;
        for sprite in self.sprites.iter().filter(|s| s.flags.contains(SpriteFlags::ENABLED)) {
            let image = self
                .resources
                .image_find(sprite.tile.id)
                .ok_or(CoreError::UnknownImage(sprite.tile.id))?;
            self.fg.blit_tile(
                image,
                size,
                sprite.pos,
                sprite.flags.contains(SpriteFlags::HFLIP),
                sprite.flags.contains(SpriteFlags::VFLIP),
                &self.clip,
            );
            drawn += 1;
        }
        Ok(drawn)
    }

    /// Release every cached font and image and the two owned surfaces.
    /// Returns the number of fonts released; a second call releases nothing.
    pub fn shutdown(&mut self, presenter: &mut dyn Presenter) -> usize {
        let released = self.resources.release(presenter);
        self.queues.clear();
        self.sprites.clear();
        self.bg = Surface::new(0, 0);
        self.fg = Surface::new(0, 0);
        info!("video shutdown: {} fonts released", released);
        released
    }
}

/// Outlines are the two sides followed by the top and bottom edges. Only the
/// visible part of each edge is touched.
fn draw_box(fb: &mut Surface, cmd: &BoxCmd, clip: &Rect) {
    let Rect { pos, size } = cmd.bounds;
    if size.is_zero() {
        return;
    }

    if cmd.fill {
        fb.fill_rect(cmd.bounds, cmd.color, clip);
        return;
    }

    let last_x = i32::try_from(pos.x as i64 + size.w as i64 - 1).ok();
    let last_y = i32::try_from(pos.y as i64 + size.h as i64 - 1).ok();

    fb.fill_rect(Rect::new(pos.x, pos.y, 1, size.h), cmd.color, clip);
    if let Some(x) = last_x {
        fb.fill_rect(Rect::new(x, pos.y, 1, size.h), cmd.color, clip);
    }
    fb.fill_rect(Rect::new(pos.x, pos.y, size.w, 1), cmd.color, clip);
    if let Some(y) = last_y {
        fb.fill_rect(Rect::new(pos.x, y, size.w, 1), cmd.color, clip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{PresenterCall, RecordingPresenter};

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn small_config() -> VideoConfig {
        VideoConfig {
            screen_size: Size::new(16, 16),
            bg_size: Size::new(4, 4),
            tile_size: Size::new(4, 4),
            sprite_size: Size::new(2, 2),
            max_bg_size: Size::new(4, 4),
            max_sprites: 2,
            ..VideoConfig::default()
        }
    }

    fn video_with_font() -> (Video, RecordingPresenter) {
        let mut presenter = RecordingPresenter::new();
        let mut video = Video::new(small_config());
        video
            .font_load(&mut presenter, Path::new("font.ttf"), 8, 0, Color::WHITE, BankId::new(SYSTEM_BANK, 0))
            .unwrap();
        (video, presenter)
    }

    #[test]
    fn test_queue_image_natural_size() {
        let mut video = Video::new(small_config());
        video.image_insert(BankId::new(1, 0), Surface::filled(5, 3, RED));

        video.queue_image(BankId::new(1, 0), Point::new(2, 2), None).unwrap();
        video.queue_image(BankId::new(1, 0), Point::new(2, 2), Some(Size::new(0, 0))).unwrap();

        let dests: Vec<_> = video.queues().images.iter().map(|b| b.dest).collect();
        assert_eq!(dests, vec![Rect::new(2, 2, 5, 3), Rect::new(2, 2, 5, 3)]);
    }

    #[test]
    fn test_queue_image_scaled_rect() {
        let mut presenter = RecordingPresenter::new();
        let mut video = Video::new(small_config());
        video.image_insert(BankId::new(1, 0), Surface::filled(2, 2, RED));

        video.queue_image(BankId::new(1, 0), Point::new(4, 4), Some(Size::new(6, 3))).unwrap();
        assert_eq!(video.queues().images.iter().next().unwrap().dest, Rect::new(4, 4, 6, 3));

        video.update(&mut presenter).unwrap();
        let fb = video.frame();
        assert_eq!(fb.get_pixel(4, 4), Some(RED));
        assert_eq!(fb.get_pixel(9, 6), Some(RED));
        assert_eq!(fb.get_pixel(10, 6), Some(Color::BLACK));
        assert_eq!(fb.get_pixel(9, 7), Some(Color::BLACK));
    }

    #[test]
    fn test_unknown_resources_enqueue_nothing() {
        let mut video = Video::new(small_config());
        let id = BankId::new(3, 3);

        let err = video.queue_image(id, Point::new(0, 0), None).unwrap_err();
        assert!(matches!(err, CoreError::UnknownImage(e) if e == id));
        let err = video.queue_text(id, Color::WHITE, Point::new(0, 0), "x").unwrap_err();
        assert!(matches!(err, CoreError::UnknownFont(e) if e == id));

        assert_eq!(video.pending(), 0);
    }

    #[test]
    fn test_drain_order_and_text_last() {
        let (mut video, mut presenter) = video_with_font();
        video.image_insert(BankId::new(1, 0), Surface::filled(1, 1, RED));

        video.queue_text(BankId::new(SYSTEM_BANK, 0), Color::WHITE, Point::new(1, 1), "FPS:060").unwrap();
        video.queue_box(BLUE, Rect::new(0, 0, 3, 3), false);
        video.queue_vline(BLUE, Point::new(8, 0), 2);
        video.queue_hline(BLUE, Point::new(0, 8), 2);
        video.queue_image(BankId::new(1, 0), Point::new(0, 0), None).unwrap();

        let stats = video.update(&mut presenter).unwrap();
        assert_eq!(
            (stats.blits, stats.hlines, stats.vlines, stats.boxes, stats.texts),
            (1, 1, 1, 1, 1)
        );
        assert_eq!(video.pending(), 0);

        // the box outline was drawn after the blit at the same corner
        assert_eq!(video.frame().get_pixel(0, 0), Some(BLUE));

        let calls: Vec<_> = presenter.calls.iter().map(|c| c.kind()).collect();
        assert_eq!(calls, vec!["upload", "text", "present"]);
        assert!(matches!(&presenter.calls[1], PresenterCall::Text { text, .. } if text == "FPS:060"));
    }

    #[test]
    fn test_box_outline_and_fill() {
        let mut presenter = RecordingPresenter::new();
        let mut video = Video::new(small_config());
        video.queue_box(RED, Rect::new(1, 1, 4, 4), false);
        video.queue_box(BLUE, Rect::new(8, 8, 3, 2), true);
        video.update(&mut presenter).unwrap();

        let fb = video.frame();
        assert_eq!(fb.get_pixel(1, 1), Some(RED));
        assert_eq!(fb.get_pixel(4, 4), Some(RED));
        assert_eq!(fb.get_pixel(4, 1), Some(RED));
        assert_eq!(fb.get_pixel(2, 2), Some(Color::BLACK), "outline leaves the inside alone");

        for (x, y) in [(8, 8), (10, 8), (8, 9), (10, 9)] {
            assert_eq!(fb.get_pixel(x, y), Some(BLUE));
        }
        assert_eq!(fb.get_pixel(8, 10), Some(Color::BLACK));
    }

    #[test]
    fn test_oversized_commands_stay_on_screen() {
        let mut presenter = RecordingPresenter::new();
        let mut video = Video::new(small_config());
        video.queue_hline(RED, Point::new(i32::MAX - 2, 0), 10);
        video.queue_vline(RED, Point::new(0, i32::MAX - 2), 10);
        video.queue_box(RED, Rect::new(i32::MAX - 2, 0, 10, 10), false);
        video.queue_box(BLUE, Rect::new(-4, 12, u32::MAX, u32::MAX), true);
        video.queue_box(RED, Rect::new(14, -4, u32::MAX, 8), false);

        let stats = video.update(&mut presenter).unwrap();
        assert_eq!(stats.hlines + stats.vlines + stats.boxes, 5);

        let fb = video.frame();
        assert_eq!(fb.get_pixel(15, 0), Some(Color::BLACK));
        assert_eq!(fb.get_pixel(0, 12), Some(BLUE));
        assert_eq!(fb.get_pixel(15, 15), Some(BLUE));
        assert_eq!(fb.get_pixel(0, 11), Some(Color::BLACK));
        // left side and bottom edge of the last outline
        assert_eq!(fb.get_pixel(14, 0), Some(RED));
        assert_eq!(fb.get_pixel(15, 3), Some(RED));
        assert_eq!(fb.get_pixel(15, 2), Some(Color::BLACK));
    }

    #[test]
    fn test_queue_empty_at_start_of_next_frame() {
        let (mut video, mut presenter) = video_with_font();
        video.image_insert(BankId::new(1, 0), Surface::filled(1, 1, RED));

        for frame in 0..3 {
            assert_eq!(video.pending(), 0, "frame {} started with leftovers", frame);
            video.queue_hline(RED, Point::new(0, 0), 4);
            video.queue_image(BankId::new(1, 0), Point::new(0, 0), None).unwrap();
            video.queue_text(BankId::new(SYSTEM_BANK, 0), RED, Point::new(0, 0), "x").unwrap();
            video.update(&mut presenter).unwrap();
        }
        assert_eq!(video.pending(), 0);
    }

    #[test]
    fn test_failed_frame_still_drains() {
        let mut presenter = RecordingPresenter::new();
        let mut video = Video::new(small_config());
        video.set_layer(0, 0, 0, Tile::new(BankId::new(9, 9)), TileFlags::ENABLED);
        video.queue_hline(RED, Point::new(0, 0), 4);

        let err = video.update(&mut presenter).unwrap_err();
        assert!(matches!(err, CoreError::UnknownImage(_)));
        assert_eq!(video.pending(), 0);
    }

    #[test]
    fn test_background_redraws_only_changed_layers() {
        let mut presenter = RecordingPresenter::new();
        let mut video = Video::new(small_config());
        let id = BankId::new(2, 0);
        video.image_insert(id, Surface::filled(4, 4, RED));

        video.set_layer(1, 0, 0, Tile::new(id), TileFlags::ENABLED);
        video.set_layer(2, 0, 0, Tile::new(id), TileFlags::NONE);

        let stats = video.update(&mut presenter).unwrap();
        assert_eq!(stats.tiles, 1);
        assert_eq!(video.background().get_pixel(4, 0), Some(RED));
        assert_eq!(video.background().get_pixel(8, 0), Some(Color::BLACK));
        assert!(!video.block(1, 0).unwrap().layers[0].flags.contains(TileFlags::CHANGED));

        // nothing changed: nothing re-rasterized, but the frame still shows the tile
        let stats = video.update(&mut presenter).unwrap();
        assert_eq!(stats.tiles, 0);
        assert_eq!(video.frame().get_pixel(4, 0), Some(RED));

        video.mark_all_changed();
        assert_eq!(video.update(&mut presenter).unwrap().tiles, 1);
    }

    #[test]
    fn test_background_tile_flip() {
        let mut presenter = RecordingPresenter::new();
        let mut video = Video::new(small_config());
        let id = BankId::new(2, 1);
        let mut tile = Surface::filled(4, 4, BLUE);
        tile.set_pixel(0, 0, RED);
        video.image_insert(id, tile);

        video.set_layer(0, 0, 0, Tile::new(id), TileFlags::ENABLED | TileFlags::HFLIP | TileFlags::VFLIP);
        video.update(&mut presenter).unwrap();

        assert_eq!(video.background().get_pixel(3, 3), Some(RED));
        assert_eq!(video.background().get_pixel(0, 0), Some(BLUE));
    }

    #[test]
    fn test_scroll_selects_background_region() {
        let mut presenter = RecordingPresenter::new();
        let mut video = Video::new(small_config());
        let id = BankId::new(2, 0);
        video.image_insert(id, Surface::filled(4, 4, RED));
        video.set_layer(3, 3, 0, Tile::new(id), TileFlags::ENABLED);

        video.update(&mut presenter).unwrap();
        assert_eq!(video.frame().get_pixel(12, 12), Some(RED));

        video.set_scroll(4, 4);
        video.update(&mut presenter).unwrap();
        assert_eq!(video.frame().get_pixel(8, 8), Some(RED));
        // past the edge of the background the frame is cleared, not stale
        assert_eq!(video.frame().get_pixel(12, 12), Some(Color::BLACK));
    }

    #[test]
    fn test_sprites_clip_per_pixel() {
        let mut presenter = RecordingPresenter::new();
        let mut video = Video::new(small_config());
        let id = BankId::new(4, 0);
        video.image_insert(id, Surface::filled(2, 2, RED));

        let slot = video
            .add_sprite(Sprite { pos: Point::new(3, 3), tile: Tile::new(id), flags: SpriteFlags::ENABLED })
            .unwrap();
        video.add_sprite(Sprite { pos: Point::new(0, 0), tile: Tile::new(id), flags: SpriteFlags::NONE });
        assert!(video.add_sprite(Sprite { pos: Point::new(0, 0), tile: Tile::new(id), flags: SpriteFlags::NONE }).is_none());

        video.set_clip(Rect::new(0, 0, 4, 4));
        let stats = video.update(&mut presenter).unwrap();
        assert_eq!(stats.sprites, 1);
        assert_eq!(video.frame().get_pixel(3, 3), Some(RED));
        assert_eq!(video.frame().get_pixel(4, 4), Some(Color::BLACK));
        assert_eq!(video.frame().get_pixel(0, 0), Some(Color::BLACK), "disabled sprite");

        video.sprite_mut(slot).unwrap().flags.remove(SpriteFlags::ENABLED);
        assert_eq!(video.update(&mut presenter).unwrap().sprites, 0);
    }

    #[test]
    fn test_shutdown_releases_once() {
        let (mut video, mut presenter) = video_with_font();
        video
            .font_load(&mut presenter, Path::new("big.ttf"), 16, 0, Color::WHITE, BankId::new(SYSTEM_BANK, 1))
            .unwrap();
        video.image_insert(BankId::new(1, 0), Surface::new(1, 1));

        assert_eq!(video.shutdown(&mut presenter), 2);
        assert_eq!(video.shutdown(&mut presenter), 0);
        assert_eq!(presenter.fonts_released.len(), 2);
        assert_eq!(video.resources().image_count(), 0);
        assert_eq!(video.frame().width, 0);
    }
}
