//! Software surfaces
//!
//! RGBA8 pixel buffers used for the background layer, the composite
//! foreground and every cached image. All drawing clips against the surface
//! bounds and, where a clip rectangle is given, against that too.

use super::types::{Color, Point, Rect, Size};

pub struct Surface {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Surface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    /// Wrap an existing RGBA buffer. Returns None when the length is wrong.
    pub fn from_rgba(width: usize, height: usize, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width * height * 4).then_some(Self { pixels, width, height })
    }

    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        let mut surface = Self::new(width, height);
        surface.clear(color);
        surface
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as u32, self.height as u32)
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some((y as usize * self.width + x as usize) * 4)
    }

    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        let i = self.offset(x, y)?;
        Some(Color::from_bytes([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]))
    }

    /// Write one pixel, silently dropping anything off-surface.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&color.to_bytes());
        }
    }

    #[inline]
    fn plot_clipped(&mut self, x: i32, y: i32, color: Color, clip: &Rect) {
        if clip.contains(x, y) {
            self.set_pixel(x, y, color);
        }
    }

    pub fn hline(&mut self, pos: Point, w: i32, color: Color, clip: &Rect) {
        self.fill_rect(Rect::new(pos.x, pos.y, w.max(0) as u32, 1), color, clip);
    }

    pub fn vline(&mut self, pos: Point, h: i32, color: Color, clip: &Rect) {
        self.fill_rect(Rect::new(pos.x, pos.y, 1, h.max(0) as u32), color, clip);
    }

    /// Fill the part of `area` inside both `clip` and the surface.
    pub fn fill_rect(&mut self, area: Rect, color: Color, clip: &Rect) {
        let visible = area.intersect(clip).intersect(&self.bounds());
        if visible.size.is_zero() {
            return;
        }
        let bytes = color.to_bytes();
        let x0 = visible.pos.x as usize;
        let x1 = visible.right() as usize;
        for y in visible.pos.y as usize..visible.bottom() as usize {
            let row = y * self.width;
            for px in self.pixels[(row + x0) * 4..(row + x1) * 4].chunks_exact_mut(4) {
                px.copy_from_slice(&bytes);
            }
        }
    }

    /// Copy `src_rect` of `src` to `dst` verbatim (alpha included).
    /// Parts of the source rectangle outside `src` are skipped.
    pub fn blit_region(&mut self, src: &Surface, src_rect: Rect, dst: Point) {
        let area = src_rect.intersect(&src.bounds());
        let dx = dst.x + (area.pos.x - src_rect.pos.x);
        let dy = dst.y + (area.pos.y - src_rect.pos.y);

        for row in 0..area.size.h as i32 {
            let sy = area.pos.y + row;
            let ty = dy + row;
            if ty < 0 || ty as usize >= self.height {
                continue;
            }
            for col in 0..area.size.w as i32 {
                let tx = dx + col;
                if let (Some(si), Some(di)) = (src.offset(area.pos.x + col, sy), self.offset(tx, ty)) {
                    self.pixels[di..di + 4].copy_from_slice(&src.pixels[si..si + 4]);
                }
            }
        }
    }

    /// Draw a `size` cell sampled from the top-left of `src`, mirrored per axis
    /// by walking the source backwards. Transparent texels are skipped.
    pub fn blit_tile(
        &mut self,
        src: &Surface,
        size: Size,
        dst: Point,
        hflip: bool,
        vflip: bool,
        clip: &Rect,
    ) {
        let w = size.w as i32;
        let h = size.h as i32;
        for ty in 0..h {
            let sy = if vflip { h - 1 - ty } else { ty };
            for tx in 0..w {
                let sx = if hflip { w - 1 - tx } else { tx };
                match src.get_pixel(sx, sy) {
                    Some(c) if !c.is_transparent() => {
                        self.plot_clipped(dst.x.saturating_add(tx), dst.y.saturating_add(ty), c, clip)
                    }
                    _ => {}
                }
            }
        }
    }

    /// Nearest-neighbour scale of the whole of `src` into `dest`.
    pub fn blit_scaled(&mut self, src: &Surface, dest: Rect, clip: &Rect) {
        if dest.size.is_zero() || src.width == 0 || src.height == 0 {
            return;
        }
        let visible = dest.intersect(clip).intersect(&self.bounds());
        for y in visible.pos.y..visible.bottom() {
            let v = (y as i64 - dest.pos.y as i64) as usize * src.height / dest.size.h as usize;
            for x in visible.pos.x..visible.right() {
                let u = (x as i64 - dest.pos.x as i64) as usize * src.width / dest.size.w as usize;
                if let Some(c) = src.get_pixel(u as i32, v as i32) {
                    if !c.is_transparent() {
                        self.set_pixel(x, y, c);
                    }
                }
            }
        }
    }
}
