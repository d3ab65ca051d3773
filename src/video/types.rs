//! Video primitive types
//!
//! Geometry, colors, resource keys and the persistent tile/sprite records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bank reserved for engine-provided fonts and images.
pub const SYSTEM_BANK: u8 = 0xff;

/// Key of a loaded font or image: bank number plus slot inside the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BankId {
    pub bank: u8,
    pub index: u16,
}

impl BankId {
    pub const fn new(bank: u8, index: u16) -> Self {
        Self { bank, index }
    }
}

impl fmt::Display for BankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.bank, self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn is_zero(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn area(&self) -> usize {
        self.w as usize * self.h as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub pos: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self {
            pos: Point::new(x, y),
            size: Size::new(w, h),
        }
    }

    /// One past the last column, saturating at `i32::MAX`.
    pub fn right(&self) -> i32 {
        edge(self.pos.x, self.size.w)
    }

    /// One past the last row, saturating at `i32::MAX`.
    pub fn bottom(&self) -> i32 {
        edge(self.pos.y, self.size.h)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.pos.x && x < self.right() && y >= self.pos.y && y < self.bottom()
    }

    /// Overlap of two rectangles (zero-sized when disjoint).
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x0 = self.pos.x.max(other.pos.x);
        let y0 = self.pos.y.max(other.pos.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return Rect::new(x0, y0, 0, 0);
        }
        Rect::new(x0, y0, (x1 as i64 - x0 as i64) as u32, (y1 as i64 - y0 as i64) as u32)
    }
}

fn edge(start: i32, len: u32) -> i32 {
    (start as i64 + len as i64).min(i32::MAX as i64) as i32
}

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::rgba(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Fully transparent pixels are never written by tile/sprite/blit drawing.
    #[inline]
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }
}

macro_rules! flag_byte {
    ($(#[$meta:meta])* $name:ident { $($(#[$fmeta:meta])* $flag:ident = $bit:expr),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
        pub struct $name(pub u8);

        impl $name {
            pub const NONE: $name = $name(0);
            $($(#[$fmeta])* pub const $flag: $name = $name($bit);)*

            #[inline]
            pub fn contains(self, other: $name) -> bool {
                self.0 & other.0 == other.0
            }

            #[inline]
            pub fn insert(&mut self, other: $name) {
                self.0 |= other.0;
            }

            #[inline]
            pub fn remove(&mut self, other: $name) {
                self.0 &= !other.0;
            }
        }

        impl std::ops::BitOr for $name {
            type Output = $name;
            fn bitor(self, rhs: $name) -> $name {
                $name(self.0 | rhs.0)
            }
        }
    };
}

flag_byte! {
    /// Flags of one background layer
    TileFlags {
        ENABLED = 0b0000_0001,
        HFLIP = 0b0000_0100,
        VFLIP = 0b0000_1000,
        /// Needs to be rasterized into the background surface
        CHANGED = 0b0001_0000,
    }
}

flag_byte! {
    SpriteFlags {
        ENABLED = 0b0000_0001,
        COLLIDED = 0b0000_0010,
        HFLIP = 0b0000_0100,
        VFLIP = 0b0000_1000,
        CHANGED = 0b0001_0000,
    }
}

/// Reference to tile graphics: the image in `id`, plus a palette slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: BankId,
    pub palette: u8,
}

impl Tile {
    pub const fn new(id: BankId) -> Self {
        Self { id, palette: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer {
    pub tile: Tile,
    pub flags: TileFlags,
}

/// One cell of the background grid. Layers draw in order, first at the bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub pos: Point,
    pub tile: Tile,
    pub flags: SpriteFlags,
}
