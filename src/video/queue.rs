//! Transient draw queues
//!
//! Producers (modes, timer callbacks, the frame loop) push draw intents
//! during a frame; the compositor drains every queue at the end of the same
//! frame. Nothing survives into the next frame.

use super::types::{BankId, Color, Point, Rect};

/// FIFO of one kind of draw record.
#[derive(Debug)]
pub struct DrawQueue<T> {
    records: Vec<T>,
}

impl<T> DrawQueue<T> {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }

    /// Hand every record out in submission order, leaving the queue empty.
    pub fn drain(&mut self) -> std::vec::Drain<'_, T> {
        self.records.drain(..)
    }

    pub fn take(&mut self) -> Vec<T> {
        std::mem::take(&mut self.records)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

impl<T> Default for DrawQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub font: BankId,
    pub color: Color,
    pub pos: Point,
    pub data: String,
}

/// Whole-image blit, scaled into `dest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blit {
    pub id: BankId,
    pub dest: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HLine {
    pub color: Color,
    pub pos: Point,
    pub w: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VLine {
    pub color: Color,
    pub pos: Point,
    pub h: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxCmd {
    pub fill: bool,
    pub color: Color,
    pub bounds: Rect,
}

/// All transient queues, drained by the compositor in field order.
#[derive(Debug, Default)]
pub struct DrawQueues {
    pub images: DrawQueue<Blit>,
    pub hlines: DrawQueue<HLine>,
    pub vlines: DrawQueue<VLine>,
    pub boxes: DrawQueue<BoxCmd>,
    pub texts: DrawQueue<Text>,
}

impl DrawQueues {
    pub fn len(&self) -> usize {
        self.images.len() + self.hlines.len() + self.vlines.len() + self.boxes.len() + self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.hlines.clear();
        self.vlines.clear();
        self.boxes.clear();
        self.texts.clear();
    }
}
