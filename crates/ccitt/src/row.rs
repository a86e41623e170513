//! # Row buffers
//!
//! A row is stored packed, most significant bit first, with `1` for black.
//! Bits past `columns` are always zero.

use crate::{Color, Malformed};

/// One packed row of pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBuffer {
    bits: Vec<u8>,
    columns: u32,
}

impl RowBuffer {
    /// Create an all-white row of `columns` pixels, stored in `raster` bytes
    pub fn new(columns: u32, raster: usize) -> Self {
        let raster = raster.max((columns as usize).div_ceil(8));
        Self {
            bits: vec![0; raster],
            columns,
        }
    }

    /// Set all pixels to white
    pub fn clear(&mut self) {
        self.bits.fill(0);
    }

    /// Copy a packed row, where `1` is black unless `invert` is set
    pub fn load(&mut self, bytes: &[u8], invert: bool) {
        let len = (self.columns as usize).div_ceil(8);
        self.clear();
        for (dst, src) in self.bits[..len].iter_mut().zip(bytes) {
            *dst = if invert { !*src } else { *src };
        }
        let tail = self.columns % 8;
        if tail != 0 {
            self.bits[len - 1] &= 0xFF << (8 - tail);
        }
    }

    /// Number of pixels
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// The packed bits, `1` is black
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Color of the pixel at index `i`; everything past the row is white
    pub fn pixel(&self, i: u32) -> Color {
        if i >= self.columns {
            return Color::White;
        }
        let byte = self.bits[(i / 8) as usize];
        Color::from(byte & (0x80 >> (i % 8)) != 0)
    }

    /// Paint the pixels `start..end` with `color`
    ///
    /// The row starts out white, so white runs leave it unchanged.
    pub fn fill(&mut self, start: u32, end: u32, color: Color) {
        if color == Color::White {
            return;
        }
        let end = end.min(self.columns) as usize;
        let mut i = start as usize;
        while i < end {
            let bit = i % 8;
            let n = (8 - bit).min(end - i);
            let mask = ((0xFFu16 >> bit) & (0xFF00u16 >> (bit + n))) as u8;
            self.bits[i / 8] |= mask;
            i += n;
        }
    }

    /// Find the first pixel at or after `start` that has `color`
    ///
    /// Returns `columns` if there is none.
    pub fn find(&self, start: u32, color: Color) -> u32 {
        if start >= self.columns {
            return self.columns;
        }
        let flip = match color {
            Color::Black => 0x00,
            Color::White => 0xFF,
        };
        let mut index = (start / 8) as usize;
        let mut byte = (self.bits[index] ^ flip) & (0xFF >> (start % 8));
        loop {
            if byte != 0 {
                let pos = index as u32 * 8 + byte.leading_zeros();
                return pos.min(self.columns);
            }
            index += 1;
            if index >= self.bits.len() || index as u32 * 8 >= self.columns {
                return self.columns;
            }
            byte = self.bits[index] ^ flip;
        }
    }

    /// The changing elements `b1` and `b2` of this (reference) row
    ///
    /// `b1` is the first pixel after `a0` (or at the start of the row, if
    /// nothing was coded yet) where the row changes to the opposite of
    /// `color`, `b2` the next change after that.
    pub fn transitions(&self, a0: u32, first: bool, color: Color) -> (u32, u32) {
        let mut start = if first { 0 } else { a0 + 1 };
        let before = if start == 0 {
            Color::White
        } else {
            self.pixel(start - 1)
        };
        if before != color {
            start = self.find(start, color);
        }
        let b1 = self.find(start, !color);
        let b2 = self.find(b1, color);
        (b1, b2)
    }
}

/// Which kind of code is expected next within a row
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    /// A run (1-D) or a mode code (2-D)
    Code,
    /// The first run of a horizontal mode pair
    HorizontalFirst,
    /// The second run of a horizontal mode pair
    HorizontalSecond,
    /// Uncompressed mode, until an exit code
    Uncompressed,
}

/// Progress within the row that is being decoded
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Line {
    /// The next pixel to be coded
    pub a0: u32,
    /// Whether nothing was coded in this row yet
    pub first: bool,
    /// Color of the next run
    pub color: Color,
    pub step: Step,
    /// Makeup codes of an unfinished run
    pub run: u32,
}

impl Default for Line {
    fn default() -> Self {
        Self {
            a0: 0,
            first: true,
            color: Color::White,
            step: Step::Code,
            run: 0,
        }
    }
}

impl Line {
    pub fn is_done(&self, columns: u32) -> bool {
        !self.first && self.a0 >= columns && self.step == Step::Code && self.run == 0
    }

    /// Paint the pixels up to `end` in the current color
    pub fn advance(&mut self, row: &mut RowBuffer, end: u32) -> Result<(), Malformed> {
        if end < self.a0 {
            return Err(Malformed::BadReference);
        }
        if end > row.columns() {
            return Err(Malformed::Overshoot);
        }
        row.fill(self.a0, end, self.color);
        self.a0 = end;
        self.first = false;
        Ok(())
    }

    /// Paint a run of `len` pixels and switch colors
    pub fn put_run(&mut self, row: &mut RowBuffer, len: u32) -> Result<(), Malformed> {
        let end = self.a0.checked_add(len).ok_or(Malformed::Overshoot)?;
        self.advance(row, end)?;
        self.color.invert();
        Ok(())
    }
}
