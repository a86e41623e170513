//! Common structs and enums

use std::ops::Not;

/// Black or White Color
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Color {
    /// No-Ink
    White,
    /// Ink
    Black,
}

impl From<bool> for Color {
    fn from(b: bool) -> Color {
        if b {
            Color::Black
        } else {
            Color::White
        }
    }
}

impl Not for Color {
    type Output = Color;

    fn not(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl Color {
    /// Invert a color
    pub fn invert(&mut self) {
        *self = !*self;
    }
}
