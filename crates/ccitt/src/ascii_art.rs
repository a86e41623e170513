//! # Draw bitmap as ascii-art
use std::fmt;

/// Characters for one horizontal border
#[derive(Debug)]
pub struct BorderDrawing {
    /// The left corner
    pub left: char,
    /// Repeated once per column
    pub middle: char,
    /// The right corner
    pub right: char,
}

/// Characters for drawing a framed bitmap
#[derive(Debug)]
pub struct BoxDrawing {
    /// Border above the image
    pub top: BorderDrawing,
    /// Start of each row
    pub left: char,
    /// End of each row
    pub right: char,
    /// Border below the image
    pub bottom: BorderDrawing,
    /// Black pixels
    pub ink: char,
    /// White pixels
    pub no_ink: char,
}

const ASCII_BORDER: BorderDrawing = BorderDrawing {
    left: '+',
    middle: '-',
    right: '+',
};

/// Plain ASCII characters
pub const ASCII: &BoxDrawing = &BoxDrawing {
    top: ASCII_BORDER,
    left: '|',
    right: '|',
    bottom: ASCII_BORDER,
    ink: '#',
    no_ink: ' ',
};

/// Unicode box drawing characters
pub const UNICODE: &BoxDrawing = &BoxDrawing {
    top: BorderDrawing {
        left: '╔',
        middle: '═',
        right: '╗',
    },
    left: '║',
    right: '║',
    bottom: BorderDrawing {
        left: '╚',
        middle: '═',
        right: '╝',
    },
    ink: '█',
    no_ink: ' ',
};

fn border<W: fmt::Write>(w: &mut W, b: &BorderDrawing, columns: usize) -> fmt::Result {
    w.write_char(b.left)?;
    for _ in 0..columns {
        w.write_char(b.middle)?;
    }
    w.write_char(b.right)?;
    w.write_char('\n')
}

/// Draw the decoded rows using characters
///
/// `bitmap` holds rows of `raster` bytes each, as produced by the
/// [`Decoder`](crate::Decoder) with the given `black_is_one` setting.
pub fn ascii_art<W: fmt::Write>(
    w: &mut W,
    bitmap: &[u8],
    columns: u32,
    raster: usize,
    black_is_one: bool,
    b: &BoxDrawing,
) -> fmt::Result {
    let columns = columns as usize;
    border(w, &b.top, columns)?;
    for row in bitmap.chunks_exact(raster.max(1)) {
        w.write_char(b.left)?;
        for i in 0..columns {
            let bit = row.get(i / 8).is_some_and(|byte| byte & (0x80 >> (i % 8)) != 0);
            w.write_char(if bit == black_is_one { b.ink } else { b.no_ink })?;
        }
        w.write_char(b.right)?;
        w.write_char('\n')?;
    }
    border(w, &b.bottom, columns)
}
