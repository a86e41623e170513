//! # Uncompressed mode
//!
//! Entered from a 1-D run code or a 2-D mode code, this mode codes pixels
//! literally until an exit code names the color of the next run.
//!
//! Spec: ITU-T Recommendation T.4 (07/03), Annex A

use crate::{
    bits::BitCursor,
    error::CodeError,
    row::{Line, RowBuffer, Step},
    run::peek_code,
    tables::{UncompressedCode, UNCOMPRESSED},
    Color, Malformed,
};

/// Decode one uncompressed mode code word into `row`
pub(crate) fn decode_step(
    cursor: &mut BitCursor<'_>,
    line: &mut Line,
    row: &mut RowBuffer,
) -> Result<(), CodeError> {
    let entry = peek_code(cursor, &UNCOMPRESSED)?;
    let (white, black) = match entry.value {
        UncompressedCode::Pixels { white, black } => (u32::from(white), black),
        UncompressedCode::Exit { white, .. } => (u32::from(white), false),
    };
    let end = line.a0 + white + u32::from(black);
    if end > row.columns() {
        return Err(Malformed::Overshoot.into());
    }
    cursor.skip(entry.code_length.into());

    if black {
        row.fill(end - 1, end, Color::Black);
    }
    if end > line.a0 {
        line.a0 = end;
        line.first = false;
    }
    if let UncompressedCode::Exit { next, .. } = entry.value {
        line.color = next;
        line.step = Step::Code;
    }
    Ok(())
}
